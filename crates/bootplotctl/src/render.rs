//! Output rendering for plot results.
//!
//! The HTML fragment mirrors the boot info card: captions as paragraphs, a
//! fixed colour legend (the tool's own legend is stripped), and the annotated
//! chart embedded verbatim so its `data-*` attributes reach the page.

use anyhow::Result;
use bootplot_shared::{AnnotatedPlot, EntryLabel, Mode, PipelineResult, PlotFailure};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Annotated svg document
    Svg,
    /// Embeddable HTML fragment
    Html,
    /// Machine-readable report
    Json,
}

/// Legend entries: (css class, label)
pub const LEGEND: [(&str, &str); 6] = [
    ("activating", "Activating"),
    ("active", "Active"),
    ("deactivating", "Deactivating"),
    ("security", "Setting up security module"),
    ("generators", "Generators"),
    ("unitsload", "Loading unit files"),
];

/// JSON view of one entry
#[derive(Debug, Serialize)]
pub struct EntryReport<'a> {
    pub service: &'a str,
    pub time: &'a str,
    pub time_unit: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl<'a> From<&'a EntryLabel> for EntryReport<'a> {
    fn from(label: &'a EntryLabel) -> Self {
        Self {
            service: &label.service,
            time: &label.time,
            time_unit: &label.time_unit,
            duration_ms: label.duration_ms(),
        }
    }
}

/// JSON report for a finished request
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlotReport<'a> {
    Loading {
        mode: Mode,
    },
    Success {
        mode: Mode,
        generated_at: DateTime<Utc>,
        captions: &'a [String],
        entries: Vec<EntryReport<'a>>,
        svg: String,
    },
    Failure {
        mode: Mode,
        error: &'a PlotFailure,
    },
}

impl<'a> PlotReport<'a> {
    pub fn new(mode: Mode, result: &'a PipelineResult) -> Self {
        match result {
            PipelineResult::Loading => PlotReport::Loading { mode },
            PipelineResult::Success(plot) => PlotReport::Success {
                mode,
                generated_at: Utc::now(),
                captions: &plot.captions,
                entries: plot.entries.iter().map(EntryReport::from).collect(),
                svg: plot.markup(),
            },
            PipelineResult::Failure(failure) => PlotReport::Failure {
                mode,
                error: failure,
            },
        }
    }
}

/// Render a result in the requested format.
pub fn render(format: OutputFormat, mode: Mode, result: &PipelineResult) -> Result<String> {
    Ok(match format {
        OutputFormat::Svg => render_svg(result),
        OutputFormat::Html => render_html(result),
        OutputFormat::Json => serde_json::to_string_pretty(&PlotReport::new(mode, result))?,
    })
}

/// Svg for a success; the failure text otherwise.
pub fn render_svg(result: &PipelineResult) -> String {
    match result {
        PipelineResult::Success(plot) => plot.document.to_xml(),
        PipelineResult::Loading => "Loading\n".to_string(),
        PipelineResult::Failure(failure) => format!("{}\n{}\n", failure.message, failure.detail),
    }
}

pub fn render_html(result: &PipelineResult) -> String {
    match result {
        PipelineResult::Loading => {
            panel("Loading", "<div class=\"spinner\" role=\"progressbar\"></div>")
        }
        PipelineResult::Failure(failure) => panel(
            "Failure",
            &format!(
                "<p>{}</p>\n<pre class=\"code-block\"><code id=\"code-content\">{}</code></pre>",
                escape_html(&failure.message),
                escape_html(&failure.detail)
            ),
        ),
        PipelineResult::Success(plot) => card(plot),
    }
}

fn panel(title: &str, body: &str) -> String {
    format!(
        "<div class=\"empty-state\">\n<h4>{}</h4>\n{}\n</div>\n",
        escape_html(title),
        body
    )
}

fn card(plot: &AnnotatedPlot) -> String {
    let mut out = String::from("<div class=\"card\">\n<h2 class=\"card-title\">Boot Info</h2>\n<div class=\"card-body\">\n");
    for caption in &plot.captions {
        out.push_str(&format!("<p>{}</p>\n", escape_html(caption)));
    }

    out.push_str("<ul class=\"legend\">\n");
    for (class, label) in LEGEND {
        out.push_str(&format!(
            "<li><div class=\"legendColor {}\"></div>{}</li>\n",
            class,
            escape_html(label)
        ));
    }
    out.push_str("</ul>\n");

    out.push_str("<div class=\"chart-container\">\n<div class=\"chart\" role=\"presentation\">");
    out.push_str(&plot.markup());
    out.push_str("</div>\n</div>\n</div>\n</div>\n");
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Plain text table of tagged entries.
pub fn render_entries(plot: &AnnotatedPlot) -> String {
    let width = plot
        .entries
        .iter()
        .map(|e| e.service.len())
        .max()
        .unwrap_or(0)
        .max("UNIT".len());

    let mut out = format!("{:<width$}  DURATION\n", "UNIT", width = width);
    for entry in &plot.entries {
        let duration = if entry.has_duration() {
            format!("{}{}", entry.time, entry.time_unit)
        } else {
            "-".to_string()
        };
        out.push_str(&format!(
            "{:<width$}  {}\n",
            entry.service,
            duration,
            width = width
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootplot_shared::{annotate, AnnotateOptions, PlotError};

    const PLOT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><text>Startup finished in 1s &amp; done</text><g><text class="left">dbus.service (12ms)</text><text class="right">sysinit.target</text></g><g/></svg>"#;

    fn success() -> PipelineResult {
        PipelineResult::Success(annotate(PLOT, &AnnotateOptions::default()).unwrap())
    }

    fn failure() -> PipelineResult {
        PipelineResult::from_outcome(
            Mode::System,
            "systemd-analyze",
            Ok("<b>not svg".to_string()),
            &AnnotateOptions::default(),
        )
    }

    #[test]
    fn test_html_success_embeds_annotated_markup() {
        let html = render_html(&success());
        assert!(html.contains("<h2 class=\"card-title\">Boot Info</h2>"));
        assert!(html.contains("<p>Startup finished in 1s &amp; done</p>"));
        assert!(html.contains("Setting up security module"));
        assert!(html.contains(r#"data-service="dbus.service""#));
        assert!(html.contains(r#"class="left clickable-service""#));
    }

    #[test]
    fn test_html_failure_escapes_detail() {
        let html = render_html(&failure());
        assert!(html.contains("<h4>Failure</h4>"));
        assert!(html.contains("There was an error parsing the output of systemd-analyze plot"));
        assert!(html.contains("&lt;b&gt;not svg"));
    }

    #[test]
    fn test_html_loading() {
        let html = render_html(&PipelineResult::Loading);
        assert!(html.contains("<h4>Loading</h4>"));
    }

    #[test]
    fn test_svg_output() {
        let svg = render_svg(&success());
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg "));
        let failed = render_svg(&PipelineResult::from_outcome(
            Mode::User,
            "systemd-analyze",
            Err(PlotError::acquisition("boom")),
            &AnnotateOptions::default(),
        ));
        assert_eq!(
            failed,
            "There was an error reading the output of systemd-analyze --user plot\nboom\n"
        );
    }

    #[test]
    fn test_json_report() {
        let json = render(OutputFormat::Json, Mode::System, &success()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["mode"], "system");
        assert_eq!(value["captions"][0], "Startup finished in 1s & done");
        assert_eq!(value["entries"][0]["service"], "dbus.service");
        assert_eq!(value["entries"][0]["duration_ms"], 12);
        assert!(value["entries"][1].get("duration_ms").is_none());
        assert!(value["svg"].as_str().unwrap().starts_with("<svg "));

        let json = render(OutputFormat::Json, Mode::System, &failure()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["status"], "failure");
        assert_eq!(value["error"]["kind"], "parse");
        assert_eq!(value["error"]["detail"], "<b>not svg");
    }

    #[test]
    fn test_entries_table() {
        let result = success();
        let table = render_entries(result.as_success().unwrap());
        assert_eq!(
            table,
            "UNIT            DURATION\ndbus.service    12ms\nsysinit.target  -\n"
        );
    }
}
