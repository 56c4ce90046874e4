//! Entry label matching and tagging.
//!
//! Each unit in the plot is drawn with a label like
//! `initrd-parse-etc.service (52ms)`, using `text.left` or `text.right`
//! depending on which side of its bar the label fits. Matching labels get
//! `data-*` attributes and a marker class so clicks can be routed to the
//! unit's page. Everything else (axis ticks, the tool's own annotations)
//! stays inert.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::document::Element;

/// Class marking a label as clickable.
pub const MARKER_CLASS: &str = "clickable-service";

pub const ATTR_SERVICE: &str = "data-service";
pub const ATTR_TIME: &str = "data-time";
pub const ATTR_TIME_UNIT: &str = "data-time-unit";

/// Alignment classes the tool uses for unit labels.
pub const LABEL_CLASSES: [&str; 2] = ["left", "right"];

/// `<unit name>[ (<number><unit>)]`, anchored. Duration number and unit are
/// optional together.
static ENTRY_LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<service>.+\.[a-z._-]+)(\s+\((?P<time>[0-9]+(\.[0-9]+)?)(?P<time_unit>[A-Za-z]+)\))?$",
    )
    .expect("entry label pattern is valid")
});

/// Fields parsed out of one entry label. `time` and `time_unit` are empty
/// when the label carries no duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLabel {
    pub service: String,
    pub time: String,
    pub time_unit: String,
}

impl EntryLabel {
    /// Match a label's literal text. Case-sensitive, whole string.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = ENTRY_LABEL_PATTERN.captures(text)?;
        let group = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        };

        Some(Self {
            service: group("service"),
            time: group("time"),
            time_unit: group("time_unit"),
        })
    }

    pub fn has_duration(&self) -> bool {
        !self.time.is_empty()
    }

    /// Duration in whole milliseconds, rounded half up.
    /// None when there is no duration or the unit is not one systemd prints.
    pub fn duration_ms(&self) -> Option<u64> {
        if !self.has_duration() {
            return None;
        }

        let unit_us: u128 = match self.time_unit.as_str() {
            "us" => 1,
            "ms" => 1_000,
            "s" => 1_000_000,
            "min" => 60_000_000,
            "h" => 3_600_000_000,
            "d" => 86_400_000_000,
            "w" => 604_800_000_000,
            // systemd's month and year are 1/12 and 365.25 days
            "month" => 2_629_800_000_000,
            "y" => 31_557_600_000_000,
            _ => return None,
        };

        let (numerator, denominator) = decimal_rational(&self.time)?;
        let scaled = numerator.checked_mul(unit_us)?;
        let denom_ms = denominator.checked_mul(1_000)?;
        let ms = scaled.checked_mul(2)?.checked_add(denom_ms)? / denom_ms.checked_mul(2)?;
        ms.try_into().ok()
    }

    /// Attach the navigation attributes and marker class to a label node.
    pub fn apply_to(&self, element: &mut Element) {
        element.set_attribute(ATTR_SERVICE, &self.service);
        element.set_attribute(ATTR_TIME, &self.time);
        element.set_attribute(ATTR_TIME_UNIT, &self.time_unit);
        element.add_class(MARKER_CLASS);
    }
}

/// "52" → (52, 1), "1.234" → (1234, 1000)
fn decimal_rational(s: &str) -> Option<(u128, u128)> {
    match s.split_once('.') {
        Some((int_part, frac_part)) => {
            let denominator = 10u128.checked_pow(frac_part.len() as u32)?;
            let int_val: u128 = int_part.parse().ok()?;
            let frac_val: u128 = frac_part.parse().ok()?;
            Some((int_val.checked_mul(denominator)?.checked_add(frac_val)?, denominator))
        }
        None => Some((s.parse().ok()?, 1)),
    }
}

/// True for `<text>` nodes carrying one of the label alignment classes.
pub fn is_label_node(element: &Element) -> bool {
    element.is("text") && LABEL_CLASSES.iter().any(|c| element.has_class(c))
}

/// Tag every matching label under `plot`. Returns the matched labels in
/// document order; non-matching nodes are left untouched.
pub fn tag_entry_labels(plot: &mut Element) -> Vec<EntryLabel> {
    let mut tagged = Vec::new();
    plot.walk_mut(&mut |element: &mut Element| {
        if !is_label_node(element) {
            return;
        }
        if let Some(label) = EntryLabel::parse(&element.text_content()) {
            label.apply_to(element);
            tagged.push(label);
        }
    });
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::document::SvgDocument;

    #[test]
    fn test_parse_with_duration() {
        let label = EntryLabel::parse("initrd-parse-etc.service (52ms)").unwrap();
        assert_eq!(label.service, "initrd-parse-etc.service");
        assert_eq!(label.time, "52");
        assert_eq!(label.time_unit, "ms");
    }

    #[test]
    fn test_parse_decimal_duration() {
        let label = EntryLabel::parse("NetworkManager-wait-online.service (5.034s)").unwrap();
        assert_eq!(label.service, "NetworkManager-wait-online.service");
        assert_eq!(label.time, "5.034");
        assert_eq!(label.time_unit, "s");
    }

    #[test]
    fn test_parse_without_duration() {
        let label = EntryLabel::parse("dbus.service").unwrap();
        assert_eq!(label.service, "dbus.service");
        assert_eq!(label.time, "");
        assert_eq!(label.time_unit, "");
        assert!(!label.has_duration());
    }

    #[test]
    fn test_parse_other_unit_types() {
        assert_eq!(EntryLabel::parse("boot-efi.mount (120ms)").unwrap().service, "boot-efi.mount");
        assert_eq!(EntryLabel::parse("sysinit.target").unwrap().service, "sysinit.target");
        assert_eq!(
            EntryLabel::parse(r"systemd-fsck@dev-disk-by\x2duuid-1234.service (80ms)")
                .unwrap()
                .service,
            r"systemd-fsck@dev-disk-by\x2duuid-1234.service"
        );
    }

    #[test]
    fn test_non_labels_rejected() {
        assert_eq!(EntryLabel::parse("10s"), None);
        assert_eq!(EntryLabel::parse("1.0s"), None);
        assert_eq!(EntryLabel::parse("Activating"), None);
        assert_eq!(EntryLabel::parse(""), None);
        // Duration number without unit does not match
        assert_eq!(EntryLabel::parse("dbus.service (52)"), None);
        // Case-sensitive suffix
        assert_eq!(EntryLabel::parse("DBUS.SERVICE"), None);
        // Trailing junk after the duration
        assert_eq!(EntryLabel::parse("dbus.service (52ms) extra"), None);
    }

    #[test]
    fn test_duration_ms() {
        let ms = |s: &str| EntryLabel::parse(s).unwrap().duration_ms();
        assert_eq!(ms("a.service (52ms)"), Some(52));
        assert_eq!(ms("a.service (1.2345s)"), Some(1235));
        assert_eq!(ms("a.service (2min)"), Some(120_000));
        assert_eq!(ms("a.service (400us)"), Some(0));
        assert_eq!(ms("a.service (500us)"), Some(1));
        assert_eq!(ms("a.service (1d)"), Some(86_400_000));
        assert_eq!(ms("a.service (2w)"), Some(1_209_600_000));
        assert_eq!(ms("a.service (1month)"), Some(2_629_800_000));
        assert_eq!(ms("a.service (1y)"), Some(31_557_600_000));
        assert_eq!(ms("a.service (3fortnights)"), None);
        assert_eq!(ms("a.service"), None);
    }

    #[test]
    fn test_duration_ms_out_of_range() {
        let ms = |s: &str| EntryLabel::parse(s).unwrap().duration_ms();
        // Largest u128 numerator: rounding must not overflow
        assert_eq!(ms("a.service (170141183460469231731687303715884105727us)"), None);
        assert_eq!(ms("a.service (99999999999999999999999999999999999999999s)"), None);
        assert_eq!(ms("a.service (0.000000000000000000000000000000000000001s)"), None);
        // Fits u128 but not u64
        assert_eq!(ms("a.service (100000000000000000000000ms)"), None);
    }

    #[test]
    fn test_tag_entry_labels() {
        let raw = r#"<svg><g>
<text class="sec" x="0" y="10">1.0s</text>
<text class="left" x="1" y="20">dbus.service (12ms)</text>
<text class="right" x="2" y="30">sysinit.target</text>
<text class="left" x="3" y="40">not a unit</text>
<text x="4" y="50">plain.service</text>
</g></svg>"#;
        let mut root = SvgDocument::parse(raw).unwrap().root;
        let plot = root.child_elements_mut().next().unwrap();
        let tagged = tag_entry_labels(plot);

        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[0].service, "dbus.service");
        assert_eq!(tagged[1].service, "sysinit.target");

        let texts: Vec<&Element> = plot.child_elements().collect();
        assert_eq!(texts[0].attribute(ATTR_SERVICE), None);
        assert_eq!(texts[1].attribute(ATTR_SERVICE), Some("dbus.service"));
        assert_eq!(texts[1].attribute(ATTR_TIME), Some("12"));
        assert_eq!(texts[1].attribute(ATTR_TIME_UNIT), Some("ms"));
        assert_eq!(texts[1].attribute("class"), Some("left clickable-service"));
        assert_eq!(texts[2].attribute(ATTR_TIME), Some(""));
        assert_eq!(texts[2].attribute(ATTR_TIME_UNIT), Some(""));
        assert!(texts[2].has_class(MARKER_CLASS));
        assert_eq!(texts[3].attributes.len(), 3);
        assert!(!texts[3].has_class(MARKER_CLASS));
        assert_eq!(texts[4].attribute(ATTR_SERVICE), None);
    }
}
