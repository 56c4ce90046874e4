//! bootplotctl - interactive boot timeline from `systemd-analyze plot`

use anyhow::{Context, Result};
use bootplot_shared::navigation::{NavigationRequest, Navigator};
use bootplot_shared::{Mode, PipelineResult};
use bootplotctl::render::{self, OutputFormat};
use bootplotctl::{Acquirer, Config, PlotSession, SavedPlot, SystemdAnalyze, EXIT_FAILURE, EXIT_SUCCESS};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bootplotctl")]
#[command(about = "Interactive startup timeline from systemd-analyze plot", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: /etc/bootplot/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analysis and render the annotated plot
    Plot {
        /// Startup to analyze: system or user
        #[arg(long)]
        mode: Option<Mode>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the clickable unit entries
    Entries {
        #[arg(long)]
        mode: Option<Mode>,
    },

    /// Resolve the navigation target for a unit, as a click on its label would
    Open {
        /// Unit name as drawn in the plot (e.g. dbus.service)
        service: String,

        #[arg(long)]
        mode: Option<Mode>,
    },

    /// Annotate a saved plot file
    Annotate {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Prints navigation requests for the operator to follow.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn jump(&self, request: NavigationRequest) {
        println!("{} {}", request.host, request.path);
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref());
    debug!("Config: {:?}", config);

    let code = match cli.command {
        Commands::Plot { mode, format, output } => {
            let mode = mode.unwrap_or(config.view.default_mode);
            let session = PlotSession::new(SystemdAnalyze::from_config(&config.analyze), &config);
            emit(&session, mode, format, output.as_deref()).await?
        }
        Commands::Annotate { file, format, output } => {
            let mode = config.view.default_mode;
            let session = PlotSession::new(SavedPlot::new(&file), &config);
            emit(&session, mode, format, output.as_deref()).await?
        }
        Commands::Entries { mode } => {
            let mode = mode.unwrap_or(config.view.default_mode);
            let session = PlotSession::new(SystemdAnalyze::from_config(&config.analyze), &config);
            session.refresh(mode).await;
            match session.result().await {
                PipelineResult::Success(plot) => {
                    print!("{}", render::render_entries(&plot));
                    EXIT_SUCCESS
                }
                other => report_failure(&other),
            }
        }
        Commands::Open { service, mode } => {
            let mode = mode.unwrap_or(config.view.default_mode);
            let session = PlotSession::new(SystemdAnalyze::from_config(&config.analyze), &config);
            session.refresh(mode).await;
            match session.result().await {
                PipelineResult::Success(plot) => {
                    let target = plot.entry_element(&service);
                    let request = match target {
                        Some(target) => session.handle_click(target, &PrintNavigator).await,
                        None => None,
                    };
                    if request.is_some() {
                        EXIT_SUCCESS
                    } else {
                        eprintln!("{} is not drawn in the {} startup plot", service, mode);
                        EXIT_FAILURE
                    }
                }
                other => report_failure(&other),
            }
        }
    };

    Ok(ExitCode::from(code))
}

async fn emit<A: Acquirer>(
    session: &PlotSession<A>,
    mode: Mode,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<u8> {
    session.refresh(mode).await;
    let result = session.result().await;
    let rendered = render::render(format, mode, &result)?;

    match output {
        Some(path) => std::fs::write(path, &rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", rendered),
    }

    Ok(match result {
        PipelineResult::Success(_) => EXIT_SUCCESS,
        _ => EXIT_FAILURE,
    })
}

fn report_failure(result: &PipelineResult) -> u8 {
    if let Some(failure) = result.as_failure() {
        eprintln!("{}", failure.message);
        eprintln!("{}", failure.detail);
    }
    EXIT_FAILURE
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
