//! mesa-chd: MESA 10-year CHD risk calculator.
//!
//! # Usage
//!
//! ```bash
//! mesa-chd --query 'gender=m&age=60&tc=220&hdl=45&sbp=140&cac=100'
//! mesa-chd --json patient.json
//! mesa-chd gender=female age=52 systolicBP=128 calcification=0
//! ```

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mesa_chd::adapters::report::{JsonPresenter, TextPresenter};
use mesa_chd::adapters::sanitize::SanitizingMakeWriter;
use mesa_chd::application::AssessmentService;
use mesa_chd::cli::{parse_args, USAGE};
use mesa_chd::config::{AppConfig, LogMode, OutputFormat};
use mesa_chd::ports::ResultPresenter;

/// Install the tracing subscriber described by `config`.
///
/// The returned guard must stay alive for buffered log lines to be flushed.
fn init_logging(
    config: &AppConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let (writer, guard) = match config.log_mode {
        LogMode::Off => return Ok(None),
        LogMode::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogMode::File => {
            if let Some(parent) = config.log_file.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("creating log directory {}", parent.display())
                    })?;
                }
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_file)
                .with_context(|| format!("opening log file {}", config.log_file.display()))?;
            tracing_appender::non_blocking(file)
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(SanitizingMakeWriter::new(writer, config.sanitize_max_bytes)),
        )
        .init();

    Ok(Some(guard))
}

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    let _guard = init_logging(&config)?;
    for warning in &config.warnings {
        tracing::warn!("Configuration: {}", warning);
    }

    let Some(cli) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let presenter: Box<dyn ResultPresenter> = match cli.format.unwrap_or(config.output) {
        OutputFormat::Text => Box::new(TextPresenter),
        OutputFormat::Json => Box::new(JsonPresenter {
            include_details: !cli.result_only,
        }),
    };

    let service = AssessmentService::new(presenter);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    service
        .assess_and_present(cli.intake.as_ref(), &mut out)
        .context("risk assessment failed")?;

    Ok(())
}
