//! netselect - pick the fastest hosts by ICMP latency

use clap::{error::ErrorKind, Parser};
use netselect::{
    build_info,
    cli::Cli,
    config::{display_config_summary, validate_config, ConfigParser, EnvManager},
    error::{install_panic_hook, panic_to_error, AppError, ErrorReporter, Result},
    logging::LoggerFactory,
    log_debug, log_info,
    models::{Config, Host},
    output::OutputCoordinator,
    selector::NetSelector,
    PKG_NAME, VERSION,
};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    install_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand | ErrorKind::DisplayVersion => {
                e.exit()
            }
            _ => {
                let _ = e.print();
                process::exit(1);
            }
        },
    };

    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose);

    let result = match AssertUnwindSafe(run_application(cli)).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(panic_to_error(payload.as_ref())),
    };

    if let Err(e) = result {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.version {
        println!("{}", build_info::version_line());
        return Ok(());
    }

    if cli.env_help {
        println!("{}", EnvManager::display_env_help());
        return Ok(());
    }

    cli.validate().map_err(AppError::config)?;

    let config = ConfigParser::new(cli).parse()?;

    if config.debug {
        eprintln!("{} v{}", PKG_NAME, VERSION);
        eprintln!("{}", display_config_summary(&config));
        eprintln!();
    }

    if config.verbose {
        report_config_warnings(&config)?;
    }

    let factory = LoggerFactory::new(config.clone());
    let logger = factory.create_logger("MAIN").await;
    log_debug!(logger, "Session {} started", factory.session_id());

    let hosts = config
        .hosts
        .iter()
        .map(|address| Host::parse(address))
        .collect::<Result<Vec<_>>>()?;

    let selector = NetSelector::new(hosts)
        .with_config(config.selector_config())
        .with_logger(logger.child("SELECT"));

    let (ranked, summary) = match selector.select_with_summary().await {
        Ok(result) => result,
        Err(e) => {
            if config.debug {
                factory.create_error_logger().await.log_error(&e, Some("selection")).await;
            }
            return Err(e);
        }
    };

    let coordinator = OutputCoordinator::from_config(&config);
    println!("{}", coordinator.display_selection(&ranked, &summary)?);

    if !summary.any_responded() {
        return Err(AppError::probe_unavailable(format!(
            "none of the {} host(s) responded",
            summary.total
        )));
    }

    log_info!(
        logger,
        "{} of {} host(s) responded",
        summary.successful,
        summary.total
    );

    Ok(())
}

/// Print advisory configuration warnings to stderr
fn report_config_warnings(config: &Config) -> Result<()> {
    let coordinator = OutputCoordinator::from_config(config);

    for warning in EnvManager::validate_current_env() {
        eprintln!("{}", coordinator.display_warning(&warning)?);
    }

    if let Some(warnings) = EnvManager::check_env_file(Path::new(".env"))? {
        for warning in warnings {
            eprintln!("{}", coordinator.display_warning(&format!(".env: {}", warning))?);
        }
    }

    for warning in validate_config(config)? {
        eprintln!("{}", warning.format(config.enable_color));
    }

    Ok(())
}
