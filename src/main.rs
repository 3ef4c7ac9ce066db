use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use log::{ error, info };

mod cli;
use cli::{ Commands, SynthCli };
use cli::commands::synthesize::SynthesizeArgs;

/// Exit code for fatal errors
const EXIT_FATAL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse the command line arguments
    let cli = SynthCli::parse();

    // Setup logging
    setup_logging(&cli.log_level);

    // Credentials may come from a .env file
    if dotenv::dotenv().is_ok() {
        info!("Loaded environment from .env");
    }

    match run(&cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            cli::ui::print_error(&format!("{:#}", e));
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Process exit code: 0 verified, 1 attempts exhausted
async fn run(cli: &SynthCli) -> Result<u8> {
    let config = cli::commands::load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Synthesize {
            src_dir,
            project,
            statement,
            statement_path,
            model,
            cbc_id,
            slot,
            loop_update,
            max_attempts,
            output,
            report,
        } => {
            let args = SynthesizeArgs {
                src_dir,
                project,
                statement,
                statement_path,
                model,
                cbc_id,
                slot,
                loop_update: *loop_update,
                max_attempts: *max_attempts,
                output: output.as_deref(),
                report: report.as_deref(),
            };
            let status = cli::commands::synthesize::execute(config, args).await?;
            Ok(status.exit_code())
        }

        Commands::Extract { statement_path, statement, model, cbc_id } => {
            cli::commands::extract::execute(&config, statement_path, statement, model, cbc_id).await?;
            Ok(0)
        }

        Commands::Evaluate { diagrams, projects, skip, runs, results } => {
            cli::commands::evaluate::execute(
                config,
                diagrams,
                projects.as_deref(),
                skip,
                *runs,
                results.as_deref()
            ).await?;
            Ok(0)
        }
    }
}

fn setup_logging(log_level: &str) {
    // Set up the logger based on the log level
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
