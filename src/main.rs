use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use accessibility_scanner::config::ScannerConfig;
use accessibility_scanner::error::{AppError, ErrorResponse};
use accessibility_scanner::{db, lifecycle, Application};

#[derive(Parser, Debug)]
#[command(name = "accessibility-scanner")]
#[command(version, about = "Scan a web page for accessibility defects and record the findings")]
struct Args {
    /// Page to scan (http or https)
    url: String,

    /// Account the scan is recorded under
    #[arg(default_value_t = 1)]
    account_id: i64,

    /// JSON config file; A11Y_* environment variables still override it
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match ScannerConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    lifecycle::init_logging(&config.log_filter);

    match run(&args, &config).await {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let response = ErrorResponse::from(&err);
            match serde_json::to_string_pretty(&response) {
                Ok(body) => println!("{}", body),
                Err(_) => eprintln!("{}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, config: &ScannerConfig) -> Result<String, AppError> {
    let pool = db::init_db(config).await?;
    let app = Application::new(config, pool)?;
    let token = lifecycle::cancel_on_ctrl_c();

    log::info!("[SCAN] Scanning {} for account {}", args.url, args.account_id);
    let report = app
        .scans
        .scan_from_cancellable(&args.url, args.account_id, token)
        .await?;

    serde_json::to_string_pretty(&report).map_err(|e| AppError::Other(e.into()))
}
