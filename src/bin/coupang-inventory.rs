use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use coupang_inventory::batch::DEFAULT_DELAY;
use coupang_inventory::config::{DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_FILE};
use coupang_inventory::inventory::DEFAULT_BASE_URL;
use coupang_inventory::{
    BatchRunner, CeaSigner, CredentialSource, InventoryClient, RunSettings, logging,
    run_inventory_report,
};

const DEFAULT_DELAY_MS: u64 = DEFAULT_DELAY.as_millis() as u64;

/// Looks up stock, price and sale status for every vendor item id in a CSV
/// file and writes the results to another CSV file.
///
/// Credentials are read from COUPANG_ACCESS_KEY and COUPANG_SECRET_KEY (the
/// dotenv file, when given, takes precedence over the process environment).
#[derive(Debug, Parser)]
#[command(name = "coupang-inventory", version)]
struct Cli {
    /// CSV file with a `옵션 id`, `option_id` or `vendorItemId` column.
    #[arg(long, default_value = DEFAULT_INPUT_FILE)]
    input: PathBuf,

    /// Report destination.
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Pause between API calls, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    delay_ms: u64,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout, in seconds.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    #[arg(long)]
    dotenv: Option<PathBuf>,

    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn settings(&self) -> RunSettings {
        RunSettings {
            input: self.input.clone(),
            output: self.output.clone(),
            delay: Duration::from_millis(self.delay_ms),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_tracing(cli.json_logs)?;

    let source = match cli.dotenv.as_deref() {
        Some(path) => CredentialSource::from_dotenv_file(path).await?,
        None => CredentialSource::default(),
    };
    let credentials = source.credentials()?;
    let settings = cli.settings();

    let client = InventoryClient::new(CeaSigner::new(credentials))
        .with_base_url(settings.base_url.as_str())
        .with_timeout(settings.timeout)?;
    let runner = BatchRunner::new(client).with_delay(settings.delay);

    tracing::info!(
        input = %settings.input.display(),
        output = %settings.output.display(),
        "coupang inventory lookup"
    );
    run_inventory_report(&settings, &runner).await?;
    Ok(())
}
