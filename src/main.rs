mod config;
mod errors;
mod inventory;
mod logging;
mod utils;

use crate::config::{InventoryConfig, DEFAULT_TIMEOUT_SECS, METADATA_URL};
use crate::errors::Error;
use crate::utils::VERSION;
use clap::builder::NonEmptyStringValueParser;
use clap::{ArgGroup, Parser};
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;

/// OpenStack dynamic inventory, grouping hosts from instance metadata
#[derive(Parser, Debug)]
#[command(
    name = "openstack-inventory",
    version = VERSION,
    group(ArgGroup::new("mode").required(true).args(["list", "host"]))
)]
struct Args {
    /// List inventory groups
    #[arg(long)]
    list: bool,

    /// Show variables for a single host
    #[arg(long, value_name = "HOSTNAME", value_parser = NonEmptyStringValueParser::new())]
    host: Option<String>,

    /// Metadata document to read the groups from
    #[arg(long, value_name = "URL", default_value = METADATA_URL)]
    metadata_url: String,

    /// Timeout for the metadata request, in seconds
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,
}

impl From<&Args> for InventoryConfig {
    fn from(args: &Args) -> Self {
        InventoryConfig::new(args.metadata_url.clone(), Duration::from_secs(args.timeout))
    }
}

async fn run(args: Args) -> Result<String, Error> {
    if let Some(hostname) = &args.host {
        inventory::get_host(hostname)
    } else {
        inventory::list_groups(&InventoryConfig::from(&args)).await
    }
}

/// Write the rendered inventory followed by a newline. Nothing is written on error paths.
fn emit<W: Write>(out: &mut W, output: &str) -> Result<(), Error> {
    writeln!(out, "{output}")?;
    out.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::setup_tracing() {
        eprintln!("openstack-inventory: {e}");
        return ExitCode::from(e.exit_code());
    }

    let result = match run(args).await {
        Ok(output) => emit(&mut std::io::stdout().lock(), &output),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("inventory failed: {:?}", e);
            eprintln!("openstack-inventory: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
