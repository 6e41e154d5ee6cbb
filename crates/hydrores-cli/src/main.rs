//! hydrores - storm inflow and reservoir balance under turbine scenarios
//!
//! Runs all three turbine scenarios for the configured design storm and
//! writes the results under the configured output directory.

use clap::Parser;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "hydrores")]
#[command(about = "Reservoir water balance for a design storm under three turbine scenarios")]
struct Cli {
    /// Limit the contributing area to the basin below the snow line
    #[arg(long)]
    snow: bool,
}

fn main() {
    hydrores_cli::init_logging();

    let cli = Cli::parse();

    let config = match hydrores_cli::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = hydrores_cli::run(&config, cli.snow) {
        error!("{:#}", e);
        std::process::exit(1);
    }
    info!("Done");
}
