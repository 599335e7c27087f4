//! Milestone catalog command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use logistik_core::milestone;

use crate::output;

#[derive(Args)]
pub struct MilestonesArgs {
    /// Transport type (AIR, SEA, TRUCK)
    pub transport: String,

    /// Direction (EXPORT or IMPORT)
    #[arg(default_value = "EXPORT")]
    pub direction: String,
}

pub fn execute(args: MilestonesArgs) -> Result<()> {
    let selection = milestone::select_catalog(&args.transport, &args.direction);
    if selection.fallback {
        println!(
            "{} Unknown transport type '{}', showing {}",
            "!".yellow().bold(),
            args.transport,
            selection.key.as_str()
        );
    }

    output::print_catalog(selection.key, selection.key.milestones());
    Ok(())
}
