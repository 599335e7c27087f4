//! Project initialization command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use logistik_core::config::{Settings, CONFIG_DIR, CONFIG_FILE};

use super::Context;

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml with defaults
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InitArgs, ctx: &Context) -> Result<()> {
    let config_dir = ctx.project_dir.join(CONFIG_DIR);
    std::fs::create_dir_all(&config_dir)?;

    let config_path = config_dir.join(CONFIG_FILE);
    if args.force || !config_path.exists() {
        std::fs::write(&config_path, Settings::default().to_toml_string()?)?;
        println!("{} Wrote {}", "✓".green().bold(), config_path.display());
    } else {
        println!("{} Keeping existing {}", "·".dimmed(), config_path.display());
    }

    let db_path = ctx.settings.database_path(&ctx.project_dir);
    logistik_db::init_pool(&db_path)?;
    tracing::info!(path = %db_path.display(), "Database ready");

    println!("{} Database: {}", "✓".green().bold(), db_path.display());
    println!();
    println!("{}", "Next steps:".bold());
    println!("  logistik customer new <name>          # Add your first customer");
    println!("  logistik shipment new AIR --customer 1  # Record a request");
    println!("  logistik serve                        # Start the web API");

    Ok(())
}
