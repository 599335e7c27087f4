//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use logistik_core::ampel::AmpelRule;
use logistik_core::config::{Settings, CONFIG_DIR};
use logistik_db::DbPool;
use std::path::{Path, PathBuf};

pub mod customer;
pub mod init;
pub mod milestones;
pub mod overview;
pub mod partner;
pub mod serve;
pub mod shipment;

/// Default log file for `serve --log`, relative to the project directory.
pub const SERVE_LOG: &str = ".logistik/serve.log";

/// LogistikPro - Freight forwarding back office
#[derive(Parser)]
#[command(name = "logistik")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Database file (overrides config.toml)
    #[arg(long, global = true, env = "LOGISTIK_DB")]
    pub db: Option<PathBuf>,

    /// Traffic-light rule: completion, schedule or auto
    #[arg(long, global = true, env = "LOGISTIK_AMPEL_RULE")]
    pub ampel_rule: Option<AmpelRule>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a LogistikPro project directory
    Init(init::InitArgs),

    /// Start the web API server
    Serve(serve::ServeArgs),

    /// Shipment requests, quotes, bookings and milestones
    #[command(subcommand)]
    Shipment(shipment::ShipmentCommands),

    /// Customer master data
    #[command(subcommand)]
    Customer(customer::CustomerCommands),

    /// Partner master data
    #[command(subcommand)]
    Partner(partner::PartnerCommands),

    /// Show the milestone checklist for a transport mode
    Milestones(milestones::MilestonesArgs),

    /// Dashboard summary
    Overview,
}

/// Resolved project directory and settings for a command run.
pub struct Context {
    pub project_dir: PathBuf,
    pub settings: Settings,
}

impl Context {
    /// Open the project database, running migrations.
    pub fn pool(&self) -> Result<DbPool> {
        let db_path = self.settings.database_path(&self.project_dir);
        if !db_path.exists() && !self.project_dir.join(CONFIG_DIR).is_dir() {
            anyhow::bail!(
                "No LogistikPro project in {}. Run 'logistik init' first.",
                self.project_dir.display()
            );
        }
        tracing::debug!(path = %db_path.display(), "Opening database");
        Ok(logistik_db::init_pool(&db_path)?)
    }

    pub fn rule(&self) -> AmpelRule {
        self.settings.ampel_rule
    }
}

impl Cli {
    /// Project directory from `--project` or the working directory.
    pub fn project_dir(&self) -> Result<PathBuf> {
        match &self.project {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// Config file, then environment, then flags.
    fn context(&self, project_dir: &Path) -> Result<Context> {
        let mut settings = Settings::load(project_dir)?;
        if let Some(db) = &self.db {
            settings.database = Some(db.clone());
        }
        if let Some(rule) = self.ampel_rule {
            settings.ampel_rule = rule;
        }
        Ok(Context {
            project_dir: project_dir.to_path_buf(),
            settings,
        })
    }

    pub async fn execute(self) -> Result<()> {
        let project_dir = self.project_dir()?;
        let ctx = self.context(&project_dir)?;

        match self.command {
            Commands::Init(args) => init::execute(args, &ctx),
            Commands::Serve(args) => serve::execute(args, &ctx).await,
            Commands::Shipment(cmd) => shipment::execute(cmd, &ctx),
            Commands::Customer(cmd) => customer::execute(cmd, &ctx),
            Commands::Partner(cmd) => partner::execute(cmd, &ctx),
            Commands::Milestones(args) => milestones::execute(args),
            Commands::Overview => overview::execute(&ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "logistik",
            "--ampel-rule",
            "schedule",
            "shipment",
            "done",
            "7",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.ampel_rule, Some(AmpelRule::Schedule));
        assert!(matches!(cli.command, Commands::Shipment(_)));

        assert!(Cli::try_parse_from(["logistik", "--ampel-rule", "psychic", "overview"]).is_err());
    }

    #[test]
    fn test_parse_master_data_delete() {
        let cli = Cli::try_parse_from(["logistik", "partner", "delete", "4"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Partner(partner::PartnerCommands::Delete { id: 4 })
        ));

        let cli = Cli::try_parse_from(["logistik", "customer", "delete", "9"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Customer(customer::CustomerCommands::Delete { id: 9 })
        ));
    }

    #[test]
    fn test_flags_override_settings() {
        let dir = std::env::temp_dir().join("logistik-cli-context-test");
        let cli = Cli::try_parse_from([
            "logistik",
            "--db",
            "/tmp/other.db",
            "--ampel-rule",
            "completion",
            "overview",
        ])
        .unwrap();
        let ctx = cli.context(&dir).unwrap();
        assert_eq!(ctx.rule(), AmpelRule::Completion);
        assert_eq!(
            ctx.settings.database_path(&dir),
            PathBuf::from("/tmp/other.db")
        );
    }
}
