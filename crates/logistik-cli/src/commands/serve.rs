//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use super::Context;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (default from config, 3040)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to (default from config, 127.0.0.1)
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (defaults to .logistik/serve.log)
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, ctx: &Context) -> Result<()> {
    let pool = Arc::new(ctx.pool()?);
    let host = args.host.unwrap_or_else(|| ctx.settings.server.host.clone());
    let port = args.port.unwrap_or(ctx.settings.server.port);

    println!();
    println!("  {} {}", "LogistikPro".cyan().bold(), "Web Server".bold());
    println!();
    println!("  {}        http://{}:{}/api", "API".green(), host, port);
    println!("  {}  ws://{}:{}/ws", "WebSocket".green(), host, port);
    println!("  {}      {}", "Ampel".green(), ctx.rule().as_str());
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    logistik_web::run_server(pool, ctx.rule(), &host, port).await?;

    Ok(())
}
