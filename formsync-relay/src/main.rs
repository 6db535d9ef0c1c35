//! formsync announcement relay
//!
//! Links processes that edit the same records: every connection joins a
//! named channel and receives the update announcements the other
//! connections on that channel publish.
//!
//! Usage:
//!   formsync-relay --port 4101 --http-port 4102
//!
//! The relay keeps no history; announcements are forwarded and forgotten.

use std::sync::Arc;
use anyhow::{Context, Result};
use clap::Parser;
use formsync_relay::{build_router, serve, Hub};
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "formsync-relay")]
#[command(about = "Relay for formsync update announcements")]
struct Args {
    /// Port to listen on for channel connections (TCP)
    #[arg(short, long, default_value = "4101")]
    port: u16,

    /// HTTP API port for stats and health
    #[arg(long, default_value = "4102")]
    http_port: u16,

    /// Address to bind both listeners to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("formsync relay starting...");
    let hub = Arc::new(Hub::new());

    let relay_listener = TcpListener::bind((args.bind.as_str(), args.port))
        .await
        .with_context(|| format!("Failed to bind relay port {}", args.port))?;
    let http_listener = TcpListener::bind((args.bind.as_str(), args.http_port))
        .await
        .with_context(|| format!("Failed to bind HTTP port {}", args.http_port))?;

    let app = build_router(hub.clone());
    let http = tokio::spawn(async move { axum::serve(http_listener, app).await });
    info!("HTTP API listening on {}:{}", args.bind, args.http_port);

    println!("\n========================================");
    println!("  formsync Relay Running");
    println!("========================================");
    println!("  Relay Port: {}", args.port);
    println!("  HTTP Port:  {}", args.http_port);
    println!("========================================\n");

    tokio::select! {
        () = serve(relay_listener, hub) => {}
        res = http => res.context("HTTP task panicked")?.context("HTTP server failed")?,
    }
    Ok(())
}
