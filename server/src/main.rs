//! Publisher Common ID server
//!
//! Serves the identifier-cookie pixel to site visitors and a settings API
//! to administrators:
//! 1. `GET /pubcid/v1/extend` on the public port
//! 2. `GET|POST /pubcid/v1/settings` on the admin port (loopback by default)
//!
//! Usage:
//!   pubcid-server --port 8080 --options /var/lib/pubcid/options.json
//!
//! Settings persist in a single JSON options file, created with defaults
//! on first start.

use std::{net::IpAddr, path::PathBuf, sync::Arc};
use anyhow::{Context, Result};
use clap::Parser;
use pubcid_cookie::Capabilities;
use pubcid_server::{build_admin_router, build_router, AppState, Deployment, DEFAULT_NAMESPACE};
use pubcid_settings::JsonFileOptionStore;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "pubcid-server")]
#[command(about = "Publisher Common ID cookie pixel server")]
struct Args {
    /// Public HTTP port for the pixel endpoint
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Address the public listener binds to
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// HTTP port for the settings API
    #[arg(long, default_value = "8081")]
    admin_port: u16,

    /// Address the settings API binds to
    #[arg(long, default_value = "127.0.0.1")]
    admin_bind: IpAddr,

    /// Path to the JSON options file
    #[arg(short, long, default_value = "pubcid-options.json")]
    options: PathBuf,

    /// Update the cookie on every request, not only on pixel calls
    #[arg(long, env = "PUBCID_ALL_PAGES")]
    all_pages: bool,

    /// Browser cache lifetime of the pixel, in days
    #[arg(long, env = "PUBCID_PIXEL_MAX_AGE", default_value = "1")]
    pixel_max_age: u64,

    /// Route prefix for the pixel and settings endpoints
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

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

    info!("Publisher Common ID server starting...");
    info!("Options file: {:?}", args.options);

    let deployment = Deployment {
        all_pages: args.all_pages,
        pixel_max_age_days: args.pixel_max_age,
        namespace: args.namespace.clone(),
    };
    let store = Arc::new(JsonFileOptionStore::new(&args.options));
    let state = Arc::new(AppState::new(store, Capabilities::with_builtins(), deployment));

    for notice in state.notices() {
        tracing::warn!(field = %notice.field, "{}", notice.message);
    }

    let public = tokio::net::TcpListener::bind((args.bind, args.port))
        .await
        .with_context(|| format!("Failed to bind public port {}", args.port))?;
    let admin = tokio::net::TcpListener::bind((args.admin_bind, args.admin_port))
        .await
        .with_context(|| format!("Failed to bind admin port {}", args.admin_port))?;

    let extend_route = state.deployment().route("extend");
    let settings_route = state.deployment().route("settings");

    println!("\n========================================");
    println!("  Publisher Common ID Running");
    println!("========================================");
    println!("  Pixel:     http://{}:{}{}", args.bind, args.port, extend_route);
    println!("  Settings:  http://{}:{}{}", args.admin_bind, args.admin_port, settings_route);
    println!("  All pages: {}", args.all_pages);
    println!("========================================\n");

    let public_app = build_router(Arc::clone(&state));
    let admin_app = build_admin_router(state);

    tokio::try_join!(
        async {
            axum::serve(public, public_app)
                .await
                .context("Public HTTP server failed")
        },
        async {
            axum::serve(admin, admin_app)
                .await
                .context("Admin HTTP server failed")
        },
    )?;

    Ok(())
}
