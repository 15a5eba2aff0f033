//! steward - Interactive terminal management console.
//!
//! Connects to the management endpoint (the built-in demo server), reads
//! the resource metadata and opens the console.
//!
//! Usage:
//!   steward                      # 250 ms tick, permissive access control
//!   steward 500                  # 500 ms tick
//!   steward --rbac               # role based access control
//!   steward --rbac --role monitor
//!   steward --log-file out.log   # append logs to a file

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use steward::meta::security::{AccessControlProvider, Environment};
use steward::mgmt::demo::DemoServer;
use steward::mgmt::verify::{DemoScriptCheck, ScriptVerifier};
use steward::tui::app::App;

/// Default tick interval in milliseconds.
const DEFAULT_INTERVAL: u64 = 250;

/// Interactive terminal management console.
#[derive(Parser)]
#[command(name = "steward", about = "Terminal management console", version)]
struct Args {
    /// Tick interval in milliseconds (default: 250).
    /// Drives spinners and status expiry.
    #[arg(value_name = "INTERVAL")]
    interval: Option<u64>,

    /// Append logs to this file. The terminal itself belongs to the UI,
    /// so without this option logging is disabled.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Use role based access control instead of the permissive default.
    #[arg(long)]
    rbac: bool,

    /// Act as this role: administrator (default) or monitor.
    /// Only meaningful together with --rbac.
    #[arg(long, value_name = "ROLE")]
    role: Option<String>,
}

fn init_logging(path: &PathBuf) -> std::io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn main() {
    let args = Args::parse();

    // Validate arguments
    if args.interval == Some(0) {
        eprintln!("Error: interval must be greater than zero");
        process::exit(1);
    }
    if args.role.is_some() && !args.rbac {
        eprintln!("Error: --role only makes sense together with --rbac");
        process::exit(1);
    }
    match args.role.as_deref() {
        None | Some("administrator") | Some("monitor") => {}
        Some(other) => {
            eprintln!("Error: unknown role '{}' (try administrator or monitor)", other);
            process::exit(1);
        }
    }

    if let Some(path) = &args.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("Error opening log file '{}': {}", path.display(), e);
            process::exit(1);
        }
    }

    let access_control = if args.rbac {
        AccessControlProvider::Rbac
    } else {
        AccessControlProvider::Simple
    };
    let mut environment =
        Environment::new("demo-server", env!("CARGO_PKG_VERSION"), access_control);
    if let Some(role) = &args.role {
        environment = environment.with_role(role.as_str());
    }

    // A monitor sees everything read-only; everyone else gets the full
    // per-resource permissions the endpoint grants.
    let client = if args.role.as_deref() == Some("monitor") {
        DemoServer::read_only()
    } else {
        DemoServer::new()
    };
    let verifier = ScriptVerifier::new(Arc::new(DemoScriptCheck));

    let app = match App::new(Box::new(client), verifier, environment) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error starting the console: {}", e);
            process::exit(1);
        }
    };

    let interval = args.interval.unwrap_or(DEFAULT_INTERVAL);
    if let Err(e) = app.run(Duration::from_millis(interval)) {
        eprintln!("Error running the console: {}", e);
        process::exit(1);
    }
}
