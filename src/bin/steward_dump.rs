//! steward-dump - Prints the metadata and resources behind an address.
//!
//! Reads the resource description and the child resources from the demo
//! server and writes them to stdout as JSON. Useful for inspecting what
//! the console sees without opening it.
//!
//! Usage:
//!   steward-dump
//!   steward-dump --address "/console-extension=*" --pretty

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use steward::meta::address::AddressTemplate;
use steward::mgmt::addresses;
use steward::mgmt::client::ManagementClient;
use steward::mgmt::demo::DemoServer;

/// Dumps resource metadata and resources as JSON.
#[derive(Parser)]
#[command(name = "steward-dump", about = "Dump resource metadata as JSON", version)]
struct Args {
    /// Address template to read, for example "/subsystem=tls/key-manager=*".
    #[arg(long, default_value = addresses::KEY_MANAGER)]
    address: String,

    /// Pretty print the output.
    #[arg(long)]
    pretty: bool,
}

fn run(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let template = AddressTemplate::parse(&args.address)?;
    let client = DemoServer::new();
    let description = client.read_description(&template)?;
    let resources = client.read_children(&template)?;

    let dump = serde_json::json!({
        "address": template,
        "description": description,
        "resources": resources,
    });
    let text = if args.pretty {
        serde_json::to_string_pretty(&dump)?
    } else {
        serde_json::to_string(&dump)?
    };
    Ok(text)
}

fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(&args) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error reading '{}': {}", args.address, e);
            process::exit(1);
        }
    }
}
