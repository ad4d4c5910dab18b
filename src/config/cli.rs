// src/config/cli.rs
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(name = "rust-balance")]
#[command(about = "Round-robin TCP relay and HTTP reverse proxy", long_about = None)]
pub struct Cli {
    /// The mode to balance on: tcp|http [default: tcp]
    #[arg(short, long)]
    pub mode: Option<String>,

    /// The address to bind on, e.g. 127.0.0.1:8080 or :8080
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Optional YAML or JSON file providing mode, bind and backends
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend servers as host:port
    pub backends: Vec<String>,
}
