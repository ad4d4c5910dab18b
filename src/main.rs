// src/main.rs
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use rust_balance::{
    config::{self, BalanceMode, Cli, ConfigError, Settings},
    load_balancer::{create_load_balancer, LoadBalancer},
    proxy::Proxy,
    server::{RequestHandler, ServerBuilder, TcpRelay},
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("rust_balance=info,hyper=info")
            }),
        )
        .init();

    let cli = Cli::parse();

    let settings = match config::from_cli(cli).await {
        Ok(settings) => settings,
        Err(ConfigError::InvalidMode(mode)) => {
            // Not fatal: note it and exit without serving.
            error!("invalid balance mode {}", mode);
            return;
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(settings).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> Result<()> {
    let balancer = create_load_balancer(settings.backends.clone())?;
    let bind = settings.bind_address();

    match settings.mode {
        BalanceMode::Tcp => {
            info!("using tcp balancing");
            let relay = TcpRelay::bind(&bind, balancer.clone()).await?;
            announce(&settings.bind, balancer.as_ref());
            relay.serve().await
        }
        BalanceMode::Http => {
            info!("using http balancing");
            let proxy = Arc::new(Proxy::new(balancer.clone()));
            let server = ServerBuilder::new(bind)
                .with_handler(RequestHandler::new(proxy))
                .bind()
                .await?;
            announce(&settings.bind, balancer.as_ref());
            server.serve().await
        }
    }
}

fn announce(bind: &str, balancer: &dyn LoadBalancer) {
    info!(
        algorithm = balancer.name(),
        "listening on {}, balancing {} backends",
        bind,
        balancer.len()
    );
}
