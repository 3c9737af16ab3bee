//! Entry point for the `kindle-gateway` binary.
//!
//! `kindle-gateway [serve]` runs the HTTP server; `kindle-gateway invoke`
//! reads one proxy event from stdin and prints the response.

use std::sync::Arc;

use kindle_gateway::{config::GatewayConfig, event::invoke, routes::create_router};
use kindle_launcher::{Ec2Config, Ec2Provider, StartupHandler};
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mode = std::env::args().nth(1);
    let (handler, listen_addr) = build_handler();

    match mode.as_deref() {
        None | Some("serve") => serve(handler, &listen_addr).await,
        Some("invoke") => invoke_once(&handler).await,
        Some(other) => {
            tracing::error!(mode = %other, "unknown mode; expected `serve` or `invoke`");
            std::process::exit(2);
        }
    }
}

fn build_handler() -> (StartupHandler<Ec2Provider>, String) {
    let env = |key: &str| std::env::var(key).ok();

    let config = match GatewayConfig::from_lookup(env) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "invalid gateway configuration");
            std::process::exit(1);
        }
    };

    let provider = match Ec2Config::from_lookup(env).and_then(Ec2Provider::new) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "failed to set up EC2 provider");
            std::process::exit(1);
        }
    };

    info!(
        instance_id = %config.instance_id,
        region = %provider.config().region,
        password_required = config.password.is_some(),
        "startup handler ready"
    );

    let handler = StartupHandler::new(provider, config.instance_id, config.password);
    (handler, config.listen_addr)
}

async fn serve(handler: StartupHandler<Ec2Provider>, addr: &str) {
    let app = create_router(Arc::new(handler));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, "kindle-gateway listening");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}

async fn invoke_once(handler: &StartupHandler<Ec2Provider>) {
    let mut event = Vec::new();
    if let Err(e) = tokio::io::stdin().read_to_end(&mut event).await {
        tracing::error!(error = %e, "failed to read event from stdin");
        std::process::exit(1);
    }

    match invoke(handler, &event).await {
        Ok(response) => println!("{response}"),
        Err(e) => {
            tracing::error!(error = %e, "invocation failed");
            std::process::exit(1);
        }
    }
}
