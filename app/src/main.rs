use bindkit::{Config, Server};
use clap::Parser;
use std::path::PathBuf;

/// Demo server for bindkit
#[derive(Parser)]
#[command(name = "app")]
#[command(about = "bindkit demo server")]
struct Cli {
    /// Directory holding the .env files
    #[arg(long, default_value = ".")]
    root: PathBuf,
    /// Override SERVER_HOST
    #[arg(long)]
    host: Option<String>,
    /// Override SERVER_PORT
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let environment = app::telemetry::init(&cli.root);
    let config = Config::for_environment(environment);

    let mut server = Server::from_config(app::router(config.binding.clone()), &config.server);
    if let Some(host) = &cli.host {
        server = server.host(host);
    }
    if let Some(port) = cli.port {
        server = server.port(port);
    }

    server.run().await
}
