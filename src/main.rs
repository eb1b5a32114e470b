mod config;
mod error;
mod plex;
mod proxy;
mod rewrite;

use clap::Parser;
use config::Config;
use proxy::make_proxy;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {

    env_logger::init();

    let config = Config::parse();
    config.log_settings();

    let proxy = make_proxy(&config)?;

    let listener = TcpListener::bind(&config.bind_address).await?;
    log::info!("binding to {}", listener.local_addr()?);
    axum::serve(listener, proxy).await?;

    Ok(())
}
