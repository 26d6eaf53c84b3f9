use std::net::SocketAddr;

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::app::CatalogApp;
use crate::config::CatalogConfig;
use crate::server;

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides `server.listen`)
    #[arg(long)]
    pub listen: Option<SocketAddr>,
}

pub async fn cmd_serve(args: ServeArgs, mut config: CatalogConfig) -> Result<()> {
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    let addr = config.server.listen;
    info!(
        protected = ?config.auth.access_policy().protected_methods(),
        "access policy loaded"
    );

    let app = CatalogApp::build(config).await?;
    server::serve(app, addr).await
}
