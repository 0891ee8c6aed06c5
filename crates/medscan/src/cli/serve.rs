//! The `medscan serve` command.

use clap::Args;
use medscan_core::Config;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides `server.host`)
    #[arg(long, env = "MEDSCAN_HOST")]
    pub host: Option<String>,

    /// Port to listen on (overrides `server.port`)
    #[arg(short, long, env = "MEDSCAN_PORT")]
    pub port: Option<u16>,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    crate::server::run_server(config).await
}
