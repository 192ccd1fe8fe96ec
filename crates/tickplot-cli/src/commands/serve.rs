use std::net::SocketAddr;
use std::sync::Arc;

use tickplot_web::{app_router, AppState};
use tokio::net::TcpListener;

use super::{build_service, service_config};
use crate::cli::{Cli, ServeArgs};
use crate::error::CliError;

pub async fn run(cli: &Cli, args: &ServeArgs) -> Result<(), CliError> {
    let addr: SocketAddr = args.listen.parse().map_err(|source| CliError::ListenAddr {
        value: args.listen.clone(),
        source,
    })?;

    std::fs::create_dir_all(&cli.static_dir)?;
    let service = build_service(cli, service_config(cli));
    let state = Arc::new(AppState::new(service, cli.static_dir.clone()));

    let listener = TcpListener::bind(addr).await?;
    tickplot_web::serve(listener, app_router(state)).await?;
    Ok(())
}
