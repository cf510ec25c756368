use std::{net::SocketAddr, path::PathBuf, process::exit};

use axum_server::Handle;
use clap::Parser;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use bank_analytics::{
    AppState, add_tracing_layer, build_router, graceful_shutdown, setup_server_logging,
};

/// The web server for the bank customer analytics dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database containing the customer views.
    #[arg(long, env = "BANK_DB_PATH", default_value = "bank.db")]
    db_path: PathBuf,

    /// The port to serve the dashboard from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// File to append debug logs to.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(error) = setup_server_logging(&args.log_path) {
        eprintln!("Could not open log file {:?}: {error}", args.log_path);
        exit(1);
    }

    let state = AppState::new(args.db_path);
    let db_path = state.cache.db_path();

    if !db_path.is_file() {
        tracing::warn!(
            "Database file {db_path:?} does not exist, pages will show an error until it is created"
        );
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on http://{}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped: {error}");
        exit(1);
    }
}
