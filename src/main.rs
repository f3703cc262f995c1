use std::sync::Arc;

mod api;
mod config;
mod handler;
mod http;
mod logger;
mod quotes;
mod server;
mod store;

/// Config file used when `--config` is not given (extension optional)
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path_from_args(std::env::args().skip(1))?;
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Tokio runtime; worker count comes from configuration when set
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr, cfg.server.backlog)?;

    let store = store::open(&cfg.storage);
    logger::log_server_start(&addr, &cfg, &store.describe());
    let state = Arc::new(config::AppState::new(cfg, store));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(listener, state))
        .await
}

/// `--config <path>` or `--config=<path>`; anything else is rejected
fn config_path_from_args(
    mut args: impl Iterator<Item = String>,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut path = DEFAULT_CONFIG_PATH.to_string();

    while let Some(arg) = args.next() {
        if arg == "--config" {
            path = args.next().ok_or("--config requires a path")?;
        } else if let Some(value) = arg.strip_prefix("--config=") {
            path = value.to_string();
        } else {
            return Err(format!("Unknown argument: {arg}").into());
        }
    }

    Ok(path)
}
