use std::path::Path;
use std::sync::Arc;

use devserve::config::{self, AppState};
use devserve::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg.logging)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    // Resolved once; handlers only ever see this snapshot
    let key = config::key::resolve_from_env(&cfg.key);

    if !Path::new(&cfg.server.root).is_dir() {
        logger::log_warning(&format!(
            "Serving root '{}' is not a directory; every file request will 404",
            cfg.server.root
        ));
    }

    let listener = match server::bind(&cfg.server) {
        Ok(l) => l,
        Err(e) => {
            logger::log_error(&e.to_string());
            return Err(e.into());
        }
    };
    let addr = listener.local_addr()?;

    let state = Arc::new(AppState::new(cfg, key));
    logger::log_server_start(&addr, &state);

    server::start_server_loop(listener, state, server::shutdown_signal()).await;
    Ok(())
}
