use std::error::Error;

use todo_server::chat::GeminiClient;
use todo_server::config::Config;
use todo_server::dates::SystemClock;
use todo_server::server::{self, App};
use todo_server::store::TaskStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let store = TaskStore::open(&config.db_path)?;
    info!(db = %config.db_path.display(), "tasks table ready");
    if config.gemini.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; chat replies will report the missing key");
    }
    if !config.web_root.is_dir() {
        warn!(web_root = %config.web_root.display(), "static directory not found");
    }

    let app = App {
        store,
        model: Box::new(GeminiClient::new(config.gemini.clone())),
        clock: Box::new(SystemClock),
        web_root: config.web_root.clone(),
    };
    server::serve(&app, &config.host, config.port)?;
    Ok(())
}
