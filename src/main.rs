use anyhow::Result;
use dioxus_desktop::{Config, LogicalSize, WindowBuilder};
use std::any::Any;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mindflow::config::MindFlowConfig;
use mindflow::repository::{Repository, database::init_database};
use mindflow::ui_dioxus::App;

type ContextFactory = Box<dyn Fn() -> Box<dyn Any> + Send + Sync>;

fn context<T: Clone + Send + Sync + 'static>(value: T) -> ContextFactory {
    Box::new(move || Box::new(value.clone()))
}

fn main() -> Result<()> {
    let config = MindFlowConfig::load()?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let user = config.user();

    // Outlives the UI so the pool's background tasks keep running
    let rt = tokio::runtime::Runtime::new()?;
    let repository = rt.block_on(async {
        let pool = init_database(&config.database_url).await?;
        let repository = Repository::new(pool);
        repository.seed_default_categories(&user).await?;
        anyhow::Ok(Arc::new(repository))
    })?;

    info!(database = %config.database_url, user = %user, "Starting MindFlow");

    let window = WindowBuilder::new()
        .with_title("MindFlow")
        .with_inner_size(LogicalSize::new(1200.0, 800.0));

    dioxus_desktop::launch::launch(
        App,
        vec![context(repository), context(config), context(user)],
        Config::default().with_window(window),
    );

    Ok(())
}
