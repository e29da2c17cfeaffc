use anyhow::Result;
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use chime::{
    Config, JsonFileStore, KvStore, LogNotifier, Persister, RecurringStore, SweepService,
    TodoStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting chime daemon...");

    let kv: Arc<dyn KvStore> = Arc::new(JsonFileStore::new(&config.data_dir)?);
    let persister = Persister::new(kv.clone());

    let todos = Arc::new(TodoStore::load(&*kv, persister.clone()));
    let recurring = Arc::new(RecurringStore::load(&*kv, persister));

    let stats = todos.stats().await;
    info!(
        "Loaded {} todos ({} remaining) and {} recurring reminders",
        stats.total,
        stats.remaining,
        recurring.snapshot().await.len()
    );

    let notifier = Arc::new(LogNotifier);
    let service = Arc::new(SweepService::new(todos, recurring, notifier));

    for todo in service.upcoming().await {
        if let Some(at) = todo.reminder_at {
            info!("Upcoming: {} at {}", todo.text, at.to_rfc3339());
        }
    }

    let handle = service.start(config.poll_period(), config.clock_period());
    info!(
        "Reminder sweep started (poll every {}s, clock refresh every {}s)",
        config.poll_interval_secs, config.clock_refresh_secs
    );

    tokio::signal::ctrl_c().await?;

    info!("Shutting down...");
    handle.stop();

    Ok(())
}
