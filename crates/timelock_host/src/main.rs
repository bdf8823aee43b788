use timelock_host::app::{run, HostConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let config = match HostConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "ignoring invalid environment, using defaults");
            HostConfig::default()
        }
    };
    if let Err(err) = run(config).await {
        eprintln!("Failed to schedule reminders: {err:#}");
    }
}
