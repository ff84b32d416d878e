//! Roster - terminal front end for the student roster.
//!
//! Reads commands from stdin and prints the current page after each one.
//! The backend is a local JSON file unless `ROSTER_API_MODE` selects the
//! REST service.

use roster_client::{notice, open_store, shell, Config, Result, Session};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!(
        api_mode = config.api_mode,
        page_size = config.page_size,
        "Starting roster"
    );

    let store = open_store(&config);
    let (tx, mut rx) = notice::channel();
    let mut session = Session::with_config(store, &config, tx);

    if let Err(e) = session.load().await {
        tracing::error!(error = %e, "Initial load failed, starting empty");
    }

    let stdin = BufReader::new(tokio::io::stdin());
    shell::run(&mut session, &mut rx, stdin, tokio::io::stdout()).await?;

    Ok(())
}
