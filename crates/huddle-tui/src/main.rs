// Huddle entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open database and hydrate the roster session
// 4. Run the TUI until the user quits

use anyhow::Context;
use huddle_core::config;
use huddle_core::db::Database;
use huddle_core::{Session, SqliteSnapshotStore};
use huddle_tui::app::App;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Huddle starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: max name length {}, teams {}..={} (default {})",
        config.roster.max_name_len,
        config.teams.min_count,
        config.teams.max_count,
        config.teams.default_count
    );

    let db_path = config
        .storage
        .resolve_db_path()
        .context("failed to resolve database path")?;
    let db_path = db_path
        .to_str()
        .context("database path is not valid UTF-8")?
        .to_string();
    let db = Database::open(&db_path).context("failed to open database")?;
    info!("Database opened at {}", db_path);

    let store = SqliteSnapshotStore::new(db, config.storage.snapshot_key.clone());
    let session = Session::start(config.roster.name_policy(), store);
    let app = App::new(session, &config);

    if let Err(e) = huddle_tui::run(app).await {
        error!("TUI exited with error: {:#}", e);
        return Err(e);
    }

    info!("Huddle shut down cleanly");
    Ok(())
}

/// Log to `logs/huddle.log` under the working directory. The terminal
/// belongs to the TUI.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("huddle.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("huddle_core=info,huddle_tui=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
