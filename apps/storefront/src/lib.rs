//! # Shelf Storefront Library
//!
//! Sign-in, catalog browsing and cart for the Shelf bookstore, driven from a
//! terminal shell.
//!
//! ## Module Organization
//! ```text
//! shelf_storefront/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── catalog.rs  ◄─── Loaded catalog
//! │   ├── session.rs  ◄─── Signed-in owner
//! │   ├── notice.rs   ◄─── Stock notice + auto-dismiss timer
//! │   ├── cart.rs     ◄─── Cart view and totals
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/       ◄─── One function per storefront action
//! ├── shell.rs        ◄─── Line parser and interactive loop
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod shell;
pub mod state;

use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use shelf_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use state::{CatalogState, ConfigError, ConfigState, DbState, NoticeState, SessionState};

/// Command line of the `shelf-storefront` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "shelf-storefront", version, about = "Shelf bookstore storefront")]
pub struct Cli {
    /// SQLite database file (default: SHELF_DB_PATH, then the app data directory)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Catalog JSON imported when the database has no books
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Print command results as JSON
    #[arg(long)]
    pub json: bool,
}

/// All storefront state, created once at startup.
#[derive(Debug)]
pub struct Storefront {
    pub db: DbState,
    pub catalog: CatalogState,
    pub session: SessionState,
    pub notices: NoticeState,
    pub config: ConfigState,
}

impl Storefront {
    /// Opens the database, loads the catalog and restores the session.
    pub async fn open(config: ConfigState, db_config: DbConfig) -> Result<Self, ApiError> {
        let db = Database::new(db_config).await?;
        info!("Database connected and migrations applied");

        let catalog = CatalogState::load(&db, &config).await?;

        let db = DbState::new(db);
        let session = SessionState::new();
        commands::session::restore_session(&db, &session).await?;

        Ok(Storefront {
            db,
            catalog,
            session,
            notices: NoticeState::new(),
            config,
        })
    }

    pub async fn close(&self) {
        self.db.inner().close().await;
    }
}

/// Runs the storefront shell.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging       tracing-subscriber, RUST_LOG override      │
/// │  2. Load Configuration       SHELF_* variables over defaults            │
/// │  3. Determine Database Path  --db, SHELF_DB_PATH, app data directory    │
/// │  4. Open Storefront          migrations, catalog import, session        │
/// │  5. Run Shell                until `quit` or end of input               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> Result<(), ApiError> {
    init_tracing();
    info!("Starting Shelf storefront");

    let mut config = ConfigState::from_env()?;
    if let Some(catalog) = cli.catalog.clone() {
        config.catalog_path = Some(catalog);
    }

    let db_path = get_database_path(cli.db.clone())?;
    info!(?db_path, "Database path determined");

    let app = Storefront::open(config, DbConfig::new(db_path)).await?;
    info!(books = app.catalog.len(), "Storefront ready");

    let result = shell::run_shell(&app, cli.json).await;
    app.close().await;
    result.map_err(|e| ApiError::internal(format!("Terminal I/O failed: {}", e)))
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never mix with shell output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shelf=trace` - Show trace for shelf crates only
/// - Default: `info,shelf=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shelf=debug,sqlx=warn"));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Determines the database file path.
///
/// ## Priority
/// 1. `--db` flag
/// 2. `SHELF_DB_PATH` environment variable
/// 3. Platform data directory:
///    - **macOS**: `~/Library/Application Support/com.shelf.storefront/shelf.db`
///    - **Windows**: `%APPDATA%\shelf\storefront\data\shelf.db`
///    - **Linux**: `~/.local/share/storefront/shelf.db`
pub fn get_database_path(flag: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = flag {
        return Ok(path);
    }

    if let Ok(path) = std::env::var("SHELF_DB_PATH") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let proj_dirs =
        ProjectDirs::from("com", "shelf", "storefront").ok_or(ConfigError::DataDirUnavailable)?;
    let data_dir = proj_dirs.data_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("shelf.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_flag_wins() {
        let path = get_database_path(Some(PathBuf::from("/tmp/custom.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["shelf-storefront", "--db", "x.db", "--json"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("x.db")));
        assert!(cli.json);
        assert!(cli.catalog.is_none());
    }

    #[tokio::test]
    async fn test_storefront_persists_session_and_cart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf.db");

        {
            let app = Storefront::open(ConfigState::default(), DbConfig::new(&path))
                .await
                .unwrap();
            commands::session::sign_in(&app.db, &app.session, "alice".into())
                .await
                .unwrap();
            commands::cart::add_to_cart(&app.db, &app.catalog, &app.session, &app.notices, &app.config, 1)
                .await
                .unwrap();
            app.close().await;
        }

        let app = Storefront::open(ConfigState::default(), DbConfig::new(&path))
            .await
            .unwrap();
        assert_eq!(app.session.current().await.as_deref(), Some("alice"));

        let cart = commands::cart::get_cart(&app.db, &app.catalog, &app.session, &app.config)
            .await
            .unwrap();
        assert_eq!(cart.totals.total_quantity, 1);
        app.close().await;
    }
}
