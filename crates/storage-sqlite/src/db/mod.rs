//! Connection setup for the cache database.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use diesel::connection::{Connection, SimpleConnection};
use diesel::r2d2::{self, ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{error, info};

use crate::errors::StorageError;
use qfinance_core::constants::CACHE_DB_FILE_NAME;
use qfinance_core::errors::{DatabaseError, Error, Result};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Prepare the database file inside `cache_dir` and return its path.
pub fn init(cache_dir: &Path) -> Result<String> {
    if !cache_dir.exists() {
        info!("Creating cache directory {}", cache_dir.display());
        fs::create_dir_all(cache_dir)
            .map_err(|e| DatabaseError::ConnectionFailed(format!("{}: {}", cache_dir.display(), e)))?;
    }

    let db_path = get_db_path(cache_dir);
    let mut conn = SqliteConnection::establish(&db_path).map_err(StorageError::from)?;
    conn.batch_execute(
        "
            PRAGMA journal_mode = WAL;
            PRAGMA busy_timeout = 30000;
            PRAGMA synchronous = FULL;
        ",
    )
    .map_err(StorageError::from)?;

    Ok(db_path)
}

pub fn get_db_path(cache_dir: &Path) -> String {
    cache_dir.join(CACHE_DB_FILE_NAME).to_string_lossy().into_owned()
}

pub fn create_pool(db_path: &str) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = r2d2::Pool::builder()
        .max_size(4)
        .min_idle(Some(1))
        .connection_timeout(std::time::Duration::from_secs(30))
        .connection_customizer(Box::new(ConnectionCustomizer))
        .build(manager)
        .map_err(StorageError::from)?;
    Ok(Arc::new(pool))
}

pub fn run_migrations(pool: &DbPool) -> Result<()> {
    info!("Running database migrations");
    let mut connection = get_connection(pool)?;

    let applied = connection.run_pending_migrations(MIGRATIONS).map_err(|e| {
        error!("Database migration failed: {}", e);
        Error::Database(DatabaseError::MigrationFailed(e.to_string()))
    })?;

    if applied.is_empty() {
        info!("No pending migrations to apply.");
    } else {
        for version in &applied {
            info!("Applied migration {}", version);
        }
    }
    Ok(())
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection> {
    Ok(pool.get().map_err(StorageError::from)?)
}

/// Init, pool and migrations in one step.
pub fn open(cache_dir: &Path) -> Result<Arc<DbPool>> {
    let db_path = init(cache_dir)?;
    info!("Cache database: {}", db_path);
    let pool = create_pool(&db_path)?;
    run_migrations(&pool)?;
    Ok(pool)
}

#[derive(Debug)]
struct ConnectionCustomizer;

// Writes are durable once `put` returns.
impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionCustomizer {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute(
            "
                PRAGMA busy_timeout = 30000;
                PRAGMA synchronous = FULL;
            ",
        )
        .map_err(r2d2::Error::QueryError)
    }
}
