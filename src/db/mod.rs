use sqlx::migrate::Migrator;

mod pool;

pub use pool::create_pool;

/// Embedded schema migrations, run at startup and checked by `/readyz`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
