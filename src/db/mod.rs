//! Database module
//!
//! Handles SQLite connection, migrations and the seed catalogue.

pub mod connection;
pub mod migrations;
pub mod seed;

pub use connection::{Database, DbError, DbResult};

/// Apply migrations and seed the catalogue
pub fn initialize(database: &Database) -> DbResult<i32> {
    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;
        seed::seed_catalogue(conn)?;
        migrations::get_schema_version(conn)
    })
}
