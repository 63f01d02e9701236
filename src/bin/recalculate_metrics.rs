//! Recompute cached body metrics for every user
//! Usage: FITCOMP_DATABASE_PATH=data/fitcompanion.db cargo run --bin recalculate_metrics

use std::path::PathBuf;

use fitcompanion::db::{self, Database};
use fitcompanion::services::body_metrics::recalculate_all;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let db_path = std::env::var("FITCOMP_DATABASE_PATH")
        .map(PathBuf::from)
        .map_err(|_| "FITCOMP_DATABASE_PATH must point at a database file")?;
    println!("Database: {}", db_path.display());

    let database = Database::new(&db_path)?;
    db::initialize(&database)?;

    let summary = database.with_conn(recalculate_all)?;
    println!("Updated: {}", summary.updated);
    println!("Skipped (incomplete or invalid profile): {}", summary.skipped);

    Ok(())
}
