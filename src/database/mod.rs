// Copyright 2023 Remi Bernotavicius

use diesel::prelude::Connection as _;
use diesel::RunQueryDsl as _;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::error::Error;
use std::path::Path;

pub mod models;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Opens (or creates) the database at `path` and brings its schema up to date. Passing
/// `":memory:"` gives a fresh private database.
pub fn establish_connection(
    path: impl AsRef<Path>,
) -> Result<Connection, Box<dyn Error + Send + Sync + 'static>> {
    let path = path.as_ref();
    let url = path
        .to_str()
        .ok_or_else(|| format!("database path {path:?} is not valid UTF-8"))?;
    let mut connection = Connection::establish(url)?;

    // SQLite leaves foreign keys unenforced unless asked, per connection.
    diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut connection)?;

    connection.run_pending_migrations(MIGRATIONS)?;
    log::debug!("database ready at {url}");
    Ok(connection)
}

#[cfg(test)]
pub fn test_connection() -> Connection {
    establish_connection(":memory:").unwrap()
}

#[test]
fn migrations() {
    let mut conn = test_connection();

    conn.revert_all_migrations(MIGRATIONS).unwrap();
    assert!(conn.has_pending_migration(MIGRATIONS).unwrap());

    conn.run_pending_migrations(MIGRATIONS).unwrap();
    assert!(!conn.has_pending_migration(MIGRATIONS).unwrap());
}

#[test]
fn default_units_seeded() {
    use diesel::ExpressionMethods as _;
    use diesel::QueryDsl as _;
    use schema::units::dsl::*;

    let mut conn = test_connection();
    let names: Vec<String> = units.select(name).order_by(id.asc()).load(&mut conn).unwrap();
    assert_eq!(names, ["g", "kg", "ml", "l", "piece"]);
}
