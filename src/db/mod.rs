//! Database module: the Connection Provider and the `test_data` table.
//!
//! Layout:
//! - `connection.rs`: `Connector` / `DbConnection` seams and `ConnectionProvider`
//! - `models.rs`: row structs
//! - `schema.rs`: SQL text per dialect
//! - `postgres.rs`, `sqlite.rs`: concrete single-connection backends

pub mod connection;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod sqlite;

pub use connection::{ConnectionProvider, Connector, DbConnection};
pub use models::TestRecord;
pub use postgres::PgConnector;
pub use sqlite::SqliteConnector;
