use crate::db::connection::{Connector, DbConnection};
use crate::db::models::TestRecord;
use crate::db::schema::{SQLITE_INIT, SQLITE_INSERT_IF_ABSENT, SQLITE_SELECT_RECENT};
use crate::error::ConnectionError;
use crate::types::credential::CredentialRecord;
use async_trait::async_trait;
use sqlx::Connection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};

/// Treats `dbname` as a database file path; `host`, `port` and the login
/// fields are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConnector;

#[async_trait]
impl Connector for SqliteConnector {
    async fn open(
        &self,
        creds: &CredentialRecord,
    ) -> Result<Box<dyn DbConnection>, ConnectionError> {
        let opts = SqliteConnectOptions::new()
            .filename(&creds.dbname)
            .create_if_missing(true);
        let conn = SqliteConnection::connect_with(&opts).await?;
        Ok(Box::new(SqliteDbConnection { conn }))
    }
}

pub struct SqliteDbConnection {
    conn: SqliteConnection,
}

#[async_trait]
impl DbConnection for SqliteDbConnection {
    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        sqlx::query("BEGIN").execute(&mut self.conn).await?;
        Ok(())
    }

    async fn ensure_schema(&mut self) -> Result<(), sqlx::Error> {
        sqlx::query(SQLITE_INIT).execute(&mut self.conn).await?;
        Ok(())
    }

    async fn insert_if_absent(&mut self, message: &str) -> Result<bool, sqlx::Error> {
        let res = sqlx::query(SQLITE_INSERT_IF_ABSENT)
            .bind(message)
            .bind(message)
            .execute(&mut self.conn)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn recent(&mut self, limit: i64) -> Result<Vec<TestRecord>, sqlx::Error> {
        sqlx::query_as::<_, TestRecord>(SQLITE_SELECT_RECENT)
            .bind(limit)
            .fetch_all(&mut self.conn)
            .await
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        sqlx::query("COMMIT").execute(&mut self.conn).await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), sqlx::Error> {
        self.conn.close().await
    }
}
