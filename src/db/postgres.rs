use crate::db::connection::{Connector, DbConnection};
use crate::db::models::TestRecord;
use crate::db::schema::{
    POSTGRES_INIT, POSTGRES_INSERT_IF_ABSENT, POSTGRES_INSERT_LOCK, POSTGRES_SELECT_RECENT,
};
use crate::error::ConnectionError;
use crate::types::credential::CredentialRecord;
use async_trait::async_trait;
use sqlx::Connection;
use sqlx::postgres::{PgConnectOptions, PgConnection};

#[derive(Debug, Clone, Copy, Default)]
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    async fn open(
        &self,
        creds: &CredentialRecord,
    ) -> Result<Box<dyn DbConnection>, ConnectionError> {
        let opts = PgConnectOptions::new()
            .host(&creds.host)
            .port(creds.port)
            .database(&creds.dbname)
            .username(&creds.username)
            .password(&creds.password);
        let conn = PgConnection::connect_with(&opts).await?;
        Ok(Box::new(PgDbConnection { conn }))
    }
}

pub struct PgDbConnection {
    conn: PgConnection,
}

#[async_trait]
impl DbConnection for PgDbConnection {
    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        sqlx::query("BEGIN").execute(&mut self.conn).await?;
        Ok(())
    }

    async fn ensure_schema(&mut self) -> Result<(), sqlx::Error> {
        sqlx::query(POSTGRES_INIT).execute(&mut self.conn).await?;
        Ok(())
    }

    async fn insert_if_absent(&mut self, message: &str) -> Result<bool, sqlx::Error> {
        // Held until COMMIT/ROLLBACK so concurrent callers cannot both pass NOT EXISTS.
        sqlx::query(POSTGRES_INSERT_LOCK)
            .execute(&mut self.conn)
            .await?;
        let res = sqlx::query(POSTGRES_INSERT_IF_ABSENT)
            .bind(message)
            .execute(&mut self.conn)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn recent(&mut self, limit: i64) -> Result<Vec<TestRecord>, sqlx::Error> {
        sqlx::query_as::<_, TestRecord>(POSTGRES_SELECT_RECENT)
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
