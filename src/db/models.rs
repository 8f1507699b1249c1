use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of `test_data`, serialized as `{id, message, created_at}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct TestRecord {
    pub id: i64,
    pub message: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}
