/// Users are identified by their PostgreSQL BIGINT id.
pub type UserId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Surrogate primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;
