/// All database primary keys are PostgreSQL BIGSERIAL, except comments (UUID).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
