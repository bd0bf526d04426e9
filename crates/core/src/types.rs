/// Database primary keys are PostgreSQL BIGSERIAL. Ledger-side record ids
/// share the same width so the two never need separate plumbing.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
