/// Opaque entity identifier, assigned by the store on insert.
///
/// Always a 24-character lowercase hex string; never client-supplied.
pub type Id = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
