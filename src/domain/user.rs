use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Public view of a user. The password hash never leaves the auth service,
/// so this struct simply does not carry it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
