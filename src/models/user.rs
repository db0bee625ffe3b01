use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub username: String,

    #[serde(default)]
    pub email: String,

    pub password_hash: String,

    // unix seconds
    #[serde(default)]
    pub date_joined: i64,
}

/// What handlers and clients get to see of a user. No password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<User> for CurrentUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id.to_hex(),
            username: u.username,
            email: u.email,
        }
    }
}
