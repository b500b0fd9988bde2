use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Alternate email address registered as belonging to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAlias {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub email: String,
    pub created_at: DateTime,
}

impl UserAlias {
    pub const COLLECTION: &'static str = "user_email_aliases";
}
