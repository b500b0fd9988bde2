pub mod alias;
pub mod attendance;

use bson::oid::ObjectId;

use crate::error::ApiError;

pub(crate) fn parse_id(raw: &str, field: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {}", field)))
}
