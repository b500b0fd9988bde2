use axum::{Json, extract::{Path, State}};
use cohort_db::models::UserAlias;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::parse_id;
use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct AddAliasRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AliasResponse {
    pub id: String,
    pub user_id: String,
    pub email: String,
    pub created_at: String,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<AliasResponse>>, ApiError> {
    let uid = parse_id(&user_id, "user_id")?;
    auth.require_self_or_admin(&state, uid).await?;

    let aliases = state.users.list_aliases(uid).await?;
    Ok(Json(aliases.into_iter().map(to_response).collect()))
}

pub async fn add(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(body): Json<AddAliasRequest>,
) -> Result<Json<AliasResponse>, ApiError> {
    let uid = parse_id(&user_id, "user_id")?;
    auth.require_self_or_admin(&state, uid).await?;

    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let alias = state.users.add_alias(uid, &body.email).await?;
    Ok(Json(to_response(alias)))
}

pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((user_id, alias_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let uid = parse_id(&user_id, "user_id")?;
    let aid = parse_id(&alias_id, "alias_id")?;
    auth.require_admin(&state).await?;

    if !state.users.remove_alias(uid, aid).await? {
        return Err(ApiError::NotFound("Alias not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}

fn to_response(alias: UserAlias) -> AliasResponse {
    AliasResponse {
        id: alias.id.map(|id| id.to_hex()).unwrap_or_default(),
        user_id: alias.user_id.to_hex(),
        email: alias.email,
        created_at: alias.created_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}
