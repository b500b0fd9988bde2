use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use bson::oid::ObjectId;
use cohort_services::auth::{AuthError, Claims};

use crate::{error::ApiError, state::AppState};

/// The authenticated caller, taken from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub email: String,
    pub claims: Claims,
}

impl AuthUser {
    pub async fn require_admin(&self, state: &AppState) -> Result<(), ApiError> {
        if state.users.is_admin(self.user_id).await? {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin role required".to_string()))
        }
    }

    /// Admins may act on anyone; everyone else only on themselves.
    pub async fn require_self_or_admin(
        &self,
        state: &AppState,
        user_id: ObjectId,
    ) -> Result<(), ApiError> {
        if self.user_id == user_id {
            return Ok(());
        }
        self.require_admin(state).await
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AuthError::MissingToken)?;

        let claims = app_state.auth.verify_access_token(token)?;
        let user_id = claims.user_id()?;

        Ok(AuthUser {
            user_id,
            email: claims.email.clone(),
            claims,
        })
    }
}
