//! Caller identity extraction.
//!
//! Session issuance happens upstream; by the time a request reaches this
//! service the caller is described by three headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;
use crate::error::Error;
use crate::model::{RequestContext, Role};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let user_id = header(USER_ID_HEADER)
            .ok_or_else(|| Error::Unauthorized(format!("missing {USER_ID_HEADER} header")))?;
        let role: Role = header(USER_ROLE_HEADER)
            .ok_or_else(|| Error::Unauthorized(format!("missing {USER_ROLE_HEADER} header")))?
            .parse()?;

        Ok(RequestContext {
            user_id,
            role,
            email: header(USER_EMAIL_HEADER),
        })
    }
}
