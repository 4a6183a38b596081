//! Identity extraction.
//!
//! Authentication happens upstream; by the time a request reaches this server the
//! authenticated user id sits in the configured header. A missing or unparsable
//! header means the request is unauthenticated.

use std::{convert::Infallible, sync::Arc};

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

use crate::{domain::UserId, ui::state::AppState};

/// The caller's identity, if any
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub Option<UserId>);

impl FromRequestParts<Arc<AppState>> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(&state.identity_header)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<UserId>().ok());
        Ok(Self(user))
    }
}

/// Like [`Identity`] but rejects unauthenticated requests with 401
#[derive(Debug, Clone, Copy)]
pub struct RequireUser(pub UserId);

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Ok(Identity(user)) = Identity::from_request_parts(parts, state).await;
        user.map(Self).ok_or(StatusCode::UNAUTHORIZED)
    }
}
