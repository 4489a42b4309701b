use std::sync::Arc;

use atelier_api::{SessionToken, Store, UserId, Uuid};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{self, request},
};

use crate::{Error, ToggleLocks};

pub type DynStore = Arc<dyn Store + Send + Sync>;

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub store: DynStore,
    pub locks: ToggleLocks,
}

/// The raw session token from the Authorization header, not yet resolved
/// against the store.
pub struct PreAuth(pub SessionToken);

#[async_trait]
impl<S: Sync> FromRequestParts<S> for PreAuth {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, _state: &S) -> Result<PreAuth, Error> {
        match req.headers.get(http::header::AUTHORIZATION) {
            None => Err(Error::permission_denied()),
            Some(auth) => {
                let auth = auth.to_str().map_err(|_| Error::permission_denied())?;
                let mut auth = auth.split(' ');
                if !auth
                    .next()
                    .ok_or(Error::permission_denied())?
                    .eq_ignore_ascii_case("bearer")
                {
                    return Err(Error::permission_denied());
                }
                let token = auth.next().ok_or(Error::permission_denied())?;
                if !auth.next().is_none() {
                    return Err(Error::permission_denied());
                }
                let token = Uuid::try_from(token).map_err(|_| Error::permission_denied())?;
                Ok(PreAuth(SessionToken(token)))
            }
        }
    }
}

/// Resolved identity, required by the write endpoints. Missing or
/// malformed credentials reject with permission-denied before any I/O; a
/// session the store does not know resolves to unknown-user instead.
pub struct Auth(pub UserId);

#[async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = Error;

    async fn from_request_parts(req: &mut request::Parts, state: &AppState) -> Result<Auth, Error> {
        let token = PreAuth::from_request_parts(req, state).await?.0;
        match state
            .store
            .resolve_session(token)
            .await
            .map_err(Error::Store)?
        {
            Some(user) => Ok(Auth(user)),
            None => Err(Error::unknown_user()),
        }
    }
}

/// Optional identity for the read endpoints: a missing or malformed
/// header and a session that resolves to nobody all degrade to anonymous.
pub struct MaybeAuth(pub Option<UserId>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuth {
    type Rejection = Error;

    async fn from_request_parts(
        req: &mut request::Parts,
        state: &AppState,
    ) -> Result<MaybeAuth, Error> {
        let token = match PreAuth::from_request_parts(req, state).await {
            Ok(PreAuth(token)) => token,
            Err(_) => return Ok(MaybeAuth(None)),
        };
        Ok(MaybeAuth(
            state
                .store
                .resolve_session(token)
                .await
                .map_err(Error::Store)?,
        ))
    }
}
