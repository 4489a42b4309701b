use uuid::Uuid;

use crate::STUB_UUID;

/// Opaque session identity handed out by the external auth provider.
///
/// The server never interprets it beyond mapping it to the store's own
/// user reference through [`crate::Store::resolve_session`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SessionToken(pub Uuid);

impl SessionToken {
    pub fn stub() -> SessionToken {
        SessionToken(STUB_UUID)
    }
}
