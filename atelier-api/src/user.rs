use uuid::Uuid;

use crate::STUB_UUID;

/// The store's own user reference, as produced by session resolution;
/// never the raw external-auth identity.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn stub() -> UserId {
        UserId(STUB_UUID)
    }
}
