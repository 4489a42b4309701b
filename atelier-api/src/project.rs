use uuid::Uuid;

use crate::STUB_UUID;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
    pub fn stub() -> ProjectId {
        ProjectId(STUB_UUID)
    }
}
