use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    sync::Arc,
};

use atelier_api::{CommentId, UserId};
use tokio::sync::{Mutex, MutexGuard};

const SHARDS: usize = 64;

/// Serializes toggles for the same (comment, user) pair inside this
/// process.
///
/// The store offers no compare-and-swap primitive, so the toggle's
/// lookup-then-write sequence can race with itself for one pair; hashing
/// the pair onto a fixed shard table keeps any two such calls ordered.
/// Writers in other processes can still race, exactly as the store-side
/// design accepts.
#[derive(Clone)]
pub struct ToggleLocks(Arc<Vec<Mutex<()>>>);

impl ToggleLocks {
    pub fn new() -> ToggleLocks {
        ToggleLocks(Arc::new((0..SHARDS).map(|_| Mutex::new(())).collect()))
    }

    pub async fn hold(&self, comment: CommentId, user: UserId) -> MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        (comment, user).hash(&mut hasher);
        self.0[hasher.finish() as usize % SHARDS].lock().await
    }
}
