use chrono::Utc;

mod auth;
mod comment;
mod error;
mod feed;
mod order;
mod project;
mod reaction;
mod store;
mod user;

pub use auth::SessionToken;
pub use comment::{build_forest, Comment, CommentId, NewComment};
pub use error::Error;
pub use feed::{project_feed, toggle_reaction};
pub use order::FeedOrder;
pub use project::ProjectId;
pub use reaction::{aggregate, Reaction, ReactionId, ReactionType, ToggleReaction};
pub use store::Store;
pub use user::UserId;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

// The store keeps strings as JSON; a null byte inside one is rejected
// store-side with an opaque 500, so refuse it before any I/O happens.
pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::NullByteInString(s.to_string())),
        false => Ok(()),
    }
}
