use anyhow::{anyhow, Context};
use serde_json::json;

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Store unavailable")]
    StoreUnavailable,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("No user known for this session")]
    UnknownUser,

    #[error("Comment content is empty")]
    EmptyComment,

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::StoreUnavailable => StatusCode::BAD_GATEWAY,
            Error::PermissionDenied => StatusCode::UNAUTHORIZED,
            Error::UnknownUser => StatusCode::NOT_FOUND,
            Error::EmptyComment => StatusCode::BAD_REQUEST,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::StoreUnavailable => json!({
                "message": "failed to reach the data store",
                "type": "store-unavailable",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::UnknownUser => json!({
                "message": "no user is known for this session",
                "type": "unknown-user",
            }),
            Error::EmptyComment => json!({
                "message": "comment content is empty",
                "type": "empty-comment",
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(String::from(
                    data.get("message")
                        .and_then(|msg| msg.as_str())
                        .unwrap_or(""),
                )),
                "store-unavailable" => Error::StoreUnavailable,
                "permission-denied" => Error::PermissionDenied,
                "unknown-user" => Error::UnknownUser,
                "empty-comment" => Error::EmptyComment,
                "null-byte" => Error::NullByteInString(String::from(
                    data.get("string").and_then(|s| s.as_str()).ok_or_else(|| {
                        anyhow!("error is a null-byte-in-string without a string")
                    })?,
                )),
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contents_round_trip() {
        let errors = vec![
            Error::Unknown(String::from("boom")),
            Error::StoreUnavailable,
            Error::PermissionDenied,
            Error::UnknownUser,
            Error::EmptyComment,
            Error::NullByteInString(String::from("a\0b")),
        ];
        for e in errors {
            let parsed = Error::parse(&e.contents()).expect("parsing back error contents");
            assert_eq!(parsed, e);
        }
    }
}
