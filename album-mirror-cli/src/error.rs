use album_mirror_api_structs::InvalidToken;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No API key found")]
    MissingCredential,

    #[error("Flickr API error: {0}")]
    RemoteApi(String),

    /// surf's error type does not implement `std::error::Error`, so it is
    /// carried for display only.
    #[error("transport error: {0}")]
    Transport(surf::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus {
        url: String,
        status: surf::StatusCode,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No downloadable photo URL found")]
    NoDownloadableUrl,

    #[error(transparent)]
    InvalidId(#[from] InvalidToken),
}

impl From<surf::Error> for Error {
    fn from(err: surf::Error) -> Self {
        Error::Transport(err)
    }
}

impl From<Error> for u8 {
    fn from(_: Error) -> u8 {
        1
    }
}
