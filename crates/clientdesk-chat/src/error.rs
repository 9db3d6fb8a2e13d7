use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Internal server error")]
    InternalServerError,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Webhook answered with status {0}")]
    UpstreamStatus(u16),

    #[error("Webhook answered with an empty body")]
    EmptyReply,
}
