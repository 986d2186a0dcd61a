pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
    #[error("configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Scene(#[from] meadow_svg::Error),
}
