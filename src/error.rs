use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelpdeskError {
    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid role '{0}'")]
    InvalidRole(String),

    #[error("not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("transition failed: {0}")]
    Transition(String),

    #[error("API error: {0}")]
    Api(#[from] crate::api::ApiFailure),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, HelpdeskError>;
