use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The type asked for its comparable or serializable attributes before declaring any.
    #[error("{type_name} is not configured: no attributes declared")]
    NotConfigured { type_name: String },

    #[error("cannot wrap {found} into {target}")]
    Unwrappable { target: String, found: String },

    #[error("{type_name} must implement `{method}`")]
    AbstractMethod {
        type_name: String,
        method: &'static str,
    },

    #[error("unknown attribute `{name}` for {type_name}")]
    UnknownAttribute { type_name: String, name: String },

    #[error("cannot coerce {found} with {target}::{method}: {reason}")]
    Coercion {
        target: String,
        method: String,
        found: String,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
