use thiserror::Error;

pub type Result<T> = std::result::Result<T, BusError>;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("scene node not found: {0}")]
    NodeNotFound(String),

    #[error("scene node {node} holds a {actual} property, expected {expected}")]
    TypeMismatch {
        node: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("unknown tuner band: {0:?}")]
    UnknownBand(String),

    #[error("invalid value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },
}
