use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DecodeError {
    #[error("unresolved step `{0}`: not present in the registry")] UnresolvedStep(String),
    #[error("unsupported schema version {found} (supported: 1..={supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },
    #[error("unknown flow persistence `{0}`")] UnknownPersistence(String),
    #[error("step `{0}` is already registered")] DuplicateName(String),
    #[error("invalid flow json: {0}")] Json(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::Json(e.to_string())
    }
}
