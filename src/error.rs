use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Incorrect cell label: {0}")]
    IncorrectLabelFormat(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Inconsistent range bounds: {0}")]
    InconsistentRangeBounds(String),

    #[error("Unresolvable range: {0}")]
    UnresolvableRange(String),

    #[error("Range is not bound to a sheet id")]
    MissingSheetBinding,

    #[error("Conflicting sheet binding: {0}")]
    SheetBindingConflict(String),

    #[error("Data range is detached; link it before committing")]
    DetachedRange,

    #[error("Google Sheets API error: {0}")]
    Sheets(String),

    #[error("OAuth2 authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
