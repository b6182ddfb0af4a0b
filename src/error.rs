use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotorForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Historic Rule Violation: {0}")]
    HistoricRule(String),

    #[error("Resource Error: {0}")]
    Resource(String),

    #[error("Search Space Empty: {0}")]
    SearchSpaceEmpty(String),

    #[error("Thread Pool Error: {0}")]
    ThreadPool(String),
}

impl RotorForgeError {
    /// Malformed machine or search input. Historic rule violations are a
    /// stricter flavour of the same failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::HistoricRule(_))
    }

    /// The scoring table could not be read or parsed.
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Csv(_) | Self::Resource(_))
    }
}

pub type RfResult<T> = Result<T, RotorForgeError>;
