use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum PartitionError {
    Domain(String),
    Format(String),
    Template(String),
    Identifier(String),
    Config(String),
}

pub type Result<T> = std::result::Result<T, PartitionError>;

impl Display for PartitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PartitionError::Domain(msg) => write!(f, "Domain error: {}", msg),
            PartitionError::Format(msg) => write!(f, "Format error: {}", msg),
            PartitionError::Template(msg) => write!(f, "Template error: {}", msg),
            PartitionError::Identifier(msg) => write!(f, "Identifier error: {}", msg),
            PartitionError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for PartitionError {}

impl From<PartitionError> for String {
    fn from(value: PartitionError) -> Self {
        value.to_string()
    }
}
impl From<ron::error::SpannedError> for PartitionError {
    fn from(e: ron::error::SpannedError) -> Self {
        PartitionError::Config(e.to_string())
    }
}
