use acmpca_facade::FacadeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IssuerError {
    #[error("{0}")]
    Facade(#[from] FacadeError),
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Json serialization Error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Validation Error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
    #[error("Command Not Found")]
    CommandNotFound,
    #[error("Error: argument {0} is required")]
    RequiredValue(&'static str),
    #[error("Error: illegal character\nTry 'acmpca-issuer --help' for more information.")]
    Encoding,
    #[error("Config Not Found")]
    ConfigNotFound,
    #[error("Invalid Config Path")]
    InvalidConfigPath,
    #[error("Invalid Config")]
    InvalidConfig,
}
