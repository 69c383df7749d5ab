use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Failed to load PDF: {0}")]
    Load(String),

    #[error("Malformed document structure: {0}")]
    Structure(String),

    #[error("Failed to save PDF: {0}")]
    Save(String),

    #[error("Invalid export options: {0}")]
    Config(String),
}
