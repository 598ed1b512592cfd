#[derive(Debug)]
pub enum FastaLibError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    UnknownEnzyme(String),
}

impl std::fmt::Display for FastaLibError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FastaLibError::Io(e) => write!(f, "I/O error: {}", e),
            FastaLibError::Csv(e) => write!(f, "CSV error: {}", e),
            FastaLibError::Json(e) => write!(f, "JSON error: {}", e),
            FastaLibError::UnknownEnzyme(name) => write!(f, "Enzyme not recognized: {}", name),
        }
    }
}

impl std::error::Error for FastaLibError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FastaLibError::Io(e) => Some(e),
            FastaLibError::Csv(e) => Some(e),
            FastaLibError::Json(e) => Some(e),
            FastaLibError::UnknownEnzyme(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FastaLibError>;

impl From<std::io::Error> for FastaLibError {
    fn from(x: std::io::Error) -> Self {
        Self::Io(x)
    }
}

impl From<csv::Error> for FastaLibError {
    fn from(x: csv::Error) -> Self {
        Self::Csv(x)
    }
}

impl From<serde_json::Error> for FastaLibError {
    fn from(x: serde_json::Error) -> Self {
        Self::Json(x)
    }
}
