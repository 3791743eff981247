use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Parse,
    NotFound,
    InvalidInput,
    Transform,
    Load,
    Storage,
    Serialization,
    Internal,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
    /// Collection the failure belongs to, set for load and transform failures.
    pub collection: Option<String>,
    pub cause: Option<Box<Error>>,
}

impl Error {
    pub fn new(kind: ErrorKind, context: String) -> Self {
        Error {
            kind,
            context,
            collection: None,
            cause: None,
        }
    }

    /// Wrap `cause` as the failure of loading `collection`.
    pub fn load(collection: &str, cause: Error) -> Self {
        Error {
            kind: ErrorKind::Load,
            context: format!("failed to load collection '{}': {}", collection, cause),
            collection: Some(collection.to_string()),
            cause: Some(Box::new(cause)),
        }
    }

    pub fn transform(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::Transform, message.into())
    }

    /// Prefix the context with the 0-based source row it came from.
    pub fn at_row(mut self, row: usize) -> Self {
        self.context = format!("row {}: {}", row, self.context);
        self
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Error::new(ErrorKind::NotFound, what.into())
    }

    pub fn with_collection(mut self, collection: &str) -> Self {
        self.collection = Some(collection.to_string());
        self
    }

    pub fn is_load(&self) -> bool {
        self.kind == ErrorKind::Load
    }

    /// Innermost error kind, following `cause` links.
    pub fn root_kind(&self) -> ErrorKind {
        match &self.cause {
            Some(cause) => cause.root_kind(),
            None => self.kind,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorKind::Io, err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::new(ErrorKind::Serialization, err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorKind::Serialization, format!("JSON error: {}", err))
    }
}

impl From<lz4_flex::block::DecompressError> for Error {
    fn from(err: lz4_flex::block::DecompressError) -> Self {
        Error::new(ErrorKind::Storage, format!("decompression failed: {}", err))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Self {
        Error::new(ErrorKind::Parse, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_keeps_collection_and_cause() {
        let cause = Error::transform("missing column 'pow'").at_row(3);
        let err = Error::load("characters", cause);

        assert!(err.is_load());
        assert_eq!(err.collection.as_deref(), Some("characters"));
        assert_eq!(err.root_kind(), ErrorKind::Transform);
        assert!(err.to_string().contains("characters"));
        assert!(err.to_string().contains("row 3"));
    }
}
