use thiserror::Error;

/// Every failure the catalog subsystem can report.
///
/// The `Display` form of each variant is the exact line appended to the loader's message
/// log, so the wording here is user-facing.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Unknown distance unit '{0}'")]
    UnknownDistanceUnit(String),

    #[error("Unknown time unit '{0}'")]
    UnknownTimeUnit(String),

    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    #[error("Invalid color '{0}'")]
    InvalidColor(String),

    #[error("{0}")]
    MissingField(String),

    #[error("{0}")]
    InvalidField(String),

    #[error("Unknown {kind} type '{name}'")]
    UnknownType { kind: String, name: String },

    #[error("{kind} '{name}' not found")]
    UnresolvedReference { kind: String, name: String },

    #[error("Invalid TLE data for '{0}'")]
    InvalidTle(String),

    #[error("Error in {file}, record {record}")]
    SampledFile { file: String, record: usize },

    #[error("Unsupported ephemeris number {0} (only DE406 is supported)")]
    UnsupportedEphemeris(i32),

    #[error("Truncated ephemeris file: {0}")]
    TruncatedEphemeris(String),

    #[error("Error during the nom parsing: {0}")]
    NomParsingError(String),

    #[error("Error in {file}, line {line}: {message}")]
    DocumentSyntax {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Invalid loader configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Resource(String),
}

impl CatalogError {
    pub(crate) fn missing(message: impl Into<String>) -> Self {
        CatalogError::MissingField(message.into())
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CatalogError::InvalidField(message.into())
    }

    pub(crate) fn unknown_type(kind: &str, name: &str) -> Self {
        CatalogError::UnknownType {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn unresolved(kind: &str, name: &str) -> Self {
        CatalogError::UnresolvedReference {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }
}

impl PartialEq for CatalogError {
    fn eq(&self, other: &Self) -> bool {
        use CatalogError::*;
        match (self, other) {
            // io errors carry no comparable payload: same variant means equal
            (IoError(_), IoError(_)) => true,

            (InvalidValue(a), InvalidValue(b)) => a == b,
            (UnknownDistanceUnit(a), UnknownDistanceUnit(b)) => a == b,
            (UnknownTimeUnit(a), UnknownTimeUnit(b)) => a == b,
            (InvalidDate(a), InvalidDate(b)) => a == b,
            (InvalidColor(a), InvalidColor(b)) => a == b,
            (MissingField(a), MissingField(b)) => a == b,
            (InvalidField(a), InvalidField(b)) => a == b,
            (UnknownType { kind: k1, name: n1 }, UnknownType { kind: k2, name: n2 }) => {
                k1 == k2 && n1 == n2
            }
            (
                UnresolvedReference { kind: k1, name: n1 },
                UnresolvedReference { kind: k2, name: n2 },
            ) => k1 == k2 && n1 == n2,
            (InvalidTle(a), InvalidTle(b)) => a == b,
            (
                SampledFile {
                    file: f1,
                    record: r1,
                },
                SampledFile {
                    file: f2,
                    record: r2,
                },
            ) => f1 == f2 && r1 == r2,
            (UnsupportedEphemeris(a), UnsupportedEphemeris(b)) => a == b,
            (TruncatedEphemeris(a), TruncatedEphemeris(b)) => a == b,
            (NomParsingError(a), NomParsingError(b)) => a == b,
            (
                DocumentSyntax {
                    file: f1,
                    line: l1,
                    message: m1,
                },
                DocumentSyntax {
                    file: f2,
                    line: l2,
                    message: m2,
                },
            ) => f1 == f2 && l1 == l2 && m1 == m2,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (Resource(a), Resource(b)) => a == b,

            _ => false,
        }
    }
}
