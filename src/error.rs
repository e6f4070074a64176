//! Error type shared by the parser, builders, lookups and query harness.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for pipeline operations
#[derive(Debug)]
pub enum PipelineError {
    /// Opening or reading the input file (or removing the database file) failed
    Io {
        path: PathBuf,
        source: io::Error,
    },
    /// Statement failed inside SQLite
    Database(diesel::result::Error),
    /// Connection could not be checked out of (or the pool could not be built)
    Pool(r2d2::Error),
    /// A data line could not be decomposed into an order record
    MalformedRecord {
        line: usize,
        reason: String,
    },
    /// A natural key was absent from a lookup that must resolve it
    Lookup {
        table: &'static str,
        key: String,
    },
    Config(String),
    UnknownQuery(String),
    Serialization(serde_json::Error),
}

impl PipelineError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        PipelineError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            PipelineError::Database(e) => write!(f, "Database error: {}", e),
            PipelineError::Pool(e) => write!(f, "Database pool error: {}", e),
            PipelineError::MalformedRecord { line, reason } => {
                write!(f, "Malformed record on line {}: {}", line, reason)
            }
            PipelineError::Lookup { table, key } => {
                write!(f, "Lookup failed: '{}' not found in {}", key, table)
            }
            PipelineError::Config(msg) => write!(f, "Configuration error: {}", msg),
            PipelineError::UnknownQuery(name) => write!(f, "Unknown query: {}", name),
            PipelineError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io { source, .. } => Some(source),
            PipelineError::Database(e) => Some(e),
            PipelineError::Pool(e) => Some(e),
            PipelineError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<diesel::result::Error> for PipelineError {
    fn from(e: diesel::result::Error) -> Self {
        PipelineError::Database(e)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Serialization(e)
    }
}

impl From<r2d2::Error> for PipelineError {
    fn from(e: r2d2::Error) -> Self {
        PipelineError::Pool(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_names_table_and_key() {
        let err = PipelineError::Lookup {
            table: "product",
            key: "Chai".to_string(),
        };
        assert_eq!(err.to_string(), "Lookup failed: 'Chai' not found in product");
    }

    #[test]
    fn test_malformed_error_names_line() {
        let err = PipelineError::malformed(7, "field count 3, expected 11");
        assert!(err.to_string().contains("line 7"));
        assert!(err.to_string().contains("expected 11"));
    }
}
