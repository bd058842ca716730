//! Error types for export operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sheetstream operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors raised while streaming a worksheet or assembling the package
#[derive(Error, Debug)]
pub enum ExportError {
    /// Destination or temporary file could not be created
    #[error("failed to create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Write or flush to one of the output streams failed
    #[error("write error: {0}")]
    Write(#[from] io::Error),

    /// Zip entry creation or archive finalization failed
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Temporary stream removal failed after the archive was written
    #[error("temporary file cleanup failed: {0}")]
    Cleanup(io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_error_names_path() {
        let err = ExportError::Create {
            path: PathBuf::from("/no/such/dir/out.xlsx"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/no/such/dir/out.xlsx"));
    }

    #[test]
    fn test_io_error_converts_to_write() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe");
        let err: ExportError = io_err.into();
        assert!(matches!(err, ExportError::Write(_)));
    }
}
