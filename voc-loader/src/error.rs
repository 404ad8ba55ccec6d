//! Failures specific to VOC archives.

use crate::common::*;

/// The error kinds raised while indexing or parsing a dataset.
///
/// I/O and XML syntax failures are reported by their own error types. Every
/// error is carried inside [anyhow::Error] and can be recovered with
/// `downcast_ref::<DatasetError>()`.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("index {index} is out of range for a dataset of {len} images")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("line {line_no} of '{}' has fewer than two fields: {line:?}", .path.display())]
    MalformedSplitLine {
        path: PathBuf,
        line_no: usize,
        line: String,
    },
    #[error("'{parent}' element has no '{field}'")]
    MissingField { parent: String, field: String },
    #[error("'{field}' element in '{parent}' has no text")]
    EmptyField { parent: String, field: String },
    #[error("'{field}' is not an integer coordinate: {text:?}")]
    InvalidCoordinate { field: String, text: String },
    #[error("no transform was supplied to the dataset")]
    MissingTransform,
}
