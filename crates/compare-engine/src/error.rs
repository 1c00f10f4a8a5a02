use thiserror::Error;

/// Failures that abort or degrade a comparison.
///
/// Only `CorruptDocument` and `Serialization` are fatal to a pipeline run.
/// `Annotation` is returned by individual collaborator primitives; the
/// annotator recovers from it per change.
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Failed to parse document: {0}")]
    CorruptDocument(String),

    #[error("Annotation failed: {0}")]
    Annotation(String),

    #[error("Failed to serialize annotated document: {0}")]
    Serialization(String),
}
