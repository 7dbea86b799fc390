//! Failure kinds reported by the preparation pipeline.

use crate::common::*;

/// Typed failures of the pipeline.
///
/// Functions return them wrapped in [anyhow::Error] with path context.
/// Callers can classify a failure with `err.downcast_ref::<PrepareError>()`.
#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    /// The annotation document is malformed or a box field is missing.
    #[error("malformed annotation: {0}")]
    Parse(#[from] serde_xml_rs::Error),
    /// A box with a non-positive width or height.
    #[error("invalid box #{index} {xyxy:?}, expect xmin < xmax and ymin < ymax")]
    InvalidBox { index: usize, xyxy: [i64; 4] },
    /// The number of images and annotations in the source directory differ.
    #[error("found {images} images but {annotations} annotations")]
    CountMismatch { images: usize, annotations: usize },
    /// Some images have no annotation with the same file stem, or vice versa.
    #[error("files without a counterpart: {stems:?}")]
    UnmatchedStem { stems: Vec<String> },
    /// An output file could not be written.
    #[error("failed to write '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl PrepareError {
    pub fn io<E>(path: impl AsRef<Path>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self::Io {
            path: path.as_ref().to_owned(),
            source: source.into(),
        }
    }

    /// Returns true for failures that abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CountMismatch { .. } | Self::UnmatchedStem { .. })
    }
}
