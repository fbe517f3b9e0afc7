use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("{path} does not exist")]
    NotFound { path: PathBuf },

    #[error("Input geometry file has no extension: {path}")]
    MissingExtension { path: PathBuf },

    #[error("Unsupported geometry format: {0}")]
    UnsupportedFormat(String),

    #[error("Record #{index} has no geometry")]
    NullGeometry { index: usize },

    #[error("Geometry #{index} has no centroid")]
    NoCentroid { index: usize },

    #[error("No coordinates to compute a map center from")]
    EmptyDataset,
}
