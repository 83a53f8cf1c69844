use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("tile ({row}, {col}) covers an empty region, nothing to average")]
    DegenerateRegion { row: u32, col: u32 },

    #[error("candidate {} has no pixels to average", .path.display())]
    DegenerateCandidate { path: PathBuf },

    #[error("catalog exhausted: no candidate left for tile query {requested}")]
    CatalogExhausted { requested: usize },

    #[error("dimension mismatch: expected {expected_w}x{expected_h}, got {actual_w}x{actual_h}")]
    DimensionMismatch {
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },

    #[error("failed to decode {}: {source}", .path.display())]
    UnreadableSource {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
