//! Domain types for analysis results
//!
//! Pure, synchronous code: payload normalization, the rendering contract
//! derived from it, preview selection and upload checks.

pub mod analysis;
pub mod demo;
pub mod preview;
pub mod upload;
pub mod view;

pub use analysis::normalize;
pub use preview::resolve_media_url;
pub use upload::{validate_upload, DocumentFormat, UploadError};
pub use view::{AnalysisView, PreviewOptions};
