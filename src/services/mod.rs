//! Service layer: the analysis backend client and per-user result slots.

pub mod analysis_client;
pub mod results;

pub use analysis_client::{AnalysisClient, UploadedDocument};
pub use results::{AnalysisRecord, ResultStore};
