//! Response envelopes shared by the handlers.

pub mod response;

pub use response::DataResponse;
