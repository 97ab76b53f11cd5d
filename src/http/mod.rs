//! HTTP helper modules
//!
//! Query decoding and response building, decoupled from dispatch logic.

pub mod query;
pub mod response;

pub use response::{build_not_found_response, build_text_response, build_unauthorized_response};
