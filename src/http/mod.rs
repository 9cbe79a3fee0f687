//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! mount table and the handlers.

pub mod body;
pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::Body;
pub use response::{
    build_101_response, build_304_response, build_400_response, build_404_response,
    build_413_response, build_text_response,
};
