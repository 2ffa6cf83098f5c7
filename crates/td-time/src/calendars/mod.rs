//! Concrete workday providers (country / exchange specific).

/// China (SSE).
pub mod china;

pub use china::China;
