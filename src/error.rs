//! Shared error plumbing.
//!
//! Each module owns its own `thiserror` enum. They all implement
//! [`ErrorCode`] so logs and notices carry a grepable code regardless of
//! which layer failed.

/// Grepable error code and retryable flag.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
