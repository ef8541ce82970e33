//! Utility functions and helpers.

pub mod digest;
pub mod http;
pub mod url;

pub use digest::sha256_hex;
pub use self::url::slug_for;
