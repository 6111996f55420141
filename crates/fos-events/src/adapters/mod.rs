//! Host adapters

#[cfg(feature = "dom")]
pub mod dom;
