//! Browser utilities

pub mod clipboard;
