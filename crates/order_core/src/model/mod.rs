//! Value types and validation for the notes document.
//!
//! # Responsibility
//! - Define the closed set of content block kinds.
//! - Validate caller input before any file is read or written.

pub mod section;
pub mod validate;
