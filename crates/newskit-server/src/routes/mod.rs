//! API route handlers

pub mod preview;
pub mod templates;
