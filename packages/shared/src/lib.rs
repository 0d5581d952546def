//! Utilities shared between Atelier packages.

pub mod logger;
pub mod time;
