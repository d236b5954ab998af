//! Utility modules
//!
//! - [`logger`]: tracing-based logger setup

pub mod logger;
