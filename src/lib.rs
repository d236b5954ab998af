//! Visual role mapping model
//!
//! A *visual role* binds data properties to a channel of a visualization
//! (position, color, size, ...). Each role type declares which measurement
//! levels and which data type it accepts. Subtypes inherit these
//! constraints and may only change them monotonically: level sets can only
//! widen, data types can only narrow, and a type freezes permanently once
//! it has been subtyped.
//!
//! # Example
//!
//! ```rust
//! use vizrole::level::{DataType, MeasurementLevel};
//! use vizrole::schema::{RoleSpec, SchemaTree};
//!
//! fn main() -> vizrole::Result<()> {
//!     let mut tree = SchemaTree::new();
//!     let color = tree.derive(
//!         tree.root(),
//!         RoleSpec::new("color")
//!             .with_levels([MeasurementLevel::Nominal, MeasurementLevel::Ordinal].into())
//!             .with_data_type(DataType::String),
//!     )?;
//!     assert_eq!(tree.levels_effective(color)?.len(), 2);
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/vizrole")]
#![warn(rust_2018_idioms)]

// Public modules
pub mod level;
pub mod mapping;
pub mod schema;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use thiserror::Error;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
