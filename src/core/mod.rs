//! core
//!
//! Domain types shared by the generation and publishing layers, plus the
//! caller-facing session lifecycle.
//!
//! # Modules
//!
//! - [`types`]: Generated file set and project types
//! - [`session`]: Explicit tagged-state lifecycle owned by the caller

pub mod session;
pub mod types;

pub use session::Session;
pub use types::{has_readme, GeneratedFile, GeneratedProject};
