//! forge
//!
//! Abstraction for the remote forge (GitHub v1).
//!
//! # Architecture
//!
//! The `Forge` trait defines the low-level Git data API: object creation
//! (blobs, trees, commits) and ref manipulation, plus identity and
//! repository creation. The publish sequencer composes these primitives;
//! no higher-level "create file" endpoint exists at this layer.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`github`]: GitHub implementation over the REST API
//! - [`encoding`]: Binary-safe blob payload encoding
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use webweaver::forge::{Forge, GitHubForge};
//!
//! let forge = GitHubForge::new(token);
//! let user = forge.authenticated_user().await?;
//! println!("authenticated as {}", user.login);
//! ```

pub mod encoding;
pub mod github;
pub mod mock;
mod traits;

pub use github::GitHubForge;
pub use traits::*;
