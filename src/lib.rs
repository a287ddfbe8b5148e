//! Web Weaver - generate a project with an LLM, publish it as a Git repository
//!
//! Web Weaver is a library that turns a natural-language prompt into a
//! multi-file project (via the Gemini API) and publishes that project as a
//! new GitHub repository using the low-level Git data API: blobs, trees,
//! commits, and refs. No "create file" convenience endpoint is used; the
//! publish path is a strict protocol sequence over content-addressed objects.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`core`] - Domain types and the caller-facing session lifecycle
//! - [`forge`] - Abstraction for the remote forge (GitHub v1)
//! - [`generate`] - Generation client for the LLM endpoint
//! - [`publish`] - The repository-publishing protocol sequencer
//!
//! # Correctness Invariants
//!
//! Web Weaver maintains the following invariants:
//!
//! 1. Blob uploads never precede repository creation; tree, commit, and ref
//!    steps never begin until every blob upload has succeeded
//! 2. The published commit has exactly one parent (the forge's auto-created
//!    initial commit) and the branch ref is advanced fast-forward only
//! 3. Model output is validated structurally before any domain entity is built

pub mod core;
pub mod forge;
pub mod generate;
pub mod publish;
