//! forge::traits
//!
//! Forge trait definition for the low-level Git data API of a remote
//! hosting service.
//!
//! # Design
//!
//! The `Forge` trait is async because every operation involves network I/O.
//! It exposes the forge's object-creation primitives (blobs, trees, commits,
//! refs) rather than any higher-level file-manipulation endpoint; the publish
//! sequencer in [`crate::publish`] composes them into a full repository
//! publish.
//!
//! All methods return `Result` and never retry; a transient failure is the
//! caller's problem.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from forge operations.
///
/// These map to the failure modes of a REST forge like GitHub. Repository
/// name collisions are not a distinct variant here: the forge reports them
/// as a generic validation error, and classification happens in the publish
/// layer where the context (a create-repository call) is known.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Diagnostic message from the API
        message: String,
    },

    /// Network or connection error; no response was received.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// The authenticated identity behind a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeUser {
    /// Account login name
    pub login: String,
}

/// Request to create a repository under the authenticated account.
#[derive(Debug, Clone)]
pub struct CreateRepoRequest {
    /// Repository name
    pub name: String,
    /// Repository description
    pub description: String,
    /// Private visibility flag
    pub private: bool,
    /// Ask the forge to create an initial commit (README) on its own
    pub auto_init: bool,
}

impl CreateRepoRequest {
    /// A public, auto-initialized repository with the given name and
    /// description.
    ///
    /// Auto-initialization matters to the publish protocol: the forge's
    /// initial commit becomes the sole parent of the published commit.
    pub fn auto_initialized(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            private: false,
            auto_init: true,
        }
    }
}

/// A repository as read back from the forge after creation.
///
/// Owner and default branch are deliberately not taken from caller input: the
/// forge may normalize names or pick a different default branch, so they are
/// read back from the creation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Repository name as normalized by the forge
    pub name: String,
    /// Owner login
    pub owner: String,
    /// Default branch name (e.g. `main`)
    pub default_branch: String,
    /// Canonical web URL
    pub html_url: String,
}

/// A blob payload ready for upload: content pre-encoded for binary safety.
///
/// Built by [`crate::forge::encoding::to_blob_payload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobPayload {
    /// Base64 of the content's UTF-8 bytes
    pub content: String,
    /// Encoding marker understood by the forge (`base64`)
    pub encoding: &'static str,
}

/// The content-addressed identifier of a stored blob, tied to its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    /// Path the blob will occupy in the tree
    pub path: String,
    /// Object SHA returned by the forge
    pub sha: String,
}

/// One entry of a tree object: a regular file pointing at a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path within the tree
    pub path: String,
    /// Blob SHA
    pub sha: String,
}

impl From<BlobRef> for TreeEntry {
    fn from(blob: BlobRef) -> Self {
        TreeEntry {
            path: blob.path,
            sha: blob.sha,
        }
    }
}

/// Request to create a commit object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommit {
    /// Commit message
    pub message: String,
    /// SHA of the tree the commit snapshots
    pub tree: String,
    /// Parent commit SHAs; the publish protocol always supplies exactly one
    pub parents: Vec<String>,
}

/// The Forge trait over a remote Git hosting service's data API.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Callers should handle:
/// - `AuthFailed`: token invalid or lacking permissions
/// - `NotFound`: resource doesn't exist
/// - `ApiError`: display the forge's diagnostic to the user
/// - `NetworkError`: check connectivity
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Resolve the authenticated user behind the configured token.
    ///
    /// # Errors
    ///
    /// - `AuthFailed` if the token is invalid or expired
    async fn authenticated_user(&self) -> Result<ForgeUser, ForgeError>;

    /// Create a repository under the authenticated account.
    ///
    /// # Errors
    ///
    /// - `ApiError` with status 422 if validation fails (including a name
    ///   collision, which the publish layer classifies)
    async fn create_repository(&self, request: CreateRepoRequest)
        -> Result<Repository, ForgeError>;

    /// Read the commit SHA a branch ref currently points at.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the branch does not exist
    async fn branch_head(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, ForgeError>;

    /// Store a blob object, returning its SHA.
    async fn create_blob(
        &self,
        owner: &str,
        repo: &str,
        payload: &BlobPayload,
    ) -> Result<String, ForgeError>;

    /// Create a tree object from the given entries, returning its SHA.
    ///
    /// Every entry is written as a regular file (mode `100644`, type `blob`).
    async fn create_tree(
        &self,
        owner: &str,
        repo: &str,
        entries: &[TreeEntry],
    ) -> Result<String, ForgeError>;

    /// Create a commit object, returning its SHA.
    async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        commit: NewCommit,
    ) -> Result<String, ForgeError>;

    /// Advance a branch ref to the given commit SHA, fast-forward only.
    ///
    /// # Errors
    ///
    /// - `ApiError` if the forge rejects the update as non-fast-forward
    ///   (e.g. concurrent modification by another actor); the ref is never
    ///   force-pushed
    async fn update_branch_ref(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<(), ForgeError>;
}
