//! publish
//!
//! The repository-publishing protocol sequencer.
//!
//! # Protocol
//!
//! Publishing turns an in-memory file set into a committed, pushed
//! repository using only the forge's object-creation primitives. The steps
//! run in strict dependency order; each consumes the previous step's output:
//!
//! 1. Resolve the authenticated identity
//! 2. Create the repository with auto-initialization
//! 3. Read the default branch head (the auto-created initial commit)
//! 4. Upload one blob per file, concurrently, all-or-nothing
//! 5. Create one tree referencing every blob
//! 6. Create one commit whose sole parent is the initial commit
//! 7. Fast-forward the branch ref to the new commit
//! 8. Return the repository's web URL
//!
//! Any failure aborts the remaining steps. There is no retry and no rollback:
//! objects created before a late-step failure (blobs, tree, commit) stay on
//! the forge as unreferenced garbage, which is inert until a tree, commit, or
//! ref points at it. The branch ref itself is only touched in step 7, so a
//! partial commit is never published.

use futures::future::try_join_all;
use thiserror::Error;

use crate::core::types::GeneratedFile;
use crate::forge::encoding::to_blob_payload;
use crate::forge::{
    BlobRef, CreateRepoRequest, Forge, ForgeError, GitHubForge, NewCommit, TreeEntry,
};

/// Message of the single commit a publish produces.
pub const COMMIT_MESSAGE: &str = "Initial commit by Web Weaver";

/// Description attached to every created repository.
pub const REPO_DESCRIPTION: &str = "AI-generated website by Web Weaver";

/// Substring GitHub puts in the 422 detail when a repository name is taken.
///
/// The forge has no structured error code for this case on the
/// repository-creation path, so classification is by message text. Keep the
/// matching confined to [`is_name_conflict`].
const NAME_CONFLICT_MARKER: &str = "name already exists";

/// Errors from the publish sequence.
#[derive(Debug, Clone, Error)]
pub enum PublishError {
    /// The token was rejected while resolving the authenticated user.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The requested repository name is already taken on this account.
    #[error("repository name '{0}' already exists on this account")]
    NameConflict(String),

    /// Publishing an empty file set is refused before any network call.
    #[error("cannot publish an empty file set")]
    EmptyFileSet,

    /// Any other forge failure, surfaced with its diagnostic text.
    #[error(transparent)]
    Forge(#[from] ForgeError),
}

/// Check whether a forge error is a repository name collision.
///
/// GitHub reports the collision as a 422 validation error whose nested
/// detail reads "name already exists on this account". Matching is
/// case-insensitive on the whole diagnostic string.
pub fn is_name_conflict(err: &ForgeError) -> bool {
    match err {
        ForgeError::ApiError { status: 422, message } => {
            message.to_lowercase().contains(NAME_CONFLICT_MARKER)
        }
        _ => false,
    }
}

/// Publish a file set as a new repository on the given forge.
///
/// Returns the repository's canonical web URL on success. See the module
/// docs for the step sequence and failure semantics.
///
/// # Errors
///
/// - [`PublishError::Auth`] if the token is invalid or expired
/// - [`PublishError::NameConflict`] if `repo_name` is already taken
/// - [`PublishError::EmptyFileSet`] if `files` is empty
/// - [`PublishError::Forge`] for every other forge or network failure
pub async fn publish(
    forge: &dyn Forge,
    repo_name: &str,
    files: &[GeneratedFile],
) -> Result<String, PublishError> {
    if files.is_empty() {
        return Err(PublishError::EmptyFileSet);
    }

    // 1. Resolve the authenticated identity. An auth failure here gets its
    // own error kind; later steps would only fail this way on a mid-flight
    // token revocation, which stays a generic forge error.
    forge
        .authenticated_user()
        .await
        .map_err(|err| match err {
            ForgeError::AuthFailed(message) => PublishError::Auth(message),
            other => PublishError::Forge(other),
        })?;

    // 2. Create the repository. auto_init makes the forge produce an initial
    // commit, which the published commit will use as its sole parent. Owner
    // and default branch are read back from the response rather than assumed.
    let repo = forge
        .create_repository(CreateRepoRequest::auto_initialized(
            repo_name,
            REPO_DESCRIPTION,
        ))
        .await
        .map_err(|err| {
            if is_name_conflict(&err) {
                PublishError::NameConflict(repo_name.to_string())
            } else {
                PublishError::Forge(err)
            }
        })?;

    // 3. The initial commit's SHA, mandatory sole parent of the new commit.
    let parent_sha = forge
        .branch_head(&repo.owner, &repo.name, &repo.default_branch)
        .await?;

    // 4. Blob fan-out: one upload per file, unordered, all must succeed.
    let owner = repo.owner.as_str();
    let name = repo.name.as_str();
    let blobs: Vec<BlobRef> = try_join_all(files.iter().map(|file| async move {
        let payload = to_blob_payload(&file.content);
        let sha = forge.create_blob(owner, name, &payload).await?;
        Ok::<_, ForgeError>(BlobRef {
            path: file.path.clone(),
            sha,
        })
    }))
    .await?;

    // 5. One tree referencing every blob.
    let entries: Vec<TreeEntry> = blobs.into_iter().map(TreeEntry::from).collect();
    let tree_sha = forge.create_tree(&repo.owner, &repo.name, &entries).await?;

    // 6. One commit; the parent list stays linear by construction.
    let commit_sha = forge
        .create_commit(
            &repo.owner,
            &repo.name,
            NewCommit {
                message: COMMIT_MESSAGE.to_string(),
                tree: tree_sha,
                parents: vec![parent_sha],
            },
        )
        .await?;

    // 7. Fast-forward the branch. A non-fast-forward rejection propagates.
    forge
        .update_branch_ref(&repo.owner, &repo.name, &repo.default_branch, &commit_sha)
        .await?;

    // 8.
    Ok(repo.html_url)
}

/// Publish against github.com with a personal access token.
///
/// Convenience wrapper matching the caller-facing
/// `publish(token, repoName, files)` contract; builds a [`GitHubForge`]
/// and delegates to [`publish`].
pub async fn publish_to_github(
    token: &str,
    repo_name: &str,
    files: &[GeneratedFile],
) -> Result<String, PublishError> {
    let forge = GitHubForge::new(token);
    publish(&forge, repo_name, files).await
}
