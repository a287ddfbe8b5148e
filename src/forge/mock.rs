//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge provides a deterministic implementation of the `Forge`
//! trait for use in tests. It hands out counter-based SHAs, records every
//! call (with enough payload to assert ordering, tree contents, commit
//! parents, and ref targets), and allows configuring failure scenarios per
//! operation.
//!
//! # Example
//!
//! ```
//! use webweaver::forge::mock::{MockCall, MockForge};
//! use webweaver::forge::{Forge, ForgeUser};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new();
//!
//! let user = forge.authenticated_user().await.unwrap();
//! assert_eq!(user, ForgeUser { login: "octocat".to_string() });
//!
//! let ops = forge.operations();
//! assert!(matches!(ops[0], MockCall::AuthenticatedUser));
//! # });
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{
    BlobPayload, CreateRepoRequest, Forge, ForgeError, ForgeUser, NewCommit, Repository,
    TreeEntry,
};

/// Default login of the mock's authenticated user.
pub const MOCK_LOGIN: &str = "octocat";

/// Default branch the mock assigns to created repositories.
pub const MOCK_DEFAULT_BRANCH: &str = "main";

/// SHA of the auto-created initial commit every mock branch starts at.
pub const MOCK_INITIAL_SHA: &str = "initial-commit-sha";

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockForge {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockForgeInner {
    /// Recorded operations for verification.
    operations: Vec<MockCall>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Number of blob creations seen so far.
    blob_count: usize,
    /// Number of tree creations seen so far.
    tree_count: usize,
    /// Number of commit creations seen so far.
    commit_count: usize,
}

/// A recorded forge call, with the payload needed for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `authenticated_user` was called.
    AuthenticatedUser,
    /// `create_repository` was called with this repository name.
    CreateRepository {
        /// Requested repository name
        name: String,
        /// Whether auto-initialization was requested
        auto_init: bool,
    },
    /// `branch_head` was called for this branch.
    BranchHead {
        /// Branch name queried
        branch: String,
    },
    /// `create_blob` was called with this payload.
    CreateBlob {
        /// Base64 content uploaded
        content: String,
        /// Encoding marker sent alongside
        encoding: String,
        /// SHA the mock returned
        sha: String,
    },
    /// `create_tree` was called with these entries.
    CreateTree {
        /// Tree entries in request order
        entries: Vec<TreeEntry>,
    },
    /// `create_commit` was called.
    CreateCommit {
        /// Tree SHA referenced by the commit
        tree: String,
        /// Parent SHAs in request order
        parents: Vec<String>,
        /// Commit message
        message: String,
    },
    /// `update_branch_ref` was called.
    UpdateBranchRef {
        /// Branch name updated
        branch: String,
        /// Target commit SHA
        sha: String,
    },
}

impl MockCall {
    /// Short label for ordering assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            MockCall::AuthenticatedUser => "user",
            MockCall::CreateRepository { .. } => "create_repository",
            MockCall::BranchHead { .. } => "branch_head",
            MockCall::CreateBlob { .. } => "create_blob",
            MockCall::CreateTree { .. } => "create_tree",
            MockCall::CreateCommit { .. } => "create_commit",
            MockCall::UpdateBranchRef { .. } => "update_branch_ref",
        }
    }
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail authenticated_user with the given error.
    AuthenticatedUser(ForgeError),
    /// Fail create_repository with the given error.
    CreateRepository(ForgeError),
    /// Fail branch_head with the given error.
    BranchHead(ForgeError),
    /// Fail every create_blob call with the given error.
    CreateBlob(ForgeError),
    /// Fail only the create_blob call at this zero-based index.
    CreateBlobAt(usize, ForgeError),
    /// Fail create_tree with the given error.
    CreateTree(ForgeError),
    /// Fail create_commit with the given error.
    CreateCommit(ForgeError),
    /// Fail update_branch_ref with the given error.
    UpdateBranchRef(ForgeError),
}

impl MockForge {
    /// Create a new mock forge with no configured failures.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockForgeInner {
                operations: Vec::new(),
                fail_on: None,
                blob_count: 0,
                tree_count: 0,
                commit_count: 0,
            })),
        }
    }

    /// Configure one operation to fail.
    pub fn fail_on(&self, fail: FailOn) {
        self.inner.lock().unwrap().fail_on = Some(fail);
    }

    /// Snapshot of all recorded operations, in call order.
    pub fn operations(&self) -> Vec<MockCall> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Count of recorded operations with the given kind label.
    pub fn count_of(&self, kind: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .operations
            .iter()
            .filter(|op| op.kind() == kind)
            .count()
    }
}

impl Default for MockForge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn authenticated_user(&self) -> Result<ForgeUser, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockCall::AuthenticatedUser);

        if let Some(FailOn::AuthenticatedUser(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        Ok(ForgeUser {
            login: MOCK_LOGIN.to_string(),
        })
    }

    async fn create_repository(
        &self,
        request: CreateRepoRequest,
    ) -> Result<Repository, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockCall::CreateRepository {
            name: request.name.clone(),
            auto_init: request.auto_init,
        });

        if let Some(FailOn::CreateRepository(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        Ok(Repository {
            html_url: format!("https://github.mock/{}/{}", MOCK_LOGIN, request.name),
            name: request.name,
            owner: MOCK_LOGIN.to_string(),
            default_branch: MOCK_DEFAULT_BRANCH.to_string(),
        })
    }

    async fn branch_head(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
    ) -> Result<String, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockCall::BranchHead {
            branch: branch.to_string(),
        });

        if let Some(FailOn::BranchHead(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        Ok(MOCK_INITIAL_SHA.to_string())
    }

    async fn create_blob(
        &self,
        _owner: &str,
        _repo: &str,
        payload: &BlobPayload,
    ) -> Result<String, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        let index = inner.blob_count;
        inner.blob_count += 1;
        let sha = format!("blob-sha-{}", index + 1);
        inner.operations.push(MockCall::CreateBlob {
            content: payload.content.clone(),
            encoding: payload.encoding.to_string(),
            sha: sha.clone(),
        });

        match &inner.fail_on {
            Some(FailOn::CreateBlob(err)) => Err(err.clone()),
            Some(FailOn::CreateBlobAt(at, err)) if *at == index => Err(err.clone()),
            _ => Ok(sha),
        }
    }

    async fn create_tree(
        &self,
        _owner: &str,
        _repo: &str,
        entries: &[TreeEntry],
    ) -> Result<String, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.tree_count += 1;
        let sha = format!("tree-sha-{}", inner.tree_count);
        inner.operations.push(MockCall::CreateTree {
            entries: entries.to_vec(),
        });

        if let Some(FailOn::CreateTree(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        Ok(sha)
    }

    async fn create_commit(
        &self,
        _owner: &str,
        _repo: &str,
        commit: NewCommit,
    ) -> Result<String, ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.commit_count += 1;
        let sha = format!("commit-sha-{}", inner.commit_count);
        inner.operations.push(MockCall::CreateCommit {
            tree: commit.tree,
            parents: commit.parents,
            message: commit.message,
        });

        if let Some(FailOn::CreateCommit(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        Ok(sha)
    }

    async fn update_branch_ref(
        &self,
        _owner: &str,
        _repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<(), ForgeError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(MockCall::UpdateBranchRef {
            branch: branch.to_string(),
            sha: sha.to_string(),
        });

        if let Some(FailOn::UpdateBranchRef(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        Ok(())
    }
}
