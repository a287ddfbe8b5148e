//! forge::github
//!
//! GitHub forge implementation using the REST Git data API.
//!
//! # Design
//!
//! This module implements the `Forge` trait for GitHub. Only the low-level
//! object endpoints are used (blobs, trees, commits, refs) plus `/user` and
//! `/user/repos`; there is no use of the contents convenience API.
//!
//! # Authentication
//!
//! A static bearer token is attached to every request. The token is not
//! stored anywhere else and there is no refresh; an invalid token surfaces
//! as `ForgeError::AuthFailed` on the first call.
//!
//! # Errors
//!
//! Non-success responses are parsed for GitHub's `{ message, errors: [...] }`
//! shape. When a nested error carries its own message, it is folded into the
//! top-level one so the caller sees a single diagnostic string.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use async_trait::async_trait;

use super::traits::{
    BlobPayload, CreateRepoRequest, Forge, ForgeError, ForgeUser, NewCommit, Repository,
    TreeEntry,
};

/// Default GitHub API base URL.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "webweaver";

/// File mode for a regular (non-executable) file in a tree.
const REGULAR_FILE_MODE: &str = "100644";

/// GitHub forge implementation.
///
/// Stateless between calls apart from the configured token and the reused
/// `reqwest::Client` connection pool.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Bearer token attached to every request
    token: String,
    /// API base URL (configurable for GitHub Enterprise and tests)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("has_token", &!self.token.is_empty())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a new GitHub forge for api.github.com.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Create a GitHub forge with a custom API base URL.
    ///
    /// Use this for GitHub Enterprise installations or to point at a mock
    /// server in tests.
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            api_base: api_base.into(),
        }
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|_| ForgeError::AuthFailed("token contains invalid characters".into()))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build URL for a repository git-data endpoint.
    fn git_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!("{}/repos/{}/{}/git/{}", self.api_base, owner, repo, path)
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ForgeError> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ForgeError::ApiError {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle a success response whose body is ignored.
    ///
    /// Covers no-content responses: a 204 carries no JSON and must not be
    /// parsed as such.
    async fn handle_empty_response(&self, response: Response) -> Result<(), ForgeError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            self.handle_error_response(response, status).await
        }
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        &self,
        response: Response,
        status: StatusCode,
    ) -> Result<T, ForgeError> {
        // Fold the first nested error detail into the top-level message so
        // the caller sees one diagnostic string.
        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => match err.first_detail() {
                Some(detail) => format!("{} (Details: {})", err.message, detail),
                None => err.message,
            },
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => ForgeError::AuthFailed(format!("Permission denied: {}", message)),
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn authenticated_user(&self) -> Result<ForgeUser, ForgeError> {
        let url = format!("{}/user", self.api_base);

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let user: GitHubUser = self.handle_response(response).await?;
        Ok(ForgeUser { login: user.login })
    }

    async fn create_repository(
        &self,
        request: CreateRepoRequest,
    ) -> Result<Repository, ForgeError> {
        let url = format!("{}/user/repos", self.api_base);

        let body = CreateRepoBody {
            name: &request.name,
            description: &request.description,
            private: request.private,
            auto_init: request.auto_init,
        };

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let repo: GitHubRepository = self.handle_response(response).await?;
        Ok(Repository {
            name: repo.name,
            owner: repo.owner.login,
            default_branch: repo.default_branch,
            html_url: repo.html_url,
        })
    }

    async fn branch_head(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<String, ForgeError> {
        let url = self.git_url(owner, repo, &format!("ref/heads/{}", branch));

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let git_ref: GitHubRef = self.handle_response(response).await?;
        Ok(git_ref.object.sha)
    }

    async fn create_blob(
        &self,
        owner: &str,
        repo: &str,
        payload: &BlobPayload,
    ) -> Result<String, ForgeError> {
        let url = self.git_url(owner, repo, "blobs");

        let body = CreateBlobBody {
            content: &payload.content,
            encoding: payload.encoding,
        };

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let created: GitHubSha = self.handle_response(response).await?;
        Ok(created.sha)
    }

    async fn create_tree(
        &self,
        owner: &str,
        repo: &str,
        entries: &[TreeEntry],
    ) -> Result<String, ForgeError> {
        let url = self.git_url(owner, repo, "trees");

        let tree: Vec<TreeItemBody> = entries
            .iter()
            .map(|entry| TreeItemBody {
                path: &entry.path,
                mode: REGULAR_FILE_MODE,
                entry_type: "blob",
                sha: &entry.sha,
            })
            .collect();
        let body = CreateTreeBody { tree };

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let created: GitHubSha = self.handle_response(response).await?;
        Ok(created.sha)
    }

    async fn create_commit(
        &self,
        owner: &str,
        repo: &str,
        commit: NewCommit,
    ) -> Result<String, ForgeError> {
        let url = self.git_url(owner, repo, "commits");

        let body = CreateCommitBody {
            message: &commit.message,
            tree: &commit.tree,
            parents: &commit.parents,
        };

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        let created: GitHubSha = self.handle_response(response).await?;
        Ok(created.sha)
    }

    async fn update_branch_ref(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<(), ForgeError> {
        let url = self.git_url(owner, repo, &format!("refs/heads/{}", branch));

        // force stays false: the ref moves fast-forward only, and a
        // non-fast-forward rejection from the forge propagates as an error.
        let body = UpdateRefBody { sha, force: false };

        let response = self
            .client
            .patch(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        self.handle_empty_response(response).await
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Request body for creating a repository.
#[derive(Serialize)]
struct CreateRepoBody<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
    auto_init: bool,
}

/// Request body for creating a blob.
#[derive(Serialize)]
struct CreateBlobBody<'a> {
    content: &'a str,
    encoding: &'a str,
}

/// Request body for creating a tree.
#[derive(Serialize)]
struct CreateTreeBody<'a> {
    tree: Vec<TreeItemBody<'a>>,
}

/// One tree entry in the create-tree request.
#[derive(Serialize)]
struct TreeItemBody<'a> {
    path: &'a str,
    mode: &'a str,
    #[serde(rename = "type")]
    entry_type: &'a str,
    sha: &'a str,
}

/// Request body for creating a commit.
#[derive(Serialize)]
struct CreateCommitBody<'a> {
    message: &'a str,
    tree: &'a str,
    parents: &'a [String],
}

/// Request body for updating a ref.
#[derive(Serialize)]
struct UpdateRefBody<'a> {
    sha: &'a str,
    force: bool,
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
    #[serde(default)]
    errors: Vec<GitHubErrorDetail>,
}

impl GitHubErrorResponse {
    /// The message of the first nested error detail, when one exists.
    fn first_detail(&self) -> Option<&str> {
        self.errors.first().and_then(|e| e.message.as_deref())
    }
}

/// One nested error detail; GitHub omits `message` for some error codes.
#[derive(Deserialize)]
struct GitHubErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// GitHub user response format.
#[derive(Deserialize)]
struct GitHubUser {
    login: String,
}

/// GitHub repository response format.
#[derive(Deserialize)]
struct GitHubRepository {
    name: String,
    owner: GitHubOwner,
    default_branch: String,
    html_url: String,
}

/// Minimal owner info in a repository response.
#[derive(Deserialize)]
struct GitHubOwner {
    login: String,
}

/// GitHub ref response format.
#[derive(Deserialize)]
struct GitHubRef {
    object: GitHubRefObject,
}

/// The object a ref points at.
#[derive(Deserialize)]
struct GitHubRefObject {
    sha: String,
}

/// Response carrying just a SHA (blobs, trees, commits).
#[derive(Deserialize)]
struct GitHubSha {
    sha: String,
}
