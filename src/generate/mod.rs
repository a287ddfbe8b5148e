//! generate
//!
//! Generation client for the Gemini content-generation endpoint.
//!
//! # Design
//!
//! One single-shot call: the user's prompt goes out with a fixed system
//! instruction, a JSON response schema, and a low temperature for
//! deterministic output. The model's reply is untrusted input; its
//! structure is validated completely before a [`GeneratedProject`] is
//! constructed. There is no retry: a malformed response is a terminal
//! failure surfaced to the caller.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::core::types::{has_readme, GeneratedProject};

/// Default Gemini API base URL.
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for project generation.
const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Environment variable holding the Gemini API key.
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Sampling temperature; kept low so the structured output stays stable.
const TEMPERATURE: f64 = 0.2;

/// Fixed system instruction sent with every generation request.
const SYSTEM_INSTRUCTION: &str = "\
You are a world-class senior software engineer. Your task is to generate a \
complete, functional, and production-ready web application based on the \
user's prompt.

Follow these rules strictly:
1. Tech Stack Decision: use the languages, frameworks, and libraries the \
user specifies. If the user does NOT specify a tech stack, default to a \
modern, production-ready stack: React 18+, TypeScript, and Tailwind CSS, \
built with Vite.
2. Project Structure: generate a complete and logical project structure for \
the chosen stack. It MUST include all necessary configuration and dependency \
files (e.g. package.json, vite.config.ts, requirements.txt), a .gitignore \
appropriate for the project type, a clear entry point, source code organized \
into logical directories, and a README.md with a brief project description, \
setup instructions (git clone, dependency installation), and how to run the \
application locally, specific to the generated stack.
3. Output Format: your entire response MUST be a single, valid JSON object \
that strictly adheres to the provided response schema, with two keys: \
\"files\" (an array of file objects) and \"suggestedRepoName\" (a \
URL-friendly kebab-case repository name based on the prompt).
4. Code Quality: the code must be clean, follow best practices for the \
chosen technologies, and be a fully working, deployable application. No \
placeholder code.
5. Self-Contained: the generated project must run correctly after a user \
follows the setup instructions in the generated README.md.";

/// Errors from the generation client.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// Network or connection error; no response was received.
    #[error("network error: {0}")]
    Network(String),

    /// The generation endpoint returned an error.
    #[error("generation API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// The model's output violated the structural contract.
    #[error("generation output rejected: {0}")]
    Schema(String),
}

/// Configuration for the generation client.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key
    pub api_key: String,
    /// Model identifier (e.g. `gemini-2.5-pro`)
    pub model: String,
    /// API base URL (configurable for tests)
    pub api_base: String,
}

// Custom Debug to avoid exposing the API key
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("has_api_key", &!self.api_key.is_empty())
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GeminiConfig {
    /// Configuration for the default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Build a configuration from the `GEMINI_API_KEY` environment variable.
    ///
    /// Returns `None` when the variable is unset or empty.
    pub fn from_env() -> Option<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.is_empty() => Some(Self::new(key)),
            _ => None,
        }
    }
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Debug)]
pub struct GeminiClient {
    /// HTTP client for making requests
    client: Client,
    /// Endpoint configuration
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a client from a configuration.
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Generate a project from a natural-language prompt.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Network`] if the request never completes
    /// - [`GenerationError::Api`] on a non-success response
    /// - [`GenerationError::Schema`] if the model output fails validation
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedProject, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        );

        let body = json!({
            "system_instruction": {
                "parts": [{ "text": SYSTEM_INSTRUCTION }]
            },
            "contents": [{
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
                "temperature": TEMPERATURE,
            }
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<GeminiErrorResponse>().await {
                Ok(err) => err.error.message,
                Err(_) => "Unknown error".to_string(),
            };
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateContentResponse =
            response.json().await.map_err(|e| GenerationError::Api {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })?;

        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| GenerationError::Schema("model returned no text part".into()))?;

        parse_project(text.trim())
    }
}

/// Parse and validate the model's JSON output.
fn parse_project(text: &str) -> Result<GeneratedProject, GenerationError> {
    let project: GeneratedProject = serde_json::from_str(text)
        .map_err(|e| GenerationError::Schema(format!("output is not valid project JSON: {}", e)))?;
    validate_project(&project)?;
    Ok(project)
}

/// Enforce the structural contract on a parsed project.
///
/// The raw model output is never trusted as-is; every violation is a
/// rejection, not a coercion.
pub fn validate_project(project: &GeneratedProject) -> Result<(), GenerationError> {
    if project.files.is_empty() {
        return Err(GenerationError::Schema("'files' is empty".into()));
    }
    if project.files.iter().any(|f| f.path.is_empty()) {
        return Err(GenerationError::Schema(
            "a generated file has an empty path".into(),
        ));
    }
    if project.suggested_repo_name.is_empty() {
        return Err(GenerationError::Schema(
            "'suggestedRepoName' is empty".into(),
        ));
    }
    if !has_readme(&project.files) {
        return Err(GenerationError::Schema(
            "generated project is missing a README.md file".into(),
        ));
    }
    Ok(())
}

/// The response schema the model is constrained to.
fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "files": {
                "type": "ARRAY",
                "description": "An array of file objects representing the complete application.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "path": {
                            "type": "STRING",
                            "description": "The full path of the file, e.g. \"src/components/Button.tsx\"."
                        },
                        "content": {
                            "type": "STRING",
                            "description": "The complete content of the file."
                        }
                    },
                    "required": ["path", "content"]
                }
            },
            "suggestedRepoName": {
                "type": "STRING",
                "description": "A short, URL-friendly (kebab-case) repository name based on the prompt."
            }
        },
        "required": ["files", "suggestedRepoName"]
    })
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

/// Gemini error response format.
#[derive(Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorBody,
}

/// Inner error body.
#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini generateContent response format.
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// One response candidate.
#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

/// A candidate's content parts.
#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

/// One content part; only text parts are used.
#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GeneratedFile;

    fn valid_project() -> GeneratedProject {
        GeneratedProject {
            files: vec![
                GeneratedFile::new("index.html", "<h1>hi</h1>"),
                GeneratedFile::new("README.md", "# demo"),
            ],
            suggested_repo_name: "demo-site".to_string(),
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn accepts_valid_project() {
            assert!(validate_project(&valid_project()).is_ok());
        }

        #[test]
        fn rejects_empty_file_set() {
            let mut project = valid_project();
            project.files.clear();
            assert!(matches!(
                validate_project(&project),
                Err(GenerationError::Schema(_))
            ));
        }

        #[test]
        fn rejects_empty_path() {
            let mut project = valid_project();
            project.files.push(GeneratedFile::new("", "orphan"));
            assert!(matches!(
                validate_project(&project),
                Err(GenerationError::Schema(_))
            ));
        }

        #[test]
        fn rejects_empty_repo_name() {
            let mut project = valid_project();
            project.suggested_repo_name.clear();
            assert!(matches!(
                validate_project(&project),
                Err(GenerationError::Schema(_))
            ));
        }

        #[test]
        fn rejects_missing_readme() {
            let mut project = valid_project();
            project.files.retain(|f| f.path != "README.md");
            let err = validate_project(&project).unwrap_err();
            assert!(matches!(err, GenerationError::Schema(_)));
            assert!(err.to_string().contains("README"));
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn parses_well_formed_output() {
            let text = r##"{
                "files": [
                    {"path": "index.html", "content": "<h1>hi</h1>"},
                    {"path": "README.md", "content": "# demo"}
                ],
                "suggestedRepoName": "demo-site"
            }"##;
            let project = parse_project(text).unwrap();
            assert_eq!(project.files.len(), 2);
            assert_eq!(project.suggested_repo_name, "demo-site");
        }

        #[test]
        fn rejects_non_json_output() {
            let err = parse_project("Sure! Here's your project:").unwrap_err();
            assert!(matches!(err, GenerationError::Schema(_)));
        }

        #[test]
        fn rejects_missing_repo_name_field() {
            let text = r##"{"files": [{"path": "README.md", "content": "# demo"}]}"##;
            assert!(matches!(
                parse_project(text),
                Err(GenerationError::Schema(_))
            ));
        }

        #[test]
        fn rejects_non_string_repo_name() {
            let text = r##"{
                "files": [{"path": "README.md", "content": "# demo"}],
                "suggestedRepoName": 42
            }"##;
            assert!(matches!(
                parse_project(text),
                Err(GenerationError::Schema(_))
            ));
        }
    }

    mod config {
        use super::*;

        #[test]
        fn new_uses_defaults() {
            let config = GeminiConfig::new("key");
            assert_eq!(config.model, "gemini-2.5-pro");
            assert_eq!(
                config.api_base,
                "https://generativelanguage.googleapis.com/v1beta"
            );
        }

        #[test]
        fn debug_redacts_api_key() {
            let config = GeminiConfig::new("secret_key_abc123");
            let debug_output = format!("{:?}", config);
            assert!(!debug_output.contains("secret_key_abc123"));
            assert!(debug_output.contains("has_api_key"));
        }
    }

    #[test]
    fn response_schema_requires_both_fields() {
        let schema = response_schema();
        assert_eq!(
            schema["required"],
            serde_json::json!(["files", "suggestedRepoName"])
        );
        assert_eq!(
            schema["properties"]["files"]["items"]["required"],
            serde_json::json!(["path", "content"])
        );
    }

    #[test]
    fn generation_error_display() {
        assert_eq!(
            format!("{}", GenerationError::Network("timed out".into())),
            "network error: timed out"
        );
        assert_eq!(
            format!(
                "{}",
                GenerationError::Api {
                    status: 429,
                    message: "quota exceeded".into()
                }
            ),
            "generation API error: 429 - quota exceeded"
        );
        assert_eq!(
            format!("{}", GenerationError::Schema("'files' is empty".into())),
            "generation output rejected: 'files' is empty"
        );
    }
}
