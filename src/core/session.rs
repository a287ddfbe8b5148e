//! core::session
//!
//! Explicit tagged-state lifecycle for callers driving the generate/publish
//! flow.
//!
//! # Design
//!
//! The surrounding application (a UI, typically) owns one [`Session`] value
//! and advances it as operations complete. The generation and publishing
//! layers are pure request/response operations with no awareness of this
//! state; they never read or mutate a session.
//!
//! Transitions form a simple forward path with an error sink:
//!
//! ```text
//! Idle -> Generating -> Generated -> Publishing -> Published
//!   any state -------------------------------------> Failed
//!   Failed / Published ------------------------------> Idle (reset)
//! ```

use crate::core::types::GeneratedProject;

/// Lifecycle state of one generate-and-publish flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// Waiting for a prompt.
    #[default]
    Idle,
    /// A generation request is in flight.
    Generating,
    /// Generation succeeded; awaiting a repository name and token.
    Generated(GeneratedProject),
    /// A publish is in flight for the contained project.
    Publishing(GeneratedProject),
    /// Publish succeeded; the repository lives at `url`.
    Published {
        /// Canonical web URL of the published repository
        url: String,
    },
    /// An operation failed with a displayable message.
    Failed {
        /// Human-readable failure description
        message: String,
    },
}

impl Session {
    /// True if an operation is currently in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Session::Generating | Session::Publishing(_))
    }

    /// Record a failure from any state.
    pub fn fail(&mut self, message: impl Into<String>) {
        *self = Session::Failed {
            message: message.into(),
        };
    }

    /// Return to `Idle`, discarding any result or error.
    pub fn reset(&mut self) {
        *self = Session::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GeneratedFile;

    fn project() -> GeneratedProject {
        GeneratedProject {
            files: vec![GeneratedFile::new("README.md", "# demo")],
            suggested_repo_name: "demo-site".to_string(),
        }
    }

    #[test]
    fn default_is_idle() {
        assert_eq!(Session::default(), Session::Idle);
    }

    #[test]
    fn busy_states() {
        assert!(Session::Generating.is_busy());
        assert!(Session::Publishing(project()).is_busy());
        assert!(!Session::Idle.is_busy());
        assert!(!Session::Generated(project()).is_busy());
        assert!(!Session::Published { url: "u".into() }.is_busy());
    }

    #[test]
    fn fail_from_any_state_records_message() {
        let mut session = Session::Publishing(project());
        session.fail("repository name taken");
        assert_eq!(
            session,
            Session::Failed {
                message: "repository name taken".to_string()
            }
        );
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut session = Session::Published { url: "u".into() };
        session.reset();
        assert_eq!(session, Session::Idle);
    }
}
