//! Caller identity for the duration of a request.
//!
//! The subject is scoped to a task rather than passed through every call, so
//! code deep inside a request (such as the recipe loader) can pick up the
//! caller's token without the intermediate layers knowing about it.

use std::fmt;
use std::future::Future;

tokio::task_local! {
    static CURRENT_SUBJECT: Subject;
}

/// The caller a request runs on behalf of.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Subject {
    pub name: Option<String>,
    pub token: Option<String>,
}

impl Subject {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            name: None,
            token: Some(token.into()),
        }
    }
}

// Tokens must not end up in logs
impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("name", &self.name)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

pub struct EnvironmentContext;

impl EnvironmentContext {
    /// Run `future` with `subject` as the current subject.
    pub async fn scope<F: Future>(subject: Subject, future: F) -> F::Output {
        CURRENT_SUBJECT.scope(subject, future).await
    }

    /// Run `f` with `subject` as the current subject.
    pub fn sync_scope<R>(subject: Subject, f: impl FnOnce() -> R) -> R {
        CURRENT_SUBJECT.sync_scope(subject, f)
    }

    /// The current subject, if running inside a scope.
    pub fn current_subject() -> Option<Subject> {
        CURRENT_SUBJECT.try_with(Subject::clone).ok()
    }

    /// The current subject's token, if any.
    pub fn current_token() -> Option<String> {
        CURRENT_SUBJECT
            .try_with(|subject| subject.token.clone())
            .ok()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subject_outside_scope() {
        assert!(EnvironmentContext::current_subject().is_none());
        assert!(EnvironmentContext::current_token().is_none());
    }

    #[test]
    fn test_sync_scope() {
        let token = EnvironmentContext::sync_scope(Subject::new("alice", "t0k3n"), || {
            EnvironmentContext::current_token()
        });
        assert_eq!(token.as_deref(), Some("t0k3n"));
        assert!(EnvironmentContext::current_token().is_none());
    }

    #[tokio::test]
    async fn test_async_scope() {
        let subject = EnvironmentContext::scope(Subject::anonymous(), async {
            EnvironmentContext::current_subject()
        })
        .await;
        assert_eq!(subject, Some(Subject::anonymous()));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", Subject::new("alice", "secret-token"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("secret-token"));
    }
}
