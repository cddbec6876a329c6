//! Thread ownership check for the driver session.

use std::thread::{self, ThreadId};

use tracing::error;

use crate::error::FatalError;

/// Remembers the thread that created the driver session.
#[derive(Debug, Clone)]
pub struct ThreadAffinityGuard {
    owner: ThreadId,
    owner_name: String,
}

impl ThreadAffinityGuard {
    /// Bind to the calling thread.
    pub fn bind() -> Self {
        let current = thread::current();
        Self {
            owner: current.id(),
            owner_name: describe(&current),
        }
    }

    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Fail when called from any thread but the owner.
    pub fn check(&self, operation: &str) -> Result<(), FatalError> {
        let current = thread::current();
        if current.id() == self.owner {
            return Ok(());
        }
        let caller = describe(&current);
        error!(
            operation,
            owner = %self.owner_name,
            caller = %caller,
            "Browser session used from a foreign thread"
        );
        Err(FatalError::ThreadAffinityViolation {
            operation: operation.to_string(),
            owner: self.owner_name.clone(),
            caller,
        })
    }
}

fn describe(thread: &thread::Thread) -> String {
    match thread.name() {
        Some(name) => format!("{} ({:?})", name, thread.id()),
        None => format!("{:?}", thread.id()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_thread_passes() {
        let guard = ThreadAffinityGuard::bind();
        assert!(guard.check("get_snapshot").is_ok());
        assert_eq!(guard.owner(), thread::current().id());
    }

    #[test]
    fn test_foreign_thread_is_fatal() {
        let guard = ThreadAffinityGuard::bind();
        let result = thread::Builder::new()
            .name("intruder".to_string())
            .spawn(move || guard.check("click"))
            .unwrap()
            .join()
            .unwrap();

        match result {
            Err(FatalError::ThreadAffinityViolation {
                operation, caller, ..
            }) => {
                assert_eq!(operation, "click");
                assert!(caller.starts_with("intruder"));
            }
            other => panic!("expected violation, got {other:?}"),
        }
    }
}
