//! Per-invocation session state

use crate::domain::{Actor, BlogError};

use super::output::Output;

/// State shared by every command of one invocation
///
/// The acting identity is optional: anonymous sessions may read, list,
/// search and generate paths, but anything that writes on someone's
/// behalf must ask for an actor first.
pub struct Session {
    pub output: Output,
    actor: Option<Actor>,
}

impl Session {
    pub fn new(output: Output, actor: Option<Actor>) -> Self {
        Self { output, actor }
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    /// Returns the actor, or an error naming what could not be done anonymously
    pub fn require_actor(&self, action: &str) -> Result<&Actor, BlogError> {
        self.actor
            .as_ref()
            .ok_or_else(|| BlogError::Anonymous(action.to_string()))
    }
}
