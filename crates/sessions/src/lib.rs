//! Conversation sessions for the Contabot assistant.
//!
//! A session is a short-term, two-way conversation between a user and the
//! application, not a database connection session.

use anyhow::Result;

/// State gathered over the course of a conversation with a user.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Session;

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist the information gathered during the session to a permanent
    /// state, for example by writing records through the database layer.
    ///
    /// Extension point for the conversation manager built on top of the
    /// persistence layer; no state is gathered yet, so nothing is written.
    pub fn commit(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_on_empty_session_is_a_no_op() {
        let session = Session::new();
        assert!(session.commit().is_ok());
    }
}
