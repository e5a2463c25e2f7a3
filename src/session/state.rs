//! Session lifecycle state machine.

/// Lifecycle state of a session's backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The backing file has not been opened yet.
    #[default]
    Uninitialized,
    /// The backing file is open and owned by the session.
    Active,
    /// The entries have been flushed and the file released.
    Closed,
}

impl SessionState {
    /// Check if transition to target state is valid.
    ///
    /// Valid transitions:
    /// - Uninitialized -> Active
    /// - Active -> Closed
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        use SessionState::*;
        matches!((*self, target), (Uninitialized, Active) | (Active, Closed))
    }

    /// Attempt to transition to a new state.
    ///
    /// Returns `Ok(())` if the transition is valid, or an error otherwise.
    pub fn transition_to(&mut self, target: SessionState) -> crate::Result<()> {
        if self.can_transition_to(target) {
            *self = target;
            Ok(())
        } else {
            Err(crate::error::SessionError::InvalidStateTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Check if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed)
    }

    /// Check if the session owns an open file.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active)
    }
}
