//! Failure types surfaced by join handles.

use std::any::Any;
use std::fmt;
use std::time::Duration;

/// Reason a launched task did not produce a value.
///
/// A failure is recorded on the task at the point where the work stops
/// and is handed to the first and every later joiner. It is never
/// dropped silently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkFailure {
    /// The work panicked while running.
    #[error("task panicked: {message}")]
    Panicked {
        /// Panic payload, when it was a string.
        message: String,
    },

    /// Fallible work returned an error.
    #[error("task failed: {message}")]
    Errored {
        /// `Display` rendering of the returned error.
        message: String,
    },

    /// The runtime shut down before the task could finish.
    #[error("task abandoned: runtime shut down before it finished")]
    Abandoned,
}

impl WorkFailure {
    /// Builds a failure from a `catch_unwind` payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("Box<dyn Any>")
        };

        WorkFailure::Panicked { message }
    }

    /// Builds a failure from the error returned by fallible work.
    pub(crate) fn errored(err: impl fmt::Display) -> Self {
        WorkFailure::Errored {
            message: err.to_string(),
        }
    }

    /// Returns `true` if the work panicked.
    pub fn is_panic(&self) -> bool {
        matches!(self, WorkFailure::Panicked { .. })
    }

    /// Returns `true` if the task never got to finish.
    pub fn is_abandoned(&self) -> bool {
        matches!(self, WorkFailure::Abandoned)
    }
}

/// A timed join gave up before the task reached a terminal state.
///
/// This is not a task outcome: the task keeps running and can be joined
/// again later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("task did not finish within {waited:?}")]
pub struct Timeout {
    /// How long the caller waited.
    pub waited: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads_are_rendered() {
        let failure = WorkFailure::from_panic(Box::new("boom"));
        assert_eq!(
            failure,
            WorkFailure::Panicked {
                message: "boom".into()
            }
        );

        let failure = WorkFailure::from_panic(Box::new(String::from("owned boom")));
        assert_eq!(failure.to_string(), "task panicked: owned boom");

        let failure = WorkFailure::from_panic(Box::new(7_u32));
        assert!(failure.is_panic());
        assert_eq!(failure.to_string(), "task panicked: Box<dyn Any>");
    }

    #[test]
    fn errors_keep_their_display_text() {
        let failure = WorkFailure::errored("disk on fire");
        assert_eq!(failure.to_string(), "task failed: disk on fire");
        assert!(!failure.is_panic());
        assert!(!failure.is_abandoned());
    }
}
