//! One-shot user alert for hard session failures

use crate::core::{RESTART_SESSION_ACTION, SESSION_FAILED_TITLE};
use crate::session::SessionError;
use serde::{Deserialize, Serialize};

/// Alert shown once when the tracking session fails
///
/// The single action only dismisses the alert; nothing is restarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAlert {
    pub title: String,
    pub message: String,
    pub action: String,
}

impl SessionAlert {
    /// Compose the alert for a transport failure; other errors produce none
    pub fn from_error(error: &SessionError) -> Option<Self> {
        let SessionError::TransportFailure { description, failure_reason, recovery_suggestion } = error else {
            return None;
        };

        let message = [Some(description), failure_reason.as_ref(), recovery_suggestion.as_ref()]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");

        Some(Self {
            title: SESSION_FAILED_TITLE.to_string(),
            message,
            action: RESTART_SESSION_ACTION.to_string(),
        })
    }
}
