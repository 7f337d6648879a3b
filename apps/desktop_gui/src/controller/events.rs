//! Backend-to-UI events and error modeling for the desktop controller.

use client_core::LookupOutcome;
use shared::domain::Code;

use crate::ui::app::PhotoImage;

pub enum UiEvent {
    Info(String),
    LookupFinished {
        code: Code,
        result: Result<LookupOutcome, UiError>,
    },
    SubmissionFinished(Result<(), UiError>),
    PhotoLoaded {
        url: String,
        image: PhotoImage,
    },
    PhotoFailed {
        url: String,
        error: UiError,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Lookup,
    Submission,
    Photo,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("please fill in")
            || message_lower.contains("incomplete")
            || message_lower.contains("invalid base url")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("dns")
            || message_lower.contains("transport")
            || message_lower.contains("status")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Validation => "Input",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

pub fn context_label(context: UiErrorContext) -> &'static str {
    match context {
        UiErrorContext::BackendStartup => "startup",
        UiErrorContext::Lookup => "lookup",
        UiErrorContext::Submission => "submission",
        UiErrorContext::Photo => "photo loading",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_and_timeouts_as_transport() {
        let err = UiError::from_message(UiErrorContext::Lookup, "service returned status 503");
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.context(), UiErrorContext::Lookup);

        let err = UiError::from_message(
            UiErrorContext::Submission,
            "transport failure: operation timed out",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn classifies_local_rejections_as_validation() {
        let err = UiError::from_message(UiErrorContext::Submission, "Please fill in all fields");
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err_label(err.category()), "Input");
    }

    #[test]
    fn backend_queue_disconnect_is_transport() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(
            err.message(),
            "Backend command processor disconnected (possible startup/runtime failure)"
        );
    }
}
