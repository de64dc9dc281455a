//! Response interception and user notification.
//!
//! Every round-trip outcome passes through [`ResponseInterceptor::intercept`].
//! A non-2xx response is shown to the user through a [`Notifier`] and then
//! still returned as an error. A round trip that produced no response is
//! returned as an error without notifying anyone.

use std::sync::Arc;

use crate::client::check_status;
use crate::error::{ApiError, TransportError};
use crate::http::HttpResponse;

/// Sink for messages that must interrupt the user.
///
/// Implementations are called synchronously on the task that received the
/// response and must return promptly.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) {
        self(message)
    }
}

/// Emits notifications as `error` events under the `todo_core::notify`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::error!(target: "todo_core::notify", "{message}");
    }
}

/// Text shown to the user for a server-reported error.
pub fn notification_message(status: u16, error: &str) -> String {
    format!("Error: {status} - {error}")
}

#[derive(Clone)]
pub struct ResponseInterceptor {
    notifier: Arc<dyn Notifier>,
}

impl ResponseInterceptor {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub fn intercept(
        &self,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<HttpResponse, ApiError> {
        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(error = %err, "no response received");
                return Err(ApiError::Transport(err));
            }
        };
        if let Err(err) = check_status(&response) {
            if let ApiError::Server { status, message } = &err {
                tracing::warn!(status, %message, "server reported an error");
                self.notifier.notify(&notification_message(*status, message));
            }
            return Err(err);
        }
        Ok(response)
    }
}

impl std::fmt::Debug for ResponseInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseInterceptor").finish_non_exhaustive()
    }
}
