use std::error::Error;
use std::fmt::Debug;

use serde_json::Value;
use service::ServiceError;
use tracing::error;

use crate::toast::{Toast, ToastSink, ToastVariant};

/// Shown when neither the error nor the caller supplies anything usable.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// An error of unknown shape, reduced to what can be shown to a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorPayload {
    /// An error object carrying a message.
    Message(String),
    /// The error is itself a piece of text.
    Text(String),
    /// Nothing displayable.
    Unknown,
}

impl ErrorPayload {
    pub fn from_error(err: &(dyn Error + '_)) -> Self {
        Self::Message(err.to_string())
    }

    /// Display message by precedence: message, text, `default_message`, generic fallback.
    /// Empty strings count as absent.
    pub fn resolve(&self, default_message: Option<&str>) -> String {
        let own = match self {
            ErrorPayload::Message(m) => Some(m.as_str()),
            ErrorPayload::Text(t) => Some(t.as_str()),
            ErrorPayload::Unknown => None,
        };
        own.filter(|s| !s.is_empty())
            .or(default_message.filter(|s| !s.is_empty()))
            .unwrap_or(GENERIC_ERROR_MESSAGE)
            .to_string()
    }
}

impl From<&str> for ErrorPayload {
    fn from(s: &str) -> Self { Self::Text(s.to_string()) }
}

impl From<String> for ErrorPayload {
    fn from(s: String) -> Self { Self::Text(s) }
}

impl From<&ServiceError> for ErrorPayload {
    fn from(e: &ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) | ServiceError::NotFound(msg) => Self::Message(msg.clone()),
            ServiceError::Backend(inner) => Self::Message(inner.to_string()),
        }
    }
}

impl From<ServiceError> for ErrorPayload {
    fn from(e: ServiceError) -> Self { Self::from(&e) }
}

/// Dynamic values: `{"message": "..."}` carries a message, a bare string is text.
impl From<&Value> for ErrorPayload {
    fn from(v: &Value) -> Self {
        match v {
            Value::String(s) => Self::Text(s.clone()),
            Value::Object(map) => match map.get("message") {
                Some(Value::String(m)) => Self::Message(m.clone()),
                _ => Self::Unknown,
            },
            _ => Self::Unknown,
        }
    }
}

impl From<Value> for ErrorPayload {
    fn from(v: Value) -> Self { Self::from(&v) }
}

impl<T: Into<ErrorPayload>> From<Option<T>> for ErrorPayload {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Unknown)
    }
}

/// Routes failures and confirmations to the notification surface.
///
/// Every call produces exactly one toast; nothing is deduplicated.
pub struct Notifier<S: ToastSink> {
    sink: S,
}

impl<S: ToastSink> Notifier<S> {
    pub fn new(sink: S) -> Self { Self { sink } }

    /// Log the raw error, show one destructive toast, and return the message shown.
    pub fn handle_error<E>(&self, err: E, default_message: Option<&str>) -> String
    where
        E: Debug + Into<ErrorPayload>,
    {
        error!(error = ?err, "operation failed");
        let message = err.into().resolve(default_message);
        self.sink.push(Toast::new("Error", &message, ToastVariant::Destructive));
        message
    }

    pub fn handle_success(&self, message: &str) {
        self.sink.push(Toast::new("Success", message, ToastVariant::Default));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::ToastQueue;
    use serde_json::json;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn notifier() -> (Arc<ToastQueue>, Notifier<Arc<ToastQueue>>) {
        let q = Arc::new(ToastQueue::new());
        (q.clone(), Notifier::new(q))
    }

    #[test]
    fn error_message_wins_and_one_destructive_toast() {
        let (q, n) = notifier();
        let boom = io::Error::new(io::ErrorKind::Other, "boom");
        let msg = n.handle_error(ErrorPayload::from_error(&boom), Some("fallback"));
        assert_eq!(msg, "boom");
        let toasts = q.drain();
        assert_eq!(toasts, vec![Toast::new("Error", "boom", ToastVariant::Destructive)]);
    }

    #[test]
    fn plain_text_is_used_as_is() {
        let (_, n) = notifier();
        assert_eq!(n.handle_error("plain text", Some("fallback")), "plain text");
    }

    #[test]
    fn missing_error_uses_default_then_generic() {
        let (q, n) = notifier();
        assert_eq!(n.handle_error(None::<&str>, Some("fallback")), "fallback");
        assert_eq!(n.handle_error(ErrorPayload::Unknown, None), GENERIC_ERROR_MESSAGE);
        assert_eq!(n.handle_error(ErrorPayload::Unknown, Some("")), GENERIC_ERROR_MESSAGE);
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn empty_message_falls_through() {
        let (_, n) = notifier();
        assert_eq!(n.handle_error(ErrorPayload::Message(String::new()), Some("fallback")), "fallback");
        assert_eq!(n.handle_error("", None), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn dynamic_values_are_classified() {
        assert_eq!(ErrorPayload::from(json!({"message": "denied", "code": 42})), ErrorPayload::Message("denied".into()));
        assert_eq!(ErrorPayload::from(json!("oops")), ErrorPayload::Text("oops".into()));
        assert_eq!(ErrorPayload::from(json!({"code": 42})), ErrorPayload::Unknown);
        assert_eq!(ErrorPayload::from(json!(null)), ErrorPayload::Unknown);
        assert_eq!(ErrorPayload::from(json!({"message": 7})), ErrorPayload::Unknown);
    }

    #[test]
    fn service_errors_show_their_inner_message() {
        let (_, n) = notifier();
        let e = ServiceError::Validation("email is invalid".into());
        assert_eq!(n.handle_error(&e, None), "email is invalid");
        let e = ServiceError::Backend(backend::BackendError::query(400, Some("23505"), "duplicate key"));
        assert_eq!(n.handle_error(e, None), "duplicate key");
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn raw_error_details_reach_the_log() {
        let logs = Captured::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let message = tracing::subscriber::with_default(subscriber, || {
            let (_, n) = notifier();
            let err = backend::BackendError::Query {
                status: 409,
                code: Some("23505".into()),
                message: "duplicate key".into(),
                details: Some("Key (email) already exists.".into()),
                hint: None,
            };
            n.handle_error(ServiceError::Backend(err), None)
        });

        assert_eq!(message, "duplicate key");
        let line = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(line.contains("ERROR"));
        assert!(line.contains("409"));
        assert!(line.contains("23505"));
        assert!(line.contains("Key (email) already exists."));
    }

    #[test]
    fn success_is_neutral_and_not_deduplicated() {
        let (q, n) = notifier();
        n.handle_success("Saved");
        n.handle_success("Saved");
        let toasts = q.drain();
        assert_eq!(toasts.len(), 2);
        assert!(toasts.iter().all(|t| *t == Toast::new("Success", "Saved", ToastVariant::Default)));
    }
}
