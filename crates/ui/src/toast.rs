use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::broadcast;

/// Tone of a toast: neutral or destructive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

/// One transient user-facing message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(title: &str, description: &str, variant: ToastVariant) -> Self {
        Self { title: title.to_string(), description: description.to_string(), variant }
    }
}

/// Notification surface the hook writes to.
pub trait ToastSink: Send + Sync {
    fn push(&self, toast: Toast);
}

impl<T: ToastSink + ?Sized> ToastSink for Arc<T> {
    fn push(&self, toast: Toast) {
        (**self).push(toast)
    }
}

/// Keeps every toast in arrival order until drained.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastQueue {
    pub fn new() -> Self { Self::default() }

    pub fn snapshot(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ToastSink for ToastQueue {
    fn push(&self, toast: Toast) {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner).push(toast);
    }
}

/// Fans toasts out to live subscribers. Toasts pushed with no subscriber are dropped.
#[derive(Debug, Clone)]
pub struct ToastChannel {
    tx: broadcast::Sender<Toast>,
}

impl ToastChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }
}

impl ToastSink for ToastChannel {
    fn push(&self, toast: Toast) {
        let _ = self.tx.send(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_keeps_order_and_drains() {
        let q = ToastQueue::new();
        q.push(Toast::new("a", "1", ToastVariant::Default));
        q.push(Toast::new("b", "2", ToastVariant::Destructive));
        assert_eq!(q.len(), 2);
        let drained = q.drain();
        assert_eq!(drained[0].title, "a");
        assert_eq!(drained[1].variant, ToastVariant::Destructive);
        assert!(q.is_empty());
    }

    #[tokio::test]
    async fn channel_delivers_to_subscribers() {
        let ch = ToastChannel::new(8);
        ch.push(Toast::new("lost", "no subscriber yet", ToastVariant::Default));
        let mut rx = ch.subscribe();
        ch.push(Toast::new("Saved", "ok", ToastVariant::Default));
        let got = rx.recv().await.unwrap();
        assert_eq!(got.title, "Saved");
    }

    #[test]
    fn variant_serializes_lowercase() {
        let t = Toast::new("Error", "boom", ToastVariant::Destructive);
        assert_eq!(
            serde_json::to_value(&t).unwrap(),
            serde_json::json!({"title": "Error", "description": "boom", "variant": "destructive"})
        );
    }
}
