//! Presentation helpers shared by HUMPBANK front ends: the error/success
//! notification hook and the status badge.

pub mod badge;
pub mod notify;
pub mod toast;

pub use badge::{escape_html, Badge, BadgeVariant};
pub use notify::{ErrorPayload, Notifier, GENERIC_ERROR_MESSAGE};
pub use toast::{Toast, ToastChannel, ToastQueue, ToastSink, ToastVariant};
