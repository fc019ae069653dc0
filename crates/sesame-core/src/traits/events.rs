//! Auth event stream trait.

use futures_core::Stream;

use crate::event::AuthEvent;

/// Stream of auth state change events pushed by a backend.
pub trait EventStream: Stream<Item = AuthEvent> + Send + Unpin {}

impl<T> EventStream for T where T: Stream<Item = AuthEvent> + Send + Unpin {}
