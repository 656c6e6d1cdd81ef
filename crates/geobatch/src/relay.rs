//! Engine → host callback forwarding.
//!
//! Each relay pairs a host function with an opaque token and hands the token
//! back by reference, unmodified, on every invocation. Invocation is
//! synchronous and on the engine call's thread: a message or match reaches the
//! host before the engine call that produced it returns. Nothing is buffered,
//! reordered or filtered.
//!
//! A host handler must not re-enter the same handle if the engine forbids it;
//! the relays neither enforce nor relax that.

use crate::engine::{Engine, MessageSink};

/// Diagnostic message handler plus its token.
#[derive(Clone, Debug)]
pub struct ErrorRelay<T> {
    handler: fn(&str, &T),
    token: T,
}

impl<T> ErrorRelay<T> {
    pub fn new(handler: fn(&str, &T), token: T) -> Self {
        Self { handler, token }
    }

    #[inline]
    pub fn token(&self) -> &T {
        &self.token
    }

    #[inline]
    pub fn relay(&self, message: &str) {
        (self.handler)(message, &self.token);
    }
}

impl<T: 'static> ErrorRelay<T> {
    /// Box the relay as an engine message sink.
    pub fn into_sink(self) -> MessageSink {
        Box::new(move |message: &str| self.relay(message))
    }
}

/// Install `relay` as the message handler of `ctx`, replacing any previous one.
pub fn register_error_relay<E: Engine, T: 'static>(ctx: &mut E, relay: ErrorRelay<T>) {
    tracing::debug!("installing error relay");
    ctx.set_message_handler(Some(relay.into_sink()));
}

/// Remove the message handler of `ctx`; later messages are dropped by the engine.
pub fn clear_error_relay<E: Engine>(ctx: &mut E) {
    ctx.set_message_handler(None);
}

/// Spatial-index query match handler plus its token.
#[derive(Clone, Debug)]
pub struct QueryRelay<I, T> {
    handler: fn(&I, &T),
    token: T,
}

impl<I, T> QueryRelay<I, T> {
    pub fn new(handler: fn(&I, &T), token: T) -> Self {
        Self { handler, token }
    }

    #[inline]
    pub fn token(&self) -> &T {
        &self.token
    }

    #[inline]
    pub fn on_match(&self, item: &I) {
        (self.handler)(item, &self.token);
    }
}

/// Pairwise item distance handler plus its token.
///
/// The handler writes into the distance slot and returns `false` on failure.
#[derive(Clone, Debug)]
pub struct DistanceRelay<I, T> {
    handler: fn(&I, &I, &mut f64, &T) -> bool,
    token: T,
}

impl<I, T> DistanceRelay<I, T> {
    pub fn new(handler: fn(&I, &I, &mut f64, &T) -> bool, token: T) -> Self {
        Self { handler, token }
    }

    #[inline]
    pub fn token(&self) -> &T {
        &self.token
    }

    #[inline]
    pub fn distance(&self, a: &I, b: &I, out: &mut f64) -> bool {
        (self.handler)(a, b, out, &self.token)
    }
}
