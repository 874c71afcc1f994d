//! Routing error type.

use thiserror::Error;

use mf_core::LinkId;

/// Errors produced by a [`Router`][crate::Router].
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: LinkId, to: LinkId },

    #[error("link {0} not known to the router")]
    UnknownLink(LinkId),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
