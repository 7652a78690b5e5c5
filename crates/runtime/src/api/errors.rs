//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and the request log so clients can
//! bubble them up with consistent context. Refused requests are not errors:
//! they come back as [`crate::Submission::Rejected`].
use thiserror::Error;
use tokio::sync::oneshot;

use crate::network::NetworkError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires an initial state before building")]
    MissingState,

    #[error("non-authoritative runtime requires a request forwarder")]
    MissingForwarder,

    #[error(transparent)]
    Network(#[from] NetworkError),
}
