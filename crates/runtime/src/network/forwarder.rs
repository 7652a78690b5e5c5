use game_core::Request;
use tokio::sync::mpsc;
use tracing::warn;

/// Sends an enriched request to the authoritative peer.
///
/// Fire and forget: the queue never waits for delivery. The effect of a
/// forwarded request arrives later as a new authoritative instruction.
pub trait RequestForwarder: Send {
    fn forward(&self, request: Request);
}

impl<F> RequestForwarder for F
where
    F: Fn(Request) + Send,
{
    fn forward(&self, request: Request) {
        self(request)
    }
}

/// Forwarder that hands requests to a transport task over a channel.
#[derive(Debug, Clone)]
pub struct ChannelForwarder {
    tx: mpsc::UnboundedSender<Request>,
}

impl ChannelForwarder {
    pub fn new(tx: mpsc::UnboundedSender<Request>) -> Self {
        Self { tx }
    }
}

impl RequestForwarder for ChannelForwarder {
    fn forward(&self, request: Request) {
        let kind = request.kind();
        if self.tx.send(request).is_err() {
            warn!(
                target: "runtime::network",
                kind = %kind,
                "transport closed; forwarded request lost"
            );
        }
    }
}
