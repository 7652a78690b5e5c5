use crate::network::RequestForwarder;

/// Who decides acceptance order for this peer.
pub enum Authority {
    /// This process is the host: accepted requests are queued here.
    Local,
    /// Another peer is the host: accepted requests are forwarded and only
    /// executed once they come back as authoritative instructions.
    Remote(Box<dyn RequestForwarder>),
}

impl Authority {
    pub fn remote(forwarder: impl RequestForwarder + 'static) -> Self {
        Self::Remote(Box::new(forwarder))
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }
}

impl std::fmt::Debug for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "Local"),
            Self::Remote(_) => write!(f, "Remote"),
        }
    }
}
