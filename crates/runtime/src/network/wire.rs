//! JSON wire format for requests.
//!
//! A request is a flat object tagged by `"type"`; the derived plan travels
//! under `"plan"` and is omitted for raw intents.

use game_core::Request;

use super::Result;

pub fn encode(request: &Request) -> Result<String> {
    Ok(serde_json::to_string(request)?)
}

pub fn decode(text: &str) -> Result<Request> {
    Ok(serde_json::from_str(text)?)
}
