use thiserror::Error;

use crate::runtime::contract::{InvocationContext, LifecycleEvent};
use crate::runtime::response::ResponseEnvelope;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("failed to serialize callback body: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to deliver callback: {0}")]
    Transport(String),
    #[error("callback endpoint rejected response with status {status}")]
    Rejected { status: u16 },
}

pub trait ResponseSignal {
    fn send(
        &self,
        event: &LifecycleEvent,
        context: &InvocationContext,
        envelope: &ResponseEnvelope,
    ) -> Result<(), SignalError>;
}
