use crate::domain::ports::GatewayTransport;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A request captured by [`InMemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub endpoint: String,
    pub payload: String,
}

/// A scripted, thread-safe transport that never touches the network.
///
/// Replies are handed out in the order they were queued. Every call is
/// recorded, including calls made after the script ran out, which fail with a
/// transport error.
#[derive(Default, Clone)]
pub struct InMemoryTransport {
    replies: Arc<RwLock<VecDeque<Result<String>>>>,
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response body.
    pub async fn push_reply(&self, body: impl Into<String>) {
        self.replies.write().await.push_back(Ok(body.into()));
    }

    /// Queues a transport failure.
    pub async fn push_failure(&self, reason: impl Into<String>) {
        self.replies
            .write()
            .await
            .push_back(Err(CheckoutError::Transport(reason.into())));
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl GatewayTransport for InMemoryTransport {
    async fn send(&self, endpoint: &str, payload: &str) -> Result<String> {
        self.requests.write().await.push(RecordedRequest {
            endpoint: endpoint.to_string(),
            payload: payload.to_string(),
        });
        self.replies
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(CheckoutError::Transport("no scripted reply".to_string())))
    }
}
