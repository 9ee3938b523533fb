use super::{LayoutError, LayoutService};
use async_trait::async_trait;
use layerkit_designer::arrangement::{ArrangeRequest, ArrangeResponse};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Reply {
    Response(ArrangeResponse),
    Unavailable(String),
}

/// In-memory layout service that answers every request the same way.
///
/// Records each request it receives and can wait before answering, which
/// stands in for a slow model.
#[derive(Debug)]
pub struct StaticLayoutService {
    reply: Reply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<ArrangeRequest>>,
}

impl StaticLayoutService {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `response`.
    pub fn responding(response: ArrangeResponse) -> Self {
        Self::with_reply(Reply::Response(response))
    }

    /// Always fail with a transport error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Unavailable(message.into()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<ArrangeRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl LayoutService for StaticLayoutService {
    fn name(&self) -> &str {
        "static"
    }

    async fn arrange(&self, request: &ArrangeRequest) -> Result<ArrangeResponse, LayoutError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Reply::Response(response) => Ok(response.clone()),
            Reply::Unavailable(message) => Err(LayoutError::Unavailable(message.clone())),
        }
    }
}
