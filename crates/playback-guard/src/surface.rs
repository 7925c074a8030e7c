//! The embedded playback surface boundary.
//!
//! Models what the host controls about the third-party page: its document,
//! the in-page request function (wrappable, so a filter can interpose), and a
//! navigation policy slot checked before any top-level navigation.

use futures::future::BoxFuture;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

use crate::blocklist::{BlockList, NavigationDecision};
use crate::dom::Document;
use crate::relock;

#[derive(Debug, Error)]
pub enum RequestError {
    /// Intentional suppression; never surfaced to the user.
    #[error("request suppressed: {0}")]
    Blocked(String),
    #[error("network failure: {0}")]
    Network(String),
}

/// The page's request function. Interceptors wrap it, scoped to one surface
/// instance, never process-wide.
pub type RequestFn =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<(), RequestError>> + Send + Sync>;

fn passthrough_request_fn() -> RequestFn {
    Arc::new(|_url| Box::pin(async { Ok(()) }))
}

pub struct EmbeddedSurface {
    document: Arc<Mutex<Document>>,
    request_fn: Mutex<RequestFn>,
    navigation_policy: Mutex<Option<BlockList>>,
    current_url: Mutex<Option<String>>,
}

impl EmbeddedSurface {
    pub fn new() -> Self {
        Self::with_document(Arc::new(Mutex::new(Document::new())))
    }

    /// Build a surface over a prepared document.
    pub fn with_document(document: Arc<Mutex<Document>>) -> Self {
        Self {
            document,
            request_fn: Mutex::new(passthrough_request_fn()),
            navigation_policy: Mutex::new(None),
            current_url: Mutex::new(None),
        }
    }

    pub fn document(&self) -> Arc<Mutex<Document>> {
        Arc::clone(&self.document)
    }

    /// Install the page's own request function (what a real page would use
    /// to issue fetches).
    pub fn set_request_fn(&self, f: RequestFn) {
        *relock(&self.request_fn) = f;
    }

    /// Wrap the current request function, receiving the previous one so the
    /// wrapper can delegate.
    pub fn wrap_request_fn(&self, wrap: impl FnOnce(RequestFn) -> RequestFn) {
        let mut slot = relock(&self.request_fn);
        let inner = slot.clone();
        *slot = wrap(inner);
    }

    /// Issue an in-page request through whatever function is installed.
    pub async fn fetch(&self, url: &str) -> Result<(), RequestError> {
        let f = relock(&self.request_fn).clone();
        f(url.to_string()).await
    }

    /// Install the pre-load navigation policy.
    pub fn install_navigation_policy(&self, blocklist: BlockList) {
        *relock(&self.navigation_policy) = Some(blocklist);
    }

    /// Gate and perform a top-level navigation. A blocked navigation changes
    /// nothing and is silent.
    pub fn navigate(&self, url: &str) -> NavigationDecision {
        if let Some(policy) = relock(&self.navigation_policy).as_ref() {
            if policy.gate_navigation(url) == NavigationDecision::Blocked {
                return NavigationDecision::Blocked;
            }
        }
        debug!(url, "surface navigating");
        *relock(&self.current_url) = Some(url.to_string());
        NavigationDecision::Allowed
    }

    pub fn current_url(&self) -> Option<String> {
        relock(&self.current_url).clone()
    }
}

impl Default for EmbeddedSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_navigation_policy_gates_top_level_loads() {
        let surface = EmbeddedSurface::new();
        surface.install_navigation_policy(BlockList::standard());

        assert_eq!(
            surface.navigate("https://doubleclick.net/ad"),
            NavigationDecision::Blocked
        );
        assert_eq!(surface.current_url(), None);

        assert_eq!(
            surface.navigate("https://example.com/video.mp4"),
            NavigationDecision::Allowed
        );
        assert_eq!(
            surface.current_url().as_deref(),
            Some("https://example.com/video.mp4")
        );
    }

    #[tokio::test]
    async fn test_wrapped_request_fn_delegates() {
        let surface = EmbeddedSurface::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let inner_hits = Arc::clone(&hits);
        surface.set_request_fn(Arc::new(move |_url| {
            let inner_hits = Arc::clone(&inner_hits);
            Box::pin(async move {
                inner_hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        }));

        surface.wrap_request_fn(|inner| {
            Arc::new(move |url: String| {
                if url.contains("blocked.example") {
                    Box::pin(async move { Err(RequestError::Blocked(url)) })
                } else {
                    inner(url)
                }
            })
        });

        assert!(surface.fetch("https://ok.example/x").await.is_ok());
        assert!(matches!(
            surface.fetch("https://blocked.example/y").await,
            Err(RequestError::Blocked(_))
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
