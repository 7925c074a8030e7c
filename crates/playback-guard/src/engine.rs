//! Content-filter pipeline attached to a playback surface.
//!
//! Four independent defenses, each kept functioning even if another fails:
//! a standing style rule, continuous video conditioning, network suppression
//! (navigation gate + request interception), and a periodic DOM sweep. The
//! mutation observer and the sweep both feed the same idempotent cleanup, so
//! redundant invocation is safe.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::blocklist::BlockList;
use crate::dom::{Document, Element, EventKind, Mutation, NodeId};
use crate::relock;
use crate::surface::{EmbeddedSurface, RequestError};

/// Cadence of the safety-net sweep.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Standing style rule: no selection/callout affordances, full-bleed video
/// with native controls chrome hidden. Document-level so it also covers
/// content not yet rendered.
pub const SURFACE_STYLE: &str = "\
* { -webkit-touch-callout: none; -webkit-user-select: none; user-select: none; }\n\
body, html { margin: 0 !important; padding: 0 !important; overflow: hidden !important; background: #000 !important; }\n\
video { playsinline: true !important; width: 100% !important; height: 100% !important; object-fit: contain !important; }\n\
video::-webkit-media-controls { display: none !important; }\n\
iframe { border: none !important; width: 100% !important; height: 100% !important; }";

/// Marker attribute recording that a video element is already conditioned.
const CONDITIONED_MARKER: &str = "data-inline-lock";

const AD_CLASS_EXACT: [&str; 4] = ["ad", "ads", "advertisement", "adsbygoogle"];
const AD_CLASS_SUBSTRINGS: [&str; 2] = ["ad-", "ads-"];
const AD_ID_SUBSTRING: &str = "ad-";

/// Injected behavior attached to one surface for the surface's lifetime.
/// Watchers are owned exclusively by this instance and released exactly once.
pub struct ContentFilterEngine {
    document: Arc<Mutex<Document>>,
    mutation_task: Option<JoinHandle<()>>,
    sweep_task: Option<JoinHandle<()>>,
}

impl ContentFilterEngine {
    /// Attach all four defenses to the surface.
    pub fn attach(surface: &EmbeddedSurface, blocklist: BlockList) -> Self {
        let document = surface.document();

        {
            let mut doc = relock(&*document);
            doc.set_base_style(SURFACE_STYLE);
            condition_videos(&mut doc);
            scrub_document(&mut doc);
        }

        // Continuous observation: condition and scrub everything inserted
        // after attach.
        let mut mutations = relock(&*document).observe_mutations();
        let mutation_doc = Arc::clone(&document);
        let mutation_task = tokio::spawn(async move {
            while let Some(Mutation::NodeAdded(node)) = mutations.recv().await {
                let mut doc = relock(&*mutation_doc);
                for n in doc.subtree(node) {
                    if doc.element(n).map(|e| e.tag == "video").unwrap_or(false) {
                        condition_video(&mut doc, n);
                    }
                }
                for n in doc.subtree(node) {
                    if doc.element(n).map(is_ad_element).unwrap_or(false) {
                        doc.remove(n);
                    }
                }
            }
        });

        surface.install_navigation_policy(blocklist.clone());
        surface.wrap_request_fn(move |inner| {
            let blocklist = blocklist.clone();
            Arc::new(move |url: String| {
                if blocklist.is_blocked(&url) {
                    debug!(url, "suppressed in-page request");
                    Box::pin(async move { Err(RequestError::Blocked(url)) })
                } else {
                    inner(url)
                }
            })
        });

        // Safety net for insertions the observer missed and for elements that
        // only became ad-shaped after later attribute changes.
        let sweep_doc = Arc::clone(&document);
        let sweep_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut doc = relock(&*sweep_doc);
                let removed = scrub_document(&mut doc);
                condition_videos(&mut doc);
                if removed > 0 {
                    debug!(removed, "sweep removed ad elements");
                }
            }
        });

        debug!("content filter attached");
        Self {
            document,
            mutation_task: Some(mutation_task),
            sweep_task: Some(sweep_task),
        }
    }

    pub fn document(&self) -> Arc<Mutex<Document>> {
        Arc::clone(&self.document)
    }

    /// Cancel the sweep and disconnect the observer. Safe to call once; Drop
    /// covers the path where the host forgets.
    pub fn teardown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(task) = self.mutation_task.take() {
            task.abort();
        }
        if let Some(task) = self.sweep_task.take() {
            task.abort();
        }
        debug!("content filter detached");
    }
}

impl Drop for ContentFilterEngine {
    fn drop(&mut self) {
        if self.mutation_task.is_some() || self.sweep_task.is_some() {
            self.release();
        }
    }
}

/// Whether an element looks like advertising by class or id.
pub fn is_ad_element(element: &Element) -> bool {
    if element
        .classes
        .iter()
        .any(|c| AD_CLASS_EXACT.contains(&c.as_str()))
    {
        return true;
    }
    if element
        .classes
        .iter()
        .any(|c| AD_CLASS_SUBSTRINGS.iter().any(|s| c.contains(s)))
    {
        return true;
    }
    element
        .id_attr
        .as_deref()
        .map(|id| id.contains(AD_ID_SUBSTRING))
        .unwrap_or(false)
}

/// Remove every attached ad-shaped element. Idempotent; returns how many
/// subtrees were detached.
pub fn scrub_document(doc: &mut Document) -> usize {
    let targets: Vec<NodeId> = doc
        .attached_nodes()
        .into_iter()
        .filter(|&n| doc.element(n).map(is_ad_element).unwrap_or(false))
        .collect();
    targets.into_iter().filter(|&n| doc.remove(n)).count()
}

/// Force inline playback on a video element and cancel native fullscreen
/// transitions. Idempotent: already-conditioned elements are left alone so
/// handlers never stack.
pub fn condition_video(doc: &mut Document, node: NodeId) {
    if doc.attr(node, CONDITIONED_MARKER).is_some() {
        return;
    }
    doc.set_attr(node, "playsinline", "true");
    doc.set_attr(node, "webkit-playsinline", "true");
    doc.set_attr(node, "controls", "true");
    doc.on_event(
        node,
        EventKind::FullscreenBegin,
        Box::new(|e| e.prevent_default()),
    );
    doc.on_event(
        node,
        EventKind::FullscreenEnd,
        Box::new(|e| e.prevent_default()),
    );
    doc.set_attr(node, CONDITIONED_MARKER, "1");
}

fn condition_videos(doc: &mut Document) {
    for node in doc.elements_by_tag("video") {
        condition_video(doc, node);
    }
}
