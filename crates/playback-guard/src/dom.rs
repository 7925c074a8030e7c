//! Synthetic document model for the embedded playback surface.
//!
//! The filter engine never sees real page markup; it drives this arena of
//! elements, which supports the operations the defenses need: subtree
//! insertion with mutation notification, idempotent removal, a document-level
//! style rule, and cancellable events for fullscreen transitions.

use std::collections::HashMap;
use tokio::sync::mpsc;

pub type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FullscreenBegin,
    FullscreenEnd,
}

/// Change notification delivered to mutation observers.
#[derive(Debug, Clone, Copy)]
pub enum Mutation {
    NodeAdded(NodeId),
}

/// Per-dispatch handler state; `prevent_default` cancels the transition the
/// event announces.
pub struct EventState {
    cancelled: bool,
}

impl EventState {
    pub fn prevent_default(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

type Handler = Box<dyn Fn(&mut EventState) + Send>;

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id_attr: Option<String>,
    pub classes: Vec<String>,
    attrs: HashMap<String, String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id_attr = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

struct Node {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
    handlers: HashMap<EventKind, Vec<Handler>>,
}

pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    base_style: Option<String>,
    observers: Vec<mpsc::UnboundedSender<Mutation>>,
}

impl Document {
    pub fn new() -> Self {
        let root = Node {
            element: Element::new("body"),
            parent: None,
            children: Vec::new(),
            attached: true,
            handlers: HashMap::new(),
        };
        Self {
            nodes: vec![root],
            root: 0,
            base_style: None,
            observers: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Insert an element under `parent` and notify observers.
    pub fn append_child(&mut self, parent: NodeId, element: Element) -> NodeId {
        let attached = self.is_attached(parent);
        let id = self.nodes.len();
        self.nodes.push(Node {
            element,
            parent: Some(parent),
            children: Vec::new(),
            attached,
            handlers: HashMap::new(),
        });
        self.nodes[parent].children.push(id);
        if attached {
            self.notify(Mutation::NodeAdded(id));
        }
        id
    }

    fn notify(&mut self, mutation: Mutation) {
        self.observers.retain(|tx| tx.send(mutation).is_ok());
    }

    /// Detach a subtree. Removing an already-removed node is a no-op; returns
    /// whether anything changed.
    pub fn remove(&mut self, node: NodeId) -> bool {
        if node >= self.nodes.len() || !self.nodes[node].attached || node == self.root {
            return false;
        }
        if let Some(parent) = self.nodes[node].parent {
            self.nodes[parent].children.retain(|&c| c != node);
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            self.nodes[current].attached = false;
            stack.extend(self.nodes[current].children.iter().copied());
        }
        true
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.nodes.get(node).map(|n| n.attached).unwrap_or(false)
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node).map(|n| &n.element)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.element.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.attr(name))
    }

    /// All attached nodes, root included, in insertion order.
    pub fn attached_nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len()).filter(|&n| self.nodes[n].attached).collect()
    }

    /// Attached elements with the given tag.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.attached_nodes()
            .into_iter()
            .filter(|&n| self.nodes[n].element.tag == tag)
            .collect()
    }

    /// The node plus its attached descendants.
    pub fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_attached(node) {
            return out;
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if self.nodes[current].attached {
                out.push(current);
                stack.extend(self.nodes[current].children.iter().copied());
            }
        }
        out
    }

    /// Standing document-level style rule; covers content not yet rendered.
    pub fn set_base_style(&mut self, css: &str) {
        self.base_style = Some(css.to_string());
    }

    pub fn base_style(&self) -> Option<&str> {
        self.base_style.as_deref()
    }

    /// Continuous mutation observation; the receiver sees every node inserted
    /// after this call.
    pub fn observe_mutations(&mut self) -> mpsc::UnboundedReceiver<Mutation> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    pub fn on_event(&mut self, node: NodeId, kind: EventKind, handler: Handler) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.handlers.entry(kind).or_default().push(handler);
        }
    }

    /// Dispatch an event to the node's handlers; returns true when a handler
    /// cancelled the default action.
    pub fn dispatch(&self, node: NodeId, kind: EventKind) -> bool {
        let mut state = EventState { cancelled: false };
        if let Some(handlers) = self.nodes.get(node).and_then(|n| n.handlers.get(&kind)) {
            for handler in handlers {
                handler(&mut state);
            }
        }
        state.is_cancelled()
    }

    /// Ask for a native fullscreen transition on the node. Returns whether
    /// the transition proceeds.
    pub fn request_fullscreen(&self, node: NodeId) -> bool {
        !self.dispatch(node, EventKind::FullscreenBegin)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_remove() {
        let mut doc = Document::new();
        let container = doc.append_child(doc.root(), Element::new("div"));
        let video = doc.append_child(container, Element::new("video"));

        assert_eq!(doc.elements_by_tag("video"), vec![video]);

        assert!(doc.remove(container));
        assert!(!doc.is_attached(container));
        assert!(!doc.is_attached(video));
        assert!(doc.elements_by_tag("video").is_empty());

        // Idempotent removal.
        assert!(!doc.remove(container));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut doc = Document::new();
        assert!(!doc.remove(doc.root()));
    }

    #[tokio::test]
    async fn test_mutation_observation() {
        let mut doc = Document::new();
        let mut rx = doc.observe_mutations();

        let node = doc.append_child(doc.root(), Element::new("video"));
        match rx.recv().await.unwrap() {
            Mutation::NodeAdded(added) => assert_eq!(added, node),
        }
    }

    #[test]
    fn test_detached_insert_does_not_notify() {
        let mut doc = Document::new();
        let limb = doc.append_child(doc.root(), Element::new("div"));
        doc.remove(limb);

        let mut rx = doc.observe_mutations();
        doc.append_child(limb, Element::new("video"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_event_cancellation() {
        let mut doc = Document::new();
        let video = doc.append_child(doc.root(), Element::new("video"));

        assert!(doc.request_fullscreen(video));

        doc.on_event(
            video,
            EventKind::FullscreenBegin,
            Box::new(|e| e.prevent_default()),
        );
        assert!(!doc.request_fullscreen(video));
    }
}
