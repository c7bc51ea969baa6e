#![warn(clippy::use_self)]

mod build;
mod error;

pub use build::{element, text, ElementBuilder};
pub use error::MountError;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeType {
    Element,
    Text,
    Fragment,
}

pub trait Node: Clone + Eq + Sized + 'static {
    fn element(namespace: Option<&str>, name: &str) -> Self;

    fn text() -> Self;

    fn fragment() -> Self;

    fn ty(&self) -> NodeType;

    fn parent(&self) -> Option<Self>;

    fn children(&self) -> Vec<Self>;

    fn next_sibling(&self) -> Option<Self>;

    fn insert(&self, child: &Self, before: Option<&Self>);

    fn remove(&self, child: &Self);

    /// Detaches every child, including content the node held before it was wrapped.
    fn clear(&self);

    fn set_text(&self, content: &str);

    fn attr(&self, name: &str) -> Option<String>;

    fn set_attr(&self, name: &str, value: &str);

    fn remove_attr(&self, name: &str);
}

/// A document that can be mounted into.
///
/// The bootstrap only ever talks to its host through this trait, so the same startup logic runs
/// against the browser and against an in-memory document.
pub trait Host: Clone + 'static {
    type Node: Node;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Runs `f` once the document's markup has been parsed.
    ///
    /// If the document is already past that point `f` runs immediately and its result is
    /// returned. Otherwise `f` is queued and `Ok(())` means it was registered.
    fn on_ready<F>(&self, f: F) -> Result<(), MountError>
    where
        F: FnOnce() -> Result<(), MountError> + 'static;
}
