use std::{
    cell::{Cell, RefCell},
    mem,
    rc::Rc,
};

use mountpoint_nodes::{element, Host, MountError};

use crate::{Mode, NodeRef};

type ReadyCallback = Box<dyn FnOnce() -> Result<(), MountError>>;

/// An in-memory document whose ready signal is fired by hand.
#[derive(Clone)]
pub struct RenderDocument(Rc<Inner>);

struct Inner {
    root: NodeRef,
    body: NodeRef,
    ready: Cell<bool>,
    listeners: RefCell<Vec<ReadyCallback>>,
}

impl RenderDocument {
    pub fn new() -> Self {
        let body: NodeRef = element("body").build();
        let root = element("html")
            .child(element("head").build())
            .child(body.clone())
            .build();

        Self(Rc::new(Inner {
            root,
            body,
            ready: Cell::new(false),
            listeners: RefCell::default(),
        }))
    }

    pub fn root(&self) -> &NodeRef {
        &self.0.root
    }

    pub fn body(&self) -> &NodeRef {
        &self.0.body
    }

    pub fn is_ready(&self) -> bool {
        self.0.ready.get()
    }

    pub fn pending_listeners(&self) -> usize {
        self.0.listeners.borrow().len()
    }

    /// Marks the markup as parsed and runs every queued callback once.
    ///
    /// Returns the first error a callback produced. Later calls find the queue drained and run
    /// nothing.
    pub fn fire_ready(&self) -> Result<(), MountError> {
        self.0.ready.set(true);

        let listeners = mem::take(&mut *self.0.listeners.borrow_mut());
        let mut result = Ok(());
        for listener in listeners {
            let res = listener();
            if result.is_ok() {
                result = res;
            }
        }
        result
    }

    pub fn to_html(&self, mode: Mode) -> String {
        self.0.root.to_html(mode)
    }
}

impl Default for RenderDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for RenderDocument {
    type Node = NodeRef;

    fn element_by_id(&self, id: &str) -> Option<NodeRef> {
        self.0.root.find_by_id(id)
    }

    fn on_ready<F>(&self, f: F) -> Result<(), MountError>
    where
        F: FnOnce() -> Result<(), MountError> + 'static,
    {
        if self.is_ready() {
            tracing::trace!("document already parsed, running ready callback now");
            f()
        } else {
            self.0.listeners.borrow_mut().push(Box::new(f));
            Ok(())
        }
    }
}
