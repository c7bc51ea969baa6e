#![warn(clippy::use_self)]

mod document;

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    thread_local,
};

use mountpoint_nodes::{Node, NodeType};
use wasm_bindgen::{intern, JsCast};

pub use document::WebDocument;

thread_local! {
    static DOCUMENT: Option<web_sys::Document> = if cfg!(target_family = "wasm") {
        web_sys::window().and_then(|window| window.document())
    } else {
        None
    };
}

pub fn document() -> Option<web_sys::Document> {
    DOCUMENT.with(Clone::clone)
}

fn expect_document() -> web_sys::Document {
    document().expect("JavaScript window.document undefined")
}

#[derive(Clone, Debug)]
pub struct DomNode(Rc<Inner>);

type WeakNode = Weak<Inner>;

#[derive(Debug)]
struct Inner {
    native: web_sys::Node,
    ty: NodeType,

    parent: RefCell<Option<WeakNode>>,
    children: RefCell<Vec<DomNode>>,
}

impl DomNode {
    fn new(native: web_sys::Node, ty: NodeType) -> Self {
        Self(Rc::new(Inner {
            native,
            ty,
            parent: RefCell::default(),
            children: RefCell::default(),
        }))
    }

    /// Wraps an element that already lives in the document.
    ///
    /// Its existing native children are not tracked, see [`Node::clear`] for removing them.
    pub fn from_element(element: web_sys::Element) -> Self {
        Self::new(element.unchecked_into(), NodeType::Element)
    }

    pub fn native(&self) -> &web_sys::Node {
        &self.0.native
    }

    fn is_virtual(&self) -> bool {
        self.0.ty == NodeType::Fragment
    }

    /// The native node children are attached to.
    ///
    /// Fragments are represented by a trailing comment marker, so their children live in the
    /// marker's parent.
    fn native_target(&self) -> Option<web_sys::Node> {
        if self.is_virtual() {
            self.0.native.parent_node()
        } else {
            Some(self.0.native.clone())
        }
    }

    /// The first native node that belongs to `self`, used as an insertion point.
    fn first_node(&self) -> web_sys::Node {
        if self.is_virtual() {
            if let Some(first) = self.0.children.borrow().first() {
                return first.first_node();
            }
        }

        self.0.native.clone()
    }

    fn mount_to_native(&self, target: &web_sys::Node, before: Option<&web_sys::Node>) {
        if self.is_virtual() {
            for child in &*self.0.children.borrow() {
                child.mount_to_native(target, before);
            }
        }

        target.insert_before(&self.0.native, before).unwrap();
    }

    fn remove_from_native(&self, target: &web_sys::Node) {
        if self.is_virtual() {
            for child in &*self.0.children.borrow() {
                child.remove_from_native(target);
            }
        }

        target.remove_child(&self.0.native).unwrap();
    }

    fn element_ref(&self) -> &web_sys::Element {
        if self.0.ty == NodeType::Element {
            self.0.native.unchecked_ref()
        } else {
            panic!("attributes only exist on element nodes");
        }
    }
}

impl Node for DomNode {
    fn element(namespace: Option<&str>, name: &str) -> Self {
        let document = expect_document();
        let native = if namespace.is_some() {
            document.create_element_ns(namespace, intern(name))
        } else {
            document.create_element(intern(name))
        }
        .unwrap();

        Self::new(native.unchecked_into(), NodeType::Element)
    }

    fn text() -> Self {
        let native = web_sys::Text::new().unwrap();
        Self::new(native.unchecked_into(), NodeType::Text)
    }

    fn fragment() -> Self {
        let native = web_sys::Comment::new().unwrap();
        Self::new(native.unchecked_into(), NodeType::Fragment)
    }

    fn ty(&self) -> NodeType {
        self.0.ty
    }

    fn parent(&self) -> Option<Self> {
        self.0
            .parent
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(DomNode)
    }

    fn children(&self) -> Vec<Self> {
        self.0.children.borrow().clone()
    }

    fn next_sibling(&self) -> Option<Self> {
        let parent = self.parent()?;
        let children = parent.0.children.borrow();
        children
            .iter()
            .position(|node| node == self)
            .and_then(|idx| children.get(idx + 1).cloned())
    }

    fn insert(&self, child: &Self, before: Option<&Self>) {
        if self.0.ty == NodeType::Text {
            panic!("text nodes cannot have children");
        }

        // inserting a child before itself leaves it in place
        if before == Some(child) && child.parent().as_ref() == Some(self) {
            return;
        }

        if let Some(parent) = child.parent() {
            parent.remove(child);
        }

        {
            let mut children = self.0.children.borrow_mut();
            let idx = if let Some(before) = before {
                children
                    .iter()
                    .position(|node| node == before)
                    .expect("not a parent of insertion point node")
            } else {
                children.len()
            };
            children.insert(idx, child.clone());
        }

        child.0.parent.borrow_mut().replace(Rc::downgrade(&self.0));

        if let Some(target) = self.native_target() {
            let before = match before {
                Some(node) => Some(node.first_node()),
                None if self.is_virtual() => Some(self.0.native.clone()),
                None => None,
            };

            child.mount_to_native(&target, before.as_ref());
        }
    }

    fn remove(&self, child: &Self) {
        {
            let mut children = self.0.children.borrow_mut();
            let idx = children
                .iter()
                .position(|node| node == child)
                .expect("not a parent of child node");
            children.remove(idx);
        }

        child.0.parent.borrow_mut().take();

        if let Some(target) = self.native_target() {
            child.remove_from_native(&target);
        }
    }

    fn clear(&self) {
        for child in self.children() {
            self.remove(&child);
        }

        if self.0.ty == NodeType::Element {
            self.0.native.set_text_content(None);
        }
    }

    fn set_text(&self, content: &str) {
        if self.0.ty == NodeType::Text {
            self.0.native.set_text_content(Some(content));
        } else {
            panic!("can only set text content of text nodes");
        }
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.element_ref().get_attribute(name)
    }

    fn set_attr(&self, name: &str, value: &str) {
        self.element_ref()
            .set_attribute(intern(name), value)
            .unwrap();
    }

    fn remove_attr(&self, name: &str) {
        self.element_ref().remove_attribute(intern(name)).unwrap();
    }
}

impl PartialEq for DomNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for DomNode {}
