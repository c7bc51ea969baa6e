#![warn(clippy::use_self)]

mod document;

use std::{
    cell::{Ref, RefCell, RefMut},
    fmt::{self, Write},
    mem,
    rc::{Rc, Weak},
};

use bitflags::bitflags;
use indexmap::IndexMap;
use mountpoint_nodes::{Node, NodeType};

pub use document::RenderDocument;

// Reference: https://developer.mozilla.org/en-US/docs/Glossary/Void_element
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Debug)]
    pub struct Mode: u8 {
        const PRETTY = 0b01;
        const SELF_CLOSING = 0b10;
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::PRETTY
    }
}

#[derive(Clone)]
pub struct NodeRef(Rc<RefCell<Inner>>);

type WeakNode = Weak<RefCell<Inner>>;

struct Inner {
    parent: Option<WeakNode>,
    kind: NodeKind,
}

#[derive(Debug)]
enum NodeKind {
    Element {
        namespace: Option<String>,
        name: String,
        attrs: IndexMap<String, String>,
        children: Vec<NodeRef>,
    },
    Fragment(Vec<NodeRef>),
    Text(String),
}

impl NodeRef {
    fn new(kind: NodeKind) -> Self {
        let inner = Inner { parent: None, kind };
        Self(Rc::new(RefCell::new(inner)))
    }

    pub fn to_html(&self, mode: Mode) -> String {
        let mut out = String::new();
        render(&mut out, mode, self).expect("writing to a String never fails");
        out
    }

    /// Depth-first search for the first element whose `id` attribute is `id`, **including** `self`.
    pub fn find_by_id(&self, id: &str) -> Option<Self> {
        if self.attr_ref("id").is_some_and(|value| value == id) {
            return Some(self.clone());
        }

        let children = self.children_ref().map(|c| c.clone()).unwrap_or_default();
        children.iter().find_map(|child| child.find_by_id(id))
    }

    fn attr_ref(&self, name: &str) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element { attrs, .. } => attrs.get(name).cloned(),
            _ => None,
        }
    }

    fn children_ref(&self) -> Option<Ref<Vec<Self>>> {
        let inner = self.0.borrow();
        Ref::filter_map(inner, |inner| match &inner.kind {
            NodeKind::Element { children, .. } => Some(children),
            NodeKind::Fragment(children) => Some(children),
            NodeKind::Text(_) => None,
        })
        .ok()
    }

    fn children_mut(&self) -> Option<RefMut<Vec<Self>>> {
        let inner = self.0.borrow_mut();
        RefMut::filter_map(inner, |inner| match &mut inner.kind {
            NodeKind::Element { children, .. } => Some(children),
            NodeKind::Fragment(children) => Some(children),
            NodeKind::Text(_) => None,
        })
        .ok()
    }
}

impl Node for NodeRef {
    fn element(namespace: Option<&str>, name: &str) -> Self {
        let kind = NodeKind::Element {
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
            attrs: IndexMap::new(),
            children: vec![],
        };
        Self::new(kind)
    }

    fn text() -> Self {
        Self::new(NodeKind::Text(String::new()))
    }

    fn fragment() -> Self {
        Self::new(NodeKind::Fragment(vec![]))
    }

    fn ty(&self) -> NodeType {
        match self.0.borrow().kind {
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::Fragment(_) => NodeType::Fragment,
            NodeKind::Text(_) => NodeType::Text,
        }
    }

    fn parent(&self) -> Option<Self> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(NodeRef)
    }

    fn children(&self) -> Vec<Self> {
        self.children_ref()
            .expect("only element and fragment nodes can have children")
            .clone()
    }

    fn next_sibling(&self) -> Option<Self> {
        let parent = self.parent()?;
        let children = parent.children_ref()?;

        let idx = children.iter().position(|node| node == self)?;
        children.get(idx + 1).cloned()
    }

    fn insert(&self, child: &Self, before: Option<&Self>) {
        // inserting a child before itself leaves it in place
        if before == Some(child) && child.parent().as_ref() == Some(self) {
            return;
        }

        if let Some(parent) = child.parent() {
            parent.remove(child);
        }

        let mut children = self
            .children_mut()
            .expect("only element and fragment nodes can have children");
        let idx = if let Some(before) = before {
            children
                .iter()
                .position(|node| node == before)
                .expect("not a parent of insertion point node")
        } else {
            children.len()
        };
        children.insert(idx, child.clone());

        child.0.borrow_mut().parent.replace(Rc::downgrade(&self.0));
    }

    fn remove(&self, child: &Self) {
        let mut children = self
            .children_mut()
            .expect("only element and fragment nodes can have children");
        let idx = children
            .iter()
            .position(|node| node == child)
            .expect("not a parent of child node");
        children.remove(idx);

        child.0.borrow_mut().parent.take();
    }

    fn clear(&self) {
        let children = mem::take(
            &mut *self
                .children_mut()
                .expect("only element and fragment nodes can have children"),
        );
        for child in children {
            child.0.borrow_mut().parent.take();
        }
    }

    fn set_text(&self, content: &str) {
        match &mut self.0.borrow_mut().kind {
            NodeKind::Text(text) => {
                *text = content.to_string();
            }
            _ => panic!("can only set text content of text nodes"),
        }
    }

    fn attr(&self, name: &str) -> Option<String> {
        if self.ty() == NodeType::Element {
            self.attr_ref(name)
        } else {
            panic!("attributes only exist on element nodes");
        }
    }

    fn set_attr(&self, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.0.borrow_mut().kind {
            attrs.insert(name.to_string(), value.to_string());
        } else {
            panic!("attributes only exist on element nodes");
        }
    }

    fn remove_attr(&self, name: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.0.borrow_mut().kind {
            attrs.shift_remove(name);
        } else {
            panic!("attributes only exist on element nodes");
        }
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NodeRef {}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render(f, Mode::default(), self)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0.borrow().kind, f)
    }
}

pub fn render<W: Write>(w: &mut W, mode: Mode, node: &NodeRef) -> fmt::Result {
    let nl = |w: &mut W| {
        if mode.contains(Mode::PRETTY) {
            writeln!(w)
        } else {
            Ok(())
        }
    };

    let inner = node.0.borrow();
    match &inner.kind {
        NodeKind::Element {
            namespace,
            name,
            attrs,
            children,
        } => {
            let tag = namespace
                .as_ref()
                .map(|ns| format!("{ns}:{name}"))
                .unwrap_or(name.clone());

            let attrs = attrs
                .iter()
                .map(|(key, value)| format!(" {key}=\"{}\"", escape(value)))
                .collect::<Vec<_>>()
                .join("");

            if children.is_empty() && VOID_ELEMENTS.contains(&name.to_lowercase().as_str()) {
                if mode.contains(Mode::SELF_CLOSING) {
                    write!(w, "<{tag}{attrs} />")?;
                } else {
                    write!(w, "<{tag}{attrs}>")?;
                }
                nl(w)
            } else if children.is_empty() {
                write!(w, "<{tag}{attrs}></{tag}>")?;
                nl(w)
            } else {
                write!(w, "<{tag}{attrs}>")?;
                nl(w)?;
                render_children(w, mode, true, children)?;
                write!(w, "</{tag}>")?;
                nl(w)
            }
        }
        NodeKind::Fragment(children) => render_children(w, mode, false, children),
        NodeKind::Text(content) => {
            w.write_str(&escape(content))?;
            nl(w)
        }
    }
}

fn render_children<W: Write>(
    w: &mut W,
    mode: Mode,
    indent: bool,
    children: &[NodeRef],
) -> fmt::Result {
    if indent && mode.contains(Mode::PRETTY) {
        let mut buf = String::new();
        for child in children {
            render(&mut buf, mode, child)?;
        }

        for line in buf.lines() {
            writeln!(w, "  {line}")?;
        }
    } else {
        for child in children {
            render(w, mode, child)?;
        }
    }
    Ok(())
}

// Reference: https://cheatsheetseries.owasp.org/cheatsheets/Cross_Site_Scripting_Prevention_Cheat_Sheet.html#output-encoding-for-html-contexts
fn escape(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(c),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use mountpoint_nodes::{element, text, Node};

    use super::{Mode, NodeRef};

    #[test]
    fn node_behavior() {
        mountpoint_nodes::behavior_tests!(NodeRef);
    }

    #[test]
    fn compact_rendering() {
        let node: NodeRef = element("p")
            .attr("class", "greeting")
            .text("Hello, ")
            .child(element("em").text("world").build())
            .build();

        assert_eq!(
            node.to_html(Mode::empty()),
            r#"<p class="greeting">Hello, <em>world</em></p>"#
        );
    }

    #[test]
    fn pretty_rendering() {
        let node: NodeRef = element("div")
            .child(element("span").text("a").build())
            .build();

        assert_eq!(
            node.to_string(),
            "<div>\n  <span>\n    a\n  </span>\n</div>\n"
        );
    }

    #[test]
    fn pretty_empty_element() {
        let node: NodeRef = element("div")
            .child(element("span").attr("id", "react-node").build())
            .build();

        assert_eq!(
            node.to_string(),
            "<div>\n  <span id=\"react-node\"></span>\n</div>\n"
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let node: NodeRef = element("a")
            .attr("title", "\"quoted\" & 'single'")
            .text("<script>")
            .build();

        assert_eq!(
            node.to_html(Mode::empty()),
            "<a title=\"&quot;quoted&quot; &amp; &#x27;single&#x27;\">&lt;script&gt;</a>"
        );
    }

    #[test]
    fn void_elements() {
        let node: NodeRef = element("div").child(element("br").build()).build();

        assert_eq!(node.to_html(Mode::empty()), "<div><br></div>");
        assert_eq!(node.to_html(Mode::SELF_CLOSING), "<div><br /></div>");
    }

    #[test]
    fn fragments_are_transparent() {
        let frag = NodeRef::fragment();
        frag.insert(&text("a"), None);
        frag.insert(&text("b"), None);
        let node: NodeRef = element("p").child(frag).build();

        assert_eq!(node.to_html(Mode::empty()), "<p>ab</p>");
    }

    #[test]
    fn find_by_id_searches_depth_first() {
        let target: NodeRef = element("span").attr("id", "target").build();
        let root: NodeRef = element("div")
            .child(element("p").build())
            .child(element("section").child(target.clone()).build())
            .build();

        assert_eq!(root.find_by_id("target"), Some(target));
        assert_eq!(root.find_by_id("missing"), None);
    }

    #[test]
    fn reinserting_moves_the_node() {
        let child = NodeRef::text();
        let first: NodeRef = element("div").child(child.clone()).build();
        let second: NodeRef = element("div").build();

        second.insert(&child, None);

        assert!(first.children().is_empty());
        assert_eq!(child.parent(), Some(second));
    }
}
