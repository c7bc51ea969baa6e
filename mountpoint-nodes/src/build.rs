use crate::Node;

pub fn text<N: Node>(content: &str) -> N {
    let node = N::text();
    node.set_text(content);
    node
}

pub fn element<N: Node>(name: &str) -> ElementBuilder<N> {
    ElementBuilder {
        node: N::element(None, name),
    }
}

#[must_use]
pub struct ElementBuilder<N> {
    node: N,
}

impl<N: Node> ElementBuilder<N> {
    pub fn attr(self, name: &str, value: &str) -> Self {
        self.node.set_attr(name, value);
        self
    }

    pub fn child(self, child: N) -> Self {
        self.node.insert(&child, None);
        self
    }

    pub fn text(self, content: &str) -> Self {
        self.child(text(content))
    }

    pub fn build(self) -> N {
        self.node
    }
}
