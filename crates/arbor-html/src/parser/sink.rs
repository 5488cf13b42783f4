use core::fmt::Debug;

use arbor_dom::{
    AttributesMap, DocumentTypeData, DomTree, ElementData, Namespace, NodeId, NodeType,
    QuirksMode,
};

use crate::tokenizer::Attribute;

/// The document the tree builder writes into.
///
/// The builder never owns nodes: it only holds the handles a sink gives back.
/// Handles are compared by identity, so a clone made during adoption is a new
/// handle even though it carries the same name and attributes.
pub trait TreeSink {
    /// Opaque, copyable reference to a node owned by the sink.
    type Handle: Copy + Eq + Debug;

    /// The Document node.
    fn document(&self) -> Self::Handle;

    /// [§ 13.2.6.1 Create an element for the token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    fn create_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: &[Attribute],
    ) -> Self::Handle;

    /// A detached text node.
    fn create_text_node(&mut self, text: &str) -> Self::Handle;

    /// A detached comment node.
    fn create_comment(&mut self, text: &str) -> Self::Handle;

    /// A detached doctype node. Missing identifiers are passed as empty strings.
    fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> Self::Handle;

    /// Append `child` as the last child of `parent`, removing it from its
    /// current parent first.
    fn append_child(&mut self, parent: Self::Handle, child: Self::Handle);

    /// Insert `child` into `parent` directly before `reference`.
    fn insert_before(&mut self, parent: Self::Handle, child: Self::Handle, reference: Self::Handle);

    /// Detach `child` from its parent, if any.
    fn remove_from_parent(&mut self, child: Self::Handle);

    /// Move all children of `from` to the end of `to`.
    fn reparent_children(&mut self, from: Self::Handle, to: Self::Handle);

    /// Parent of `node`, if attached.
    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Add an attribute to `element` unless it already has one by that name.
    fn set_attribute_if_absent(&mut self, element: Self::Handle, name: &str, value: &str);

    /// Local name of `element`.
    fn tag_name(&self, element: Self::Handle) -> &str;

    /// Namespace of `element`.
    fn namespace(&self, element: Self::Handle) -> Namespace;

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data." The default
    /// always creates a new node; sinks that can merge should override it.
    fn append_text(&mut self, parent: Self::Handle, text: &str) {
        let node = self.create_text_node(text);
        self.append_child(parent, node);
    }

    /// Like [`Self::append_text`] for an insertion point before `reference`.
    fn insert_text_before(&mut self, parent: Self::Handle, text: &str, reference: Self::Handle) {
        let node = self.create_text_node(text);
        self.insert_before(parent, node, reference);
    }

    /// Record the document's quirks mode.
    fn set_quirks_mode(&mut self, _mode: QuirksMode) {}
}

impl TreeSink for DomTree {
    type Handle = NodeId;

    fn document(&self) -> NodeId {
        self.root()
    }

    fn create_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: &[Attribute],
    ) -> NodeId {
        let attrs: AttributesMap = attributes
            .iter()
            .map(|a| (a.name.as_str(), a.value.as_str()))
            .collect();
        self.alloc(NodeType::Element(ElementData {
            tag_name: name.to_string(),
            namespace,
            attrs,
        }))
    }

    fn create_text_node(&mut self, text: &str) -> NodeId {
        self.alloc(NodeType::Text(text.to_string()))
    }

    fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(NodeType::Comment(text.to_string()))
    }

    fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.alloc(NodeType::DocumentType(DocumentTypeData {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        DomTree::append_child(self, parent, child);
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        DomTree::insert_before(self, parent, child, reference);
    }

    fn remove_from_parent(&mut self, child: NodeId) {
        self.detach(child);
    }

    fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        self.move_children(from, to);
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        DomTree::parent(self, node)
    }

    fn set_attribute_if_absent(&mut self, element: NodeId, name: &str, value: &str) {
        if let Some(data) = self.as_element_mut(element) {
            let _ = data.attrs.insert_if_absent(name, value);
        }
    }

    fn tag_name(&self, element: NodeId) -> &str {
        self.as_element(element).map_or("", |e| e.tag_name.as_str())
    }

    fn namespace(&self, element: NodeId) -> Namespace {
        self.as_element(element).map_or(Namespace::Html, |e| e.namespace)
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(last) = self.last_child(parent)
            && let Some(NodeType::Text(existing)) = self.get_mut(last).map(|n| &mut n.node_type)
        {
            existing.push_str(text);
            return;
        }
        let node = self.create_text_node(text);
        DomTree::append_child(self, parent, node);
    }

    fn insert_text_before(&mut self, parent: NodeId, text: &str, reference: NodeId) {
        let previous = self
            .prev_sibling(reference)
            .filter(|_| DomTree::parent(self, reference) == Some(parent));
        if let Some(previous) = previous
            && let Some(NodeType::Text(existing)) =
                self.get_mut(previous).map(|n| &mut n.node_type)
        {
            existing.push_str(text);
            return;
        }
        let node = self.create_text_node(text);
        DomTree::insert_before(self, parent, node, reference);
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        DomTree::set_quirks_mode(self, mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_report_name_and_namespace() {
        let mut tree = DomTree::new();
        let circle = tree.create_element("circle", Namespace::Svg, &[Attribute::new("r", "1")]);
        assert_eq!(TreeSink::tag_name(&tree, circle), "circle");
        assert_eq!(TreeSink::namespace(&tree, circle), Namespace::Svg);

        tree.set_attribute_if_absent(circle, "r", "2");
        tree.set_attribute_if_absent(circle, "cx", "3");
        let attrs = &tree.as_element(circle).expect("element").attrs;
        assert_eq!(attrs.get("r"), Some("1"));
        assert_eq!(attrs.get("cx"), Some("3"));
    }

    #[test]
    fn adjacent_text_is_merged() {
        let mut tree = DomTree::new();
        let document = TreeSink::document(&tree);
        let p = tree.create_element("p", Namespace::Html, &[]);
        TreeSink::append_child(&mut tree, document, p);

        tree.append_text(p, "a");
        tree.append_text(p, "b");
        assert_eq!(tree.children(p).len(), 1);

        let b = tree.create_element("b", Namespace::Html, &[]);
        TreeSink::append_child(&mut tree, p, b);
        tree.insert_text_before(p, "c", b);
        assert_eq!(tree.children(p).len(), 2);
        assert_eq!(tree.as_text(tree.children(p)[0]), Some("abc"));
    }

    #[test]
    fn removed_nodes_lose_their_parent() {
        let mut tree = DomTree::new();
        let document = TreeSink::document(&tree);
        let comment = tree.create_comment("x");
        TreeSink::append_child(&mut tree, document, comment);
        assert_eq!(TreeSink::parent(&tree, comment), Some(document));

        tree.remove_from_parent(comment);
        assert_eq!(TreeSink::parent(&tree, comment), None);
        assert!(tree.children(document).is_empty());
    }
}
