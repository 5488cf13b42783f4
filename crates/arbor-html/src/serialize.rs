//! Turning a [`DomTree`] back into text: HTML serialization and a debug dump.

use core::fmt::Write as _;

use arbor_dom::{DomTree, Namespace, NodeId, NodeType};

use crate::parser::tags::is_void_element;

/// Elements whose text children are written without escaping.
const RAW_TEXT_PARENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
///
/// Serialize the whole document, doctype included.
#[must_use]
pub fn serialize(tree: &DomTree) -> String {
    serialize_children(tree, tree.root())
}

/// Serialize the children of `node` (its "inner HTML").
#[must_use]
pub fn serialize_children(tree: &DomTree, node: NodeId) -> String {
    let mut writer = DocumentWriter {
        tree,
        buffer: String::new(),
    };
    writer.visit_children(node);
    writer.buffer
}

struct DocumentWriter<'a> {
    tree: &'a DomTree,
    buffer: String,
}

impl DocumentWriter<'_> {
    fn visit_children(&mut self, id: NodeId) {
        for &child in self.tree.children(id) {
            self.visit_node(child);
        }
    }

    fn visit_node(&mut self, id: NodeId) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        match &node.node_type {
            NodeType::Document => self.visit_children(id),
            NodeType::DocumentType(doctype) => {
                self.buffer.push_str("<!DOCTYPE ");
                self.buffer.push_str(&doctype.name);
                self.buffer.push('>');
            }
            NodeType::Comment(data) => {
                self.buffer.push_str("<!--");
                self.buffer.push_str(data);
                self.buffer.push_str("-->");
            }
            NodeType::Text(data) => {
                let raw = node
                    .parent
                    .and_then(|parent| self.tree.as_element(parent))
                    .is_some_and(|parent| {
                        parent.namespace == Namespace::Html
                            && RAW_TEXT_PARENTS.contains(&parent.tag_name.as_str())
                    });
                if raw {
                    self.buffer.push_str(data);
                } else {
                    escape_into(&mut self.buffer, data, false);
                }
            }
            NodeType::Element(element) => {
                self.buffer.push('<');
                self.buffer.push_str(&element.tag_name);
                for (name, value) in element.attrs.iter() {
                    let _ = write!(self.buffer, " {name}=\"");
                    escape_into(&mut self.buffer, value, true);
                    self.buffer.push('"');
                }
                self.buffer.push('>');

                let html = element.namespace == Namespace::Html;
                if html && is_void_element(&element.tag_name) {
                    return;
                }
                // The parser drops one newline right after these start tags.
                if html
                    && matches!(element.tag_name.as_str(), "pre" | "textarea" | "listing")
                    && self
                        .tree
                        .first_child(id)
                        .and_then(|child| self.tree.as_text(child))
                        .is_some_and(|text| text.starts_with('\n'))
                {
                    self.buffer.push('\n');
                }

                self.visit_children(id);
                let _ = write!(self.buffer, "</{}>", element.tag_name);
            }
        }
    }
}

/// [§ 13.3](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Escaping a string": `&`, U+00A0 and either `"` (attribute mode) or `<` and
/// `>` (text mode).
fn escape_into(buffer: &mut String, text: &str, attribute_mode: bool) {
    for c in text.chars() {
        match c {
            '&' => buffer.push_str("&amp;"),
            '\u{00A0}' => buffer.push_str("&nbsp;"),
            '"' if attribute_mode => buffer.push_str("&quot;"),
            '<' if !attribute_mode => buffer.push_str("&lt;"),
            '>' if !attribute_mode => buffer.push_str("&gt;"),
            _ => buffer.push(c),
        }
    }
}

/// Indented outline of the subtree at `id`, one node per line.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId, indent: usize) -> String {
    let mut out = String::new();
    format_node(tree, id, indent, &mut out);
    out
}

fn format_node(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let prefix = "  ".repeat(indent);
    let _ = match &node.node_type {
        NodeType::Document => writeln!(out, "{prefix}#document"),
        NodeType::DocumentType(doctype) => writeln!(out, "{prefix}<!DOCTYPE {}>", doctype.name),
        NodeType::Element(data) => {
            let name = match data.namespace.prefix() {
                Some(ns) => format!("{ns} {}", data.tag_name),
                None => data.tag_name.clone(),
            };
            if data.attrs.is_empty() {
                writeln!(out, "{prefix}<{name}>")
            } else {
                let attrs: Vec<String> = data
                    .attrs
                    .iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.to_string()
                        } else {
                            format!("{k}=\"{v}\"")
                        }
                    })
                    .collect();
                writeln!(out, "{prefix}<{name} {}>", attrs.join(" "))
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            writeln!(out, "{prefix}\"{display}\"")
        }
        NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
    };
    for &child in tree.children(id) {
        format_node(tree, child, indent + 1, out);
    }
}

/// Print a DOM tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    print!("{}", format_tree(tree, id, indent));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_document;

    #[test]
    fn void_elements_have_no_end_tag() {
        let tree = parse_document("<p>a<br>b<img src=x></p>");
        let body = tree.body().expect("body");
        assert_eq!(
            serialize_children(&tree, body),
            "<p>a<br>b<img src=\"x\"></p>"
        );
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let tree = parse_document("<div title='a\"b&amp'>1 &lt; 2</div>");
        let body = tree.body().expect("body");
        // Character references are not decoded, so the ampersands escape again.
        assert_eq!(
            serialize_children(&tree, body),
            "<div title=\"a&quot;b&amp;amp\">1 &amp;lt; 2</div>"
        );
    }

    #[test]
    fn script_text_is_raw() {
        let tree = parse_document("<script>if (a < b) {}</script>");
        let out = serialize(&tree);
        assert!(out.contains("<script>if (a < b) {}</script>"), "{out}");
    }

    #[test]
    fn outline_marks_foreign_namespaces() {
        let tree = parse_document("<svg><circle/></svg>");
        let outline = format_tree(&tree, tree.root(), 0);
        assert!(outline.contains("<svg svg>"), "{outline}");
        assert!(outline.contains("<svg circle>"), "{outline}");
    }
}
