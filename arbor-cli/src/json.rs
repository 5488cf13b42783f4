//! JSON view of a parsed document.

use arbor_dom::{DomTree, NodeId, NodeType};
use arbor_html::ParseIssue;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Convert the subtree at `id` into nested JSON objects.
pub fn tree_to_json(tree: &DomTree, id: NodeId) -> Value {
    let Some(node) = tree.get(id) else {
        return Value::Null;
    };
    let mut obj = Map::new();

    match &node.node_type {
        NodeType::Document => {
            let _ = obj.insert("type".to_string(), json!("document"));
        }
        NodeType::DocumentType(doctype) => {
            let _ = obj.insert("type".to_string(), json!("doctype"));
            let _ = obj.insert("name".to_string(), json!(doctype.name));
            let _ = obj.insert("publicId".to_string(), json!(doctype.public_id));
            let _ = obj.insert("systemId".to_string(), json!(doctype.system_id));
        }
        NodeType::Element(data) => {
            let _ = obj.insert("type".to_string(), json!("element"));
            let _ = obj.insert("tagName".to_string(), json!(data.tag_name));
            let _ = obj.insert("namespace".to_string(), json!(data.namespace.url()));

            let attrs: Map<String, Value> = data
                .attrs
                .iter()
                .map(|(k, v)| (k.to_string(), json!(v)))
                .collect();
            let _ = obj.insert("attributes".to_string(), Value::Object(attrs));
        }
        NodeType::Text(text) => {
            let _ = obj.insert("type".to_string(), json!("text"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
        NodeType::Comment(text) => {
            let _ = obj.insert("type".to_string(), json!("comment"));
            let _ = obj.insert("content".to_string(), json!(text));
        }
    }

    let children = tree.children(id);
    if !children.is_empty() {
        let children: Vec<Value> = children
            .iter()
            .map(|&child| tree_to_json(tree, child))
            .collect();
        let _ = obj.insert("children".to_string(), Value::Array(children));
    }

    Value::Object(obj)
}

/// One parse error as it appears in `--json --issues` output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueReport<'a> {
    line: usize,
    mode: String,
    token_kind: &'a str,
    message: &'a str,
}

impl<'a> From<&'a ParseIssue> for IssueReport<'a> {
    fn from(issue: &'a ParseIssue) -> Self {
        Self {
            line: issue.line,
            mode: issue.mode.to_string(),
            token_kind: issue.token_kind,
            message: &issue.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use arbor_html::parse_document_with_issues;

    use super::*;

    #[test]
    fn elements_carry_name_namespace_and_attributes() {
        let (tree, _) = parse_document_with_issues("<!DOCTYPE html><p id=a>x");
        let value = tree_to_json(&tree, tree.root());

        assert_eq!(value["type"], "document");
        assert_eq!(value["children"][0]["type"], "doctype");
        assert_eq!(value["children"][0]["name"], "html");

        let html = &value["children"][1];
        assert_eq!(html["tagName"], "html");
        assert_eq!(html["namespace"], "http://www.w3.org/1999/xhtml");

        let p = &html["children"][1]["children"][0];
        assert_eq!(p["tagName"], "p");
        assert_eq!(p["attributes"]["id"], "a");
        assert_eq!(p["children"][0]["content"], "x");
    }

    #[test]
    fn issues_serialize_in_camel_case() {
        let (_, issues) = parse_document_with_issues("<!DOCTYPE html></div>");
        let reports: Vec<IssueReport<'_>> = issues.iter().map(IssueReport::from).collect();
        let value = serde_json::to_value(&reports).expect("serializable");
        assert_eq!(value[0]["tokenKind"], "EndTag");
        assert_eq!(value[0]["line"], 1);
    }
}
