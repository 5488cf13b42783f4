//! Integration tests for tree construction, checked through the serialized
//! tree and direct DOM queries.

use arbor_dom::{DomTree, Namespace, NodeId, NodeType, QuirksMode};
use arbor_html::{parse_document, parse_document_with_issues, serialize, serialize_children};
use test_case::test_case;

/// Helper to serialize the children of `<body>`.
fn body_html(html: &str) -> String {
    let tree = parse_document(html);
    let body = tree.body().expect("document has a body");
    serialize_children(&tree, body)
}

/// Helper to find the first element named `tag`, depth-first.
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if tree
        .as_element(from)
        .is_some_and(|data| data.tag_name == tag)
    {
        return Some(from);
    }
    tree.children(from)
        .iter()
        .find_map(|&child| find_element(tree, child, tag))
}

fn text_content(tree: &DomTree, id: NodeId) -> String {
    match tree.as_text(id) {
        Some(text) => text.to_string(),
        None => tree
            .children(id)
            .iter()
            .map(|&child| text_content(tree, child))
            .collect(),
    }
}

fn namespace_of(tree: &DomTree, id: NodeId) -> Namespace {
    tree.as_element(id).expect("element").namespace
}

#[test]
fn test_implicit_paragraph_closing() {
    assert_eq!(body_html("<p>A<p>B"), "<p>A</p><p>B</p>");
}

#[test]
fn test_misnested_formatting_is_repaired() {
    assert_eq!(
        body_html("<b>1<i>2</b>3</i>"),
        "<b>1<i>2</i></b><i>3</i>"
    );
}

#[test]
fn test_text_in_table_is_foster_parented() {
    let tree = parse_document("<table>A<td>B");
    let body = tree.body().expect("body");
    let children = tree.children(body);
    assert_eq!(children.len(), 2);
    assert_eq!(tree.as_text(children[0]), Some("A"));
    assert!(tree.as_element(children[1]).is_some_and(|e| e.is_html("table")));
    assert_eq!(
        serialize_children(&tree, children[1]),
        "<tbody><tr><td>B</td></tr></tbody>"
    );
}

#[test]
fn test_second_html_tag_merges_missing_attributes() {
    let tree = parse_document("<html lang=en><body><html lang=fr class=x>");
    let html = tree.document_element().expect("root");
    let attrs = &tree.as_element(html).expect("element").attrs;
    assert_eq!(attrs.get("lang"), Some("en"));
    assert_eq!(attrs.get("class"), Some("x"));

    let roots = tree
        .children(tree.root())
        .iter()
        .filter(|&&id| tree.as_element(id).is_some())
        .count();
    assert_eq!(roots, 1);
}

#[test]
fn test_document_skeleton_is_synthesized() {
    let tree = parse_document("Hello");
    assert_eq!(
        serialize(&tree),
        "<html><head></head><body>Hello</body></html>"
    );
}

#[test]
fn test_doctype_and_comments_keep_their_place() {
    let tree = parse_document("<!DOCTYPE html><!--a--><html><body>x</body></html><!--b-->");
    assert_eq!(
        serialize(&tree),
        "<!DOCTYPE html><!--a--><html><head></head><body>x</body></html><!--b-->"
    );
    assert_eq!(tree.quirks_mode(), QuirksMode::NoQuirks);
}

#[test]
fn test_missing_doctype_means_quirks() {
    let tree = parse_document("<p>x");
    assert_eq!(tree.quirks_mode(), QuirksMode::Quirks);
}

#[test_case("<a><p>x</a>y", "<a></a><p><a>x</a>y</p>" ; "anchor across paragraph")]
#[test_case("<a>1<a>2", "<a>1</a><a>2</a>" ; "nested anchor closes the first")]
#[test_case("<b><p>x</b>y", "<b></b><p><b>x</b>y</p>" ; "bold across paragraph")]
#[test_case("<p><b>x<p>y", "<p><b>x</b></p><p><b>y</b></p>" ; "formatting is reconstructed")]
#[test_case("<ul><li>a<li>b</ul>", "<ul><li>a</li><li>b</li></ul>" ; "list items close each other")]
#[test_case("<dl><dt>a<dd>b<dt>c</dl>", "<dl><dt>a</dt><dd>b</dd><dt>c</dt></dl>" ; "definition items")]
#[test_case("<h1>a<h2>b", "<h1>a</h1><h2>b</h2>" ; "heading closes heading")]
#[test_case("x</p>y", "x<p></p>y" ; "stray end p synthesizes an element")]
#[test_case("a</br>b", "a<br>b" ; "end br acts as start br")]
#[test_case("<pre>\nx</pre>", "<pre>x</pre>" ; "leading newline in pre is dropped")]
#[test_case("<image src=a>", "<img src=\"a\">" ; "image becomes img")]
#[test_case("<button>a<button>b", "<button>a</button><button>b</button>" ; "button closes button")]
#[test_case("<nobr>a<nobr>b", "<nobr>a</nobr><nobr>b</nobr>" ; "nobr closes nobr")]
#[test_case("<div>a</span>b</div>", "<div>ab</div>" ; "unmatched end tag is ignored")]
#[test_case("<isindex>", "<form><hr><label>This is a searchable index. Enter search keywords: <input name=\"isindex\"></label><hr></form>" ; "isindex expands into a form")]
#[test_case("<isindex action=/s prompt=\"Find: \" size=5>", "<form action=\"/s\"><hr><label>Find: <input size=\"5\" name=\"isindex\"></label><hr></form>" ; "isindex keeps action prompt and extra attributes")]
#[test_case("<form><isindex>", "<form></form>" ; "isindex inside a form is ignored")]
fn test_body_repairs(input: &str, expected: &str) {
    assert_eq!(body_html(input), expected);
}

#[test]
fn test_noahs_ark_limits_reconstructed_duplicates() {
    assert_eq!(
        body_html("<p><b><b><b><b>x</p>y"),
        "<p><b><b><b><b>x</b></b></b></b></p><b><b><b>y</b></b></b>"
    );
}

#[test]
fn test_adoption_evicts_deep_formatting_elements() {
    // Five formatting elements above the block: the inner loop runs past
    // three and drops `b` from the list, so only `i`, `u` and `s` are cloned.
    assert_eq!(
        body_html("<a><b><i><u><s><div>x</a>y"),
        "<a><b><i><u><s></s></u></i></b></a><i><u><s><div><a>x</a>y</div></s></u></i>"
    );
}

#[test]
fn test_adoption_stops_after_eight_blocks() {
    let tree = parse_document(&format!("<a>{}x</a>y", "<div>".repeat(10)));
    let body = tree.body().expect("body");

    // One block is moved out per outer iteration; the last two stay inside
    // the eighth clone.
    let expected = format!(
        "<a></a>{}<div><a><div><div>xy</div></div></a></div>{}",
        "<div><a></a>".repeat(7),
        "</div>".repeat(7)
    );
    assert_eq!(serialize_children(&tree, body), expected);
}

#[test]
fn test_form_pointer_blocks_nested_forms() {
    assert_eq!(body_html("<form><form>x</form>"), "<form>x</form>");
}

#[test_case("<table><tr><td>1</td></tr></table>", "<table><tbody><tr><td>1</td></tr></tbody></table>" ; "implied tbody")]
#[test_case("<table><td>1<td>2</table>", "<table><tbody><tr><td>1</td><td>2</td></tr></tbody></table>" ; "implied row")]
#[test_case("<table><caption>c</caption><col></table>", "<table><caption>c</caption><colgroup><col></colgroup></table>" ; "caption and implied colgroup")]
#[test_case("<table><tr><td>a<tr><td>b</table>", "<table><tbody><tr><td>a</td></tr><tr><td>b</td></tr></tbody></table>" ; "row closes row")]
#[test_case("<table><thead><tr><th>h<tbody><tr><td>d</table>", "<table><thead><tr><th>h</th></tr></thead><tbody><tr><td>d</td></tr></tbody></table>" ; "sections close sections")]
#[test_case("<table><tr><td><table><tr><td>x</table>y</table>", "<table><tbody><tr><td><table><tbody><tr><td>x</td></tr></tbody></table>y</td></tr></tbody></table>" ; "nested table in cell")]
#[test_case("<table> <tr></table>", "<table> <tbody><tr></tr></tbody></table>" ; "whitespace stays in table")]
fn test_table_structure(input: &str, expected: &str) {
    assert_eq!(body_html(input), expected);
}

#[test]
fn test_elements_in_table_are_foster_parented() {
    assert_eq!(
        body_html("<table><tr><div>x</div><td>y</table>"),
        "<div>x</div><table><tbody><tr><td>y</td></tr></tbody></table>"
    );
}

#[test]
fn test_table_in_quirks_mode_does_not_close_paragraph() {
    assert_eq!(
        body_html("<p><table></table>"),
        "<p><table></table></p>"
    );
    assert_eq!(
        body_html("<!DOCTYPE html><p><table></table>"),
        "<p></p><table></table>"
    );
}

#[test]
fn test_select_contents() {
    assert_eq!(
        body_html("<select><option>a<option>b<optgroup><option>c</select>x"),
        "<select><option>a</option><option>b</option><optgroup><option>c</option></optgroup></select>x"
    );
}

#[test]
fn test_select_drops_other_markup() {
    assert_eq!(
        body_html("<select><div>a</div><option>b</select>"),
        "<select>a<option>b</option></select>"
    );
}

#[test]
fn test_table_tag_closes_select_in_table() {
    assert_eq!(
        body_html("<table><tr><td><select><option>a<td>b</table>"),
        "<table><tbody><tr><td><select><option>a</option></select></td><td>b</td></tr></tbody></table>"
    );
}

#[test]
fn test_frameset_replaces_body() {
    let tree = parse_document("<frameset><frame></frameset>");
    assert_eq!(
        serialize(&tree),
        "<html><head></head><frameset><frame></frameset></html>"
    );
    let body = tree.body().expect("frameset stands in for body");
    assert!(tree.as_element(body).is_some_and(|e| e.is_html("frameset")));
}

#[test]
fn test_frameset_ignored_after_content() {
    assert_eq!(body_html("<p>x<frameset>"), "<p>x</p>");
}

#[test]
fn test_head_content() {
    let tree = parse_document("<title>a<b></title><style>p{}</style><meta charset=utf-8>x");
    let head = find_element(&tree, tree.root(), "head").expect("head");
    assert_eq!(
        serialize_children(&tree, head),
        "<title>a&lt;b&gt;</title><style>p{}</style><meta charset=\"utf-8\">"
    );
}

#[test]
fn test_template_contents_stay_inside_template() {
    let tree = parse_document("<template><td>x</td></template>");
    let head = find_element(&tree, tree.root(), "head").expect("head");
    assert_eq!(
        serialize_children(&tree, head),
        "<template><td>x</td></template>"
    );
}

#[test]
fn test_svg_subtree_is_namespaced_and_adjusted() {
    let tree = parse_document(
        "<svg viewbox='0 0 1 1'><foreignobject><p>x</p></foreignobject></svg><p>y",
    );
    let svg = find_element(&tree, tree.root(), "svg").expect("svg");
    assert_eq!(namespace_of(&tree, svg), Namespace::Svg);
    let attrs = &tree.as_element(svg).expect("element").attrs;
    assert_eq!(attrs.get("viewBox"), Some("0 0 1 1"));

    let foreign_object = find_element(&tree, svg, "foreignObject").expect("adjusted name");
    assert_eq!(namespace_of(&tree, foreign_object), Namespace::Svg);
    let inner_p = find_element(&tree, foreign_object, "p").expect("p");
    assert_eq!(namespace_of(&tree, inner_p), Namespace::Html);

    let body = tree.body().expect("body");
    let last = tree.last_child(body).expect("trailing paragraph");
    assert!(tree.as_element(last).is_some_and(|e| e.is_html("p")));
}

#[test]
fn test_html_tag_breaks_out_of_svg() {
    let tree = parse_document("<svg><g><b>x</b></g></svg>");
    let body = tree.body().expect("body");
    assert_eq!(serialize_children(&tree, body), "<svg><g></g></svg><b>x</b>");
    let b = find_element(&tree, body, "b").expect("b");
    assert_eq!(namespace_of(&tree, b), Namespace::Html);
}

#[test]
fn test_font_breaks_out_only_with_presentational_attributes() {
    let tree = parse_document("<svg><font>a</font><font color=red>b</font></svg>");
    let svg = find_element(&tree, tree.root(), "svg").expect("svg");
    assert_eq!(tree.children(svg).len(), 1);
    let inner = find_element(&tree, svg, "font").expect("svg font");
    assert_eq!(namespace_of(&tree, inner), Namespace::Svg);
}

#[test]
fn test_mathml_subtree() {
    let tree = parse_document("<math definitionurl=u><mi>x</mi></math>");
    let math = find_element(&tree, tree.root(), "math").expect("math");
    assert_eq!(namespace_of(&tree, math), Namespace::MathMl);
    let attrs = &tree.as_element(math).expect("element").attrs;
    assert_eq!(attrs.get("definitionURL"), Some("u"));
    let mi = find_element(&tree, math, "mi").expect("mi");
    assert_eq!(namespace_of(&tree, mi), Namespace::MathMl);
    assert_eq!(text_content(&tree, mi), "x");
}

#[test]
fn test_self_closing_foreign_elements() {
    let tree = parse_document("<svg><circle/><rect/></svg>");
    let svg = find_element(&tree, tree.root(), "svg").expect("svg");
    assert_eq!(tree.children(svg).len(), 2);
}

#[test]
fn test_null_in_foreign_content_is_replaced() {
    let tree = parse_document("<svg>a\0b</svg>");
    let svg = find_element(&tree, tree.root(), "svg").expect("svg");
    assert_eq!(text_content(&tree, svg), "a\u{FFFD}b");
}

#[test]
fn test_script_text_is_raw() {
    let tree = parse_document("<script>if (a<b) {}</script>");
    let script = find_element(&tree, tree.root(), "script").expect("script");
    assert_eq!(text_content(&tree, script), "if (a<b) {}");
}

#[test]
fn test_textarea_is_rcdata() {
    let tree = parse_document("<textarea>\n<b>x</b></textarea>");
    let textarea = find_element(&tree, tree.root(), "textarea").expect("textarea");
    assert_eq!(text_content(&tree, textarea), "<b>x</b>");
}

#[test]
fn test_plaintext_swallows_the_rest() {
    let tree = parse_document("<plaintext><p>x</p>");
    let plaintext = find_element(&tree, tree.root(), "plaintext").expect("plaintext");
    assert_eq!(text_content(&tree, plaintext), "<p>x</p>");
}

#[test]
fn test_text_after_body_is_moved_into_body() {
    assert_eq!(body_html("<body>a</body>b"), "ab");
}

#[test]
fn test_comment_after_html_goes_to_document() {
    let tree = parse_document("<html></html><!--c-->");
    let last = tree.last_child(tree.root()).expect("comment");
    assert!(matches!(
        &tree.get(last).expect("node").node_type,
        NodeType::Comment(data) if data == "c"
    ));
}

#[test]
fn test_unclosed_elements_at_end_are_reported() {
    let (_, clean) = parse_document_with_issues("<!DOCTYPE html><p>x");
    assert!(clean.is_empty(), "{clean:?}");

    let (_, issues) = parse_document_with_issues("<!DOCTYPE html><div><span>x");
    assert_eq!(issues.len(), 1, "{issues:?}");
    assert_eq!(issues[0].token_kind, "EndOfInput");
}

#[test]
fn test_issues_carry_lines() {
    let (_, issues) = parse_document_with_issues("<!DOCTYPE html>\n<p>\n</div>");
    assert_eq!(issues.len(), 1, "{issues:?}");
    assert_eq!(issues[0].line, 3);
    assert_eq!(issues[0].token_kind, "EndTag");
}

#[test]
fn test_serialization_is_a_fixed_point() {
    let inputs = [
        "<b>1<i>2</b>3</i>",
        "<table>A<td>B",
        "<pre>\n\nx</pre>",
        "<svg><circle r=1 /></svg><p>a b",
        "<select><option>a<option>b</select>",
        "<ul><li>x<li>y</ul><textarea>\n\nz</textarea>",
    ];
    for input in inputs {
        let once = serialize(&parse_document(input));
        let twice = serialize(&parse_document(&once));
        assert_eq!(once, twice, "input: {input}");
    }
}
