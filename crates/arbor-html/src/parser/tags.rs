//! Tag name sets referenced throughout tree construction.

use arbor_dom::Namespace;

/// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// "The following elements have varying levels of special parsing rules"
pub const SPECIAL_HTML_ELEMENTS: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
    "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "dd",
    "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure", "footer",
    "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup",
    "hr", "html", "iframe", "img", "input", "keygen", "li", "link", "listing", "main",
    "marquee", "menu", "meta", "nav", "noembed", "noframes", "noscript", "object", "ol", "p",
    "param", "plaintext", "pre", "script", "search", "section", "select", "source", "style",
    "summary", "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "title",
    "tr", "track", "ul", "wbr", "xmp",
];

/// "MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext, and MathML annotation-xml"
const SPECIAL_MATHML_ELEMENTS: &[&str] = &["mi", "mo", "mn", "ms", "mtext", "annotation-xml"];

/// "SVG foreignObject, SVG desc, and SVG title"
const SPECIAL_SVG_ELEMENTS: &[&str] = &["foreignObject", "desc", "title"];

/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
///
/// "The following HTML elements are those that end up in the list of active
/// formatting elements: a, b, big, code, em, font, i, nobr, s, small, strike,
/// strong, tt, and u."
pub const FORMATTING_ELEMENTS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt",
    "u",
];

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
///
/// "while the current node is a dd element, a dt element, an li element, an
/// optgroup element, an option element, a p element, an rb element, an rp
/// element, an rt element, or an rtc element, the UA must pop the current node"
pub const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// "generate all implied end tags thoroughly": the implied set plus table parts.
pub const THOROUGH_IMPLIED_END_TAGS: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Elements that may legitimately still be open at end of input in body.
pub const ALLOWED_OPEN_AT_END: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td", "tfoot",
    "th", "thead", "tr", "body", "html",
];

/// "h1", "h2", "h3", "h4", "h5", "h6"
pub const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Start tags in body that close an open `p` and insert a plain container.
pub const BLOCK_CONTAINERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu",
    "nav", "ol", "p", "search", "section", "summary", "ul",
];

/// End tags in body closed by the "generate implied end tags, pop until" rule.
pub const BLOCK_END_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing",
    "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

/// Start tags handled by the "in head" rules from several other modes.
pub const HEAD_CONTENT: &[&str] = &[
    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style", "template",
    "title",
];

/// Table sections, rows and cells: the tags that close a caption, a cell or a
/// select in a table.
pub const TABLE_STRUCTURE: &[&str] = &[
    "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// "table, tbody, template, tfoot, thead, or tr": nodes whose character
/// children go through the table text buffer.
pub const TABLE_TEXT_PARENTS: &[&str] = &["table", "tbody", "template", "tfoot", "thead", "tr"];

/// "table, tbody, tfoot, thead, or tr": targets that trigger foster parenting.
pub const FOSTER_TARGETS: &[&str] = &["table", "tbody", "tfoot", "thead", "tr"];

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// Start tags that break out of foreign content back into HTML.
pub const FOREIGN_BREAKOUT: &[&str] = &[
    "b", "big", "blockquote", "body", "br", "center", "code", "dd", "div", "dl", "dt", "em",
    "embed", "h1", "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing",
    "menu", "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong", "strike",
    "sub", "sup", "table", "tt", "u", "ul", "var",
];

/// "MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext"
const MATHML_TEXT_INTEGRATION_POINTS: &[&str] = &["mi", "mo", "mn", "ms", "mtext"];

/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#special)
#[must_use]
pub fn is_special(name: &str, namespace: Namespace) -> bool {
    match namespace {
        Namespace::Html => SPECIAL_HTML_ELEMENTS.contains(&name),
        Namespace::MathMl => SPECIAL_MATHML_ELEMENTS.contains(&name),
        Namespace::Svg => SPECIAL_SVG_ELEMENTS.contains(&name),
    }
}

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
///
/// "A node is a MathML text integration point if it is one of the following
/// elements: A MathML mi element, A MathML mo element, ..."
#[must_use]
pub fn is_mathml_text_integration_point(name: &str, namespace: Namespace) -> bool {
    namespace == Namespace::MathMl && MATHML_TEXT_INTEGRATION_POINTS.contains(&name)
}

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
///
/// "An SVG foreignObject element, An SVG desc element, An SVG title element".
/// `annotation-xml` is only an integration point with certain encodings, which
/// are not tracked, so it is treated as one unconditionally.
#[must_use]
pub fn is_html_integration_point(name: &str, namespace: Namespace) -> bool {
    match namespace {
        Namespace::Svg => SPECIAL_SVG_ELEMENTS.contains(&name),
        Namespace::MathMl => name == "annotation-xml",
        Namespace::Html => false,
    }
}

/// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
///
/// "U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF), U+000C FORM FEED (FF),
/// U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
#[must_use]
pub const fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
#[must_use]
pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "basefont"
            | "bgsound"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_special_elements_need_their_namespace() {
        assert!(is_special("mi", Namespace::MathMl));
        assert!(!is_special("mi", Namespace::Html));
        assert!(is_special("title", Namespace::Svg));
        assert!(is_special("title", Namespace::Html));
        assert!(!is_special("span", Namespace::Html));
    }
}
