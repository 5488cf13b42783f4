//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
//!
//! SVG and MathML subtrees. Elements inherit the namespace of the adjusted
//! current node; HTML-only tags break back out to the secondary mode.

use arbor_dom::Namespace;

use super::sink::TreeSink;
use super::tags::{
    FOREIGN_BREAKOUT, is_html_integration_point, is_mathml_text_integration_point, is_whitespace,
};
use super::tree_builder::TreeBuilder;
use crate::tokenizer::{Attribute, Tag};

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// "If the adjusted current node is an element in the SVG namespace, and the
/// token's tag name is one of the ones in the first column of the following
/// table, change the tag name to the name given in the corresponding cell in
/// the second column."
const SVG_TAG_ADJUSTMENTS: &[(&str, &str)] = &[
    ("altglyph", "altGlyph"),
    ("altglyphdef", "altGlyphDef"),
    ("altglyphitem", "altGlyphItem"),
    ("animatecolor", "animateColor"),
    ("animatemotion", "animateMotion"),
    ("animatetransform", "animateTransform"),
    ("clippath", "clipPath"),
    ("feblend", "feBlend"),
    ("fecolormatrix", "feColorMatrix"),
    ("fecomponenttransfer", "feComponentTransfer"),
    ("fecomposite", "feComposite"),
    ("feconvolvematrix", "feConvolveMatrix"),
    ("fediffuselighting", "feDiffuseLighting"),
    ("fedisplacementmap", "feDisplacementMap"),
    ("fedistantlight", "feDistantLight"),
    ("fedropshadow", "feDropShadow"),
    ("feflood", "feFlood"),
    ("fefunca", "feFuncA"),
    ("fefuncb", "feFuncB"),
    ("fefuncg", "feFuncG"),
    ("fefuncr", "feFuncR"),
    ("fegaussianblur", "feGaussianBlur"),
    ("feimage", "feImage"),
    ("femerge", "feMerge"),
    ("femergenode", "feMergeNode"),
    ("femorphology", "feMorphology"),
    ("feoffset", "feOffset"),
    ("fepointlight", "fePointLight"),
    ("fespecularlighting", "feSpecularLighting"),
    ("fespotlight", "feSpotLight"),
    ("fetile", "feTile"),
    ("feturbulence", "feTurbulence"),
    ("foreignobject", "foreignObject"),
    ("glyphref", "glyphRef"),
    ("lineargradient", "linearGradient"),
    ("radialgradient", "radialGradient"),
    ("textpath", "textPath"),
];

/// [§ 13.2.6.3 Adjust SVG attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-svg-attributes)
///
/// The tokenizer lowercases attribute names; SVG's are case-sensitive.
const SVG_ATTRIBUTE_ADJUSTMENTS: &[(&str, &str)] = &[
    ("attributename", "attributeName"),
    ("attributetype", "attributeType"),
    ("basefrequency", "baseFrequency"),
    ("baseprofile", "baseProfile"),
    ("calcmode", "calcMode"),
    ("clippathunits", "clipPathUnits"),
    ("diffuseconstant", "diffuseConstant"),
    ("edgemode", "edgeMode"),
    ("filterunits", "filterUnits"),
    ("glyphref", "glyphRef"),
    ("gradienttransform", "gradientTransform"),
    ("gradientunits", "gradientUnits"),
    ("kernelmatrix", "kernelMatrix"),
    ("kernelunitlength", "kernelUnitLength"),
    ("keypoints", "keyPoints"),
    ("keysplines", "keySplines"),
    ("keytimes", "keyTimes"),
    ("lengthadjust", "lengthAdjust"),
    ("limitingconeangle", "limitingConeAngle"),
    ("markerheight", "markerHeight"),
    ("markerunits", "markerUnits"),
    ("markerwidth", "markerWidth"),
    ("maskcontentunits", "maskContentUnits"),
    ("maskunits", "maskUnits"),
    ("numoctaves", "numOctaves"),
    ("pathlength", "pathLength"),
    ("patterncontentunits", "patternContentUnits"),
    ("patterntransform", "patternTransform"),
    ("patternunits", "patternUnits"),
    ("pointsatx", "pointsAtX"),
    ("pointsaty", "pointsAtY"),
    ("pointsatz", "pointsAtZ"),
    ("preservealpha", "preserveAlpha"),
    ("preserveaspectratio", "preserveAspectRatio"),
    ("primitiveunits", "primitiveUnits"),
    ("refx", "refX"),
    ("refy", "refY"),
    ("repeatcount", "repeatCount"),
    ("repeatdur", "repeatDur"),
    ("requiredextensions", "requiredExtensions"),
    ("requiredfeatures", "requiredFeatures"),
    ("specularconstant", "specularConstant"),
    ("specularexponent", "specularExponent"),
    ("spreadmethod", "spreadMethod"),
    ("startoffset", "startOffset"),
    ("stddeviation", "stdDeviation"),
    ("stitchtiles", "stitchTiles"),
    ("surfacescale", "surfaceScale"),
    ("systemlanguage", "systemLanguage"),
    ("tablevalues", "tableValues"),
    ("targetx", "targetX"),
    ("targety", "targetY"),
    ("textlength", "textLength"),
    ("viewbox", "viewBox"),
    ("viewtarget", "viewTarget"),
    ("xchannelselector", "xChannelSelector"),
    ("ychannelselector", "yChannelSelector"),
    ("zoomandpan", "zoomAndPan"),
];

/// [§ 13.2.6.3 Adjust MathML attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
const MATHML_ATTRIBUTE_ADJUSTMENTS: &[(&str, &str)] = &[("definitionurl", "definitionURL")];

fn adjust_name(name: &mut String, table: &[(&str, &str)]) {
    if let Some(&(_, adjusted)) = table.iter().find(|(from, _)| *from == name.as_str()) {
        *name = adjusted.to_string();
    }
}

fn adjust_attributes(attributes: &mut [Attribute], table: &[(&str, &str)]) {
    for attribute in attributes {
        adjust_name(&mut attribute.name, table);
    }
}

/// `tag` as it should be created in `namespace`: SVG tag names and SVG or
/// MathML attribute names get their mixed-case spellings back.
#[must_use]
pub fn adjust_foreign_tag(tag: &Tag, namespace: Namespace) -> Tag {
    let mut adjusted = tag.clone();
    match namespace {
        Namespace::Svg => {
            adjust_name(&mut adjusted.name, SVG_TAG_ADJUSTMENTS);
            adjust_attributes(&mut adjusted.attributes, SVG_ATTRIBUTE_ADJUSTMENTS);
        }
        Namespace::MathMl => {
            adjust_attributes(&mut adjusted.attributes, MATHML_ATTRIBUTE_ADJUSTMENTS);
        }
        Namespace::Html => {}
    }
    adjusted
}

/// "A start tag whose tag name is "font", if the token has any attributes
/// named "color", "face", or "size"", or one of the breakout tags.
fn breaks_out_of_foreign_content(tag: &Tag) -> bool {
    FOREIGN_BREAKOUT.contains(&tag.name.as_str())
        || (tag.name == "font"
            && ["color", "face", "size"]
                .iter()
                .any(|name| tag.attribute(name).is_some()))
}

impl<S: TreeSink> TreeBuilder<S> {
    /// Characters while the current node is foreign.
    pub(super) fn process_character_in_foreign_content(&mut self, c: char) {
        // "A character token that is U+0000 NULL: Parse error. Insert a U+FFFD
        // REPLACEMENT CHARACTER character."
        if c == '\0' {
            self.unexpected_character(c);
            self.insert_character('\u{FFFD}');
            return;
        }
        self.insert_character(c);
        // "Any other character token: Insert the token's character. Set the
        // frameset-ok flag to "not ok"."
        if !is_whitespace(c) {
            self.frameset_ok = false;
        }
    }

    /// Start tags while the current node is foreign.
    pub(super) fn process_start_tag_in_foreign_content(&mut self, tag: &Tag) {
        if breaks_out_of_foreign_content(tag) {
            // "Parse error. While the current node is not a MathML text
            // integration point, an HTML integration point, or an element in the
            // HTML namespace, pop elements from the stack of open elements.
            // Reprocess the token according to the rules given in the section
            // corresponding to the current insertion mode in HTML content."
            self.unexpected_start_tag(tag);
            self.pop_to_html_boundary();
            self.leave_foreign_content();
            self.process_start_tag(tag);
            return;
        }

        // "Any other start tag: If the adjusted current node is an element in
        // the MathML namespace, adjust MathML attributes for the token. If the
        // adjusted current node is an element in the SVG namespace, and the
        // token's tag name is one of the ones in the first column of the
        // following table, change the tag name ... Insert a foreign element for
        // the token, with adjusted current node's namespace and false."
        let namespace = self
            .open_elements
            .top()
            .map_or(Namespace::Html, |entry| entry.namespace);
        let adjusted = adjust_foreign_tag(tag, namespace);
        let _ = self.insert_element(&adjusted, namespace);

        // "If the token has its self-closing flag set, pop the current node off
        // the stack of open elements and acknowledge the token's self-closing
        // flag."
        if tag.self_closing {
            let _ = self.open_elements.pop();
        }
    }

    /// End tags while the current node is foreign.
    pub(super) fn process_end_tag_in_foreign_content(&mut self, tag: &Tag) {
        // "An end tag whose tag name is "br", "p": Parse error. While the current
        // node is not a MathML text integration point, an HTML integration
        // point, or an element in the HTML namespace, pop elements from the
        // stack of open elements. Reprocess the token according to the rules
        // given in the section corresponding to the current insertion mode in
        // HTML content."
        if tag.is_one_of(&["br", "p"]) {
            self.unexpected_end_tag(tag);
            self.pop_to_html_boundary();
            self.leave_foreign_content();
            self.process_end_tag(tag);
            return;
        }

        // STEP 1-2: "Initialize node to be the current node. If node's tag name,
        // converted to ASCII lowercase, is not the same as the tag name of the
        // token, then this is a parse error."
        let matches = |name: &str| name.eq_ignore_ascii_case(&tag.name);
        if !self
            .open_elements
            .top()
            .is_some_and(|entry| matches(&entry.name))
        {
            self.unexpected_end_tag(tag);
        }

        // STEP 3-6: walk towards the root until a match, or until an HTML element
        // hands the token back to the HTML rules.
        for index in (1..self.open_elements.len()).rev() {
            let Some(entry) = self.open_elements.get(index) else {
                break;
            };
            if entry.namespace == Namespace::Html {
                // "Otherwise, process the token according to the rules given in
                // the section corresponding to the current insertion mode in
                // HTML content."
                self.leave_foreign_content();
                self.process_end_tag(tag);
                return;
            }
            if matches(&entry.name) {
                // "Pop elements from the stack of open elements until node has
                // been popped from the stack."
                self.open_elements.truncate(index);
                return;
            }
        }
    }

    /// Pop until the current node is HTML or an integration point.
    fn pop_to_html_boundary(&mut self) {
        while let Some(top) = self.open_elements.top() {
            if top.namespace == Namespace::Html
                || is_mathml_text_integration_point(&top.name, top.namespace)
                || is_html_integration_point(&top.name, top.namespace)
            {
                break;
            }
            let _ = self.open_elements.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_tag_and_attribute_names_regain_their_case() {
        let tag = Tag::with_attributes(
            "foreignobject",
            [Attribute::new("viewbox", "0 0 1 1"), Attribute::new("id", "x")],
        );
        let adjusted = adjust_foreign_tag(&tag, Namespace::Svg);
        assert_eq!(adjusted.name, "foreignObject");
        assert_eq!(adjusted.attribute("viewBox"), Some("0 0 1 1"));
        assert_eq!(adjusted.attribute("id"), Some("x"));
    }

    #[test]
    fn mathml_keeps_tag_names() {
        let tag = Tag::with_attributes("clippath", [Attribute::new("definitionurl", "u")]);
        let adjusted = adjust_foreign_tag(&tag, Namespace::MathMl);
        assert_eq!(adjusted.name, "clippath");
        assert_eq!(adjusted.attribute("definitionURL"), Some("u"));
    }

    #[test]
    fn font_only_breaks_out_with_presentational_attributes() {
        assert!(!breaks_out_of_foreign_content(&Tag::new("font")));
        assert!(breaks_out_of_foreign_content(&Tag::with_attributes(
            "font",
            [Attribute::new("color", "red")]
        )));
        assert!(breaks_out_of_foreign_content(&Tag::new("div")));
        assert!(!breaks_out_of_foreign_content(&Tag::new("circle")));
    }
}
