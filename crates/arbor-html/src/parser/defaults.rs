//! The "anything else" branches shared by every token kind of a mode.
//!
//! Each performs the side effects of the branch (implied elements, mode
//! switch); the caller then reprocesses the token in the new mode.

use arbor_dom::{Namespace, QuirksMode};

use super::insertion_mode::InsertionMode;
use super::sink::TreeSink;
use super::tags::is_whitespace;
use super::tree_builder::TreeBuilder;
use crate::tokenizer::{Tag, Token};

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    ///
    /// "If the document is not an iframe srcdoc document, then this is a parse
    /// error; if the parser cannot change the mode flag is false, set the
    /// Document to quirks mode. In any case, switch the insertion mode to
    /// "before html", then reprocess the token."
    pub(super) fn process_default_for_initial(&mut self, token: &Token) {
        self.parse_error(token);
        self.quirks_mode = QuirksMode::Quirks;
        self.sink.set_quirks_mode(QuirksMode::Quirks);
        self.switch_to(InsertionMode::BeforeHtml);
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    ///
    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of open
    /// elements. Switch the insertion mode to "before head", then reprocess the
    /// token."
    pub(super) fn process_default_for_before_html(&mut self) {
        self.insert_root_element(&Tag::new("html"));
    }

    /// Create the `html` element for `tag` and make it the root of the stack.
    pub(super) fn insert_root_element(&mut self, tag: &Tag) {
        let html = self
            .sink
            .create_element(&tag.name, Namespace::Html, &tag.attributes);
        let document = self.sink.document();
        self.sink.append_child(document, html);
        self.open_elements.push(html, "html", Namespace::Html);
        self.switch_to(InsertionMode::BeforeHead);
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    ///
    /// "Insert an HTML element for a "head" start tag token with no attributes.
    /// Set the head element pointer to the newly created head element. Switch
    /// the insertion mode to "in head". Reprocess the current token."
    pub(super) fn process_default_for_before_head(&mut self) {
        let head = self.insert_synthesized_element("head");
        self.head_element_pointer = Some(head);
        self.switch_to(InsertionMode::InHead);
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements. Switch the insertion mode to "after head". Reprocess the
    /// token."
    pub(super) fn process_default_for_in_head(&mut self) {
        let _ = self.open_elements.pop();
        self.switch_to(InsertionMode::AfterHead);
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    ///
    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to "in head". Reprocess the token."
    pub(super) fn process_default_for_in_head_noscript(&mut self, token: &Token) {
        self.parse_error(token);
        let _ = self.open_elements.pop();
        self.switch_to(InsertionMode::InHead);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    ///
    /// "Insert an HTML element for a "body" start tag token with no attributes.
    /// Switch the insertion mode to "in body". Reprocess the current token."
    ///
    /// The frameset-ok flag is left alone: a `frameset` may still replace this
    /// body.
    pub(super) fn process_default_for_after_head(&mut self) {
        let _ = self.insert_synthesized_element("body");
        self.switch_to(InsertionMode::InBody);
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    ///
    /// "If any of the tokens in the pending table character tokens list are
    /// character tokens that are not ASCII whitespace, then this is a parse
    /// error: reprocess the character tokens in the pending table character
    /// tokens list using the rules given in the "anything else" entry in the
    /// "in table" insertion mode. Otherwise, insert the characters given by the
    /// pending table character tokens list. Switch the insertion mode to the
    /// original insertion mode and reprocess the token."
    pub(super) fn process_default_for_in_table_text(&mut self) {
        let pending = std::mem::take(&mut self.pending_table_characters);
        let mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InTable);
        self.switch_to(mode);

        if let Some(offending) = pending.chars().find(|&c| !is_whitespace(c)) {
            self.unexpected_character(offending);
            self.foster_parenting = true;
            for c in pending.chars() {
                self.process_character_for_in_body(c);
            }
            self.foster_parenting = false;
        } else {
            for c in pending.chars() {
                self.insert_character(c);
            }
        }
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    ///
    /// "If the current node is not a colgroup element, then this is a parse
    /// error; ignore the token. Otherwise, pop the current node from the stack
    /// of open elements. Switch the insertion mode to "in table". Reprocess the
    /// token."
    ///
    /// Returns `false` when the token must be ignored.
    pub(super) fn process_default_for_in_column_group(&mut self, token: &Token) -> bool {
        if !self.open_elements.current_is("colgroup") {
            self.parse_error(token);
            return false;
        }
        let _ = self.open_elements.pop();
        self.switch_to(InsertionMode::InTable);
        true
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    ///
    /// "Parse error. Switch the insertion mode to "in body" and reprocess the
    /// token." Shared with "after after body".
    pub(super) fn process_default_for_after_body(&mut self, token: &Token) {
        self.parse_error(token);
        self.switch_to(InsertionMode::InBody);
    }
}
