use arbor_dom::{Namespace, QuirksMode};

use super::foreign::adjust_foreign_tag;
use super::insertion_mode::InsertionMode;
use super::open_elements::Scope;
use super::sink::TreeSink;
use super::tags::{BLOCK_CONTAINERS, HEAD_CONTENT, HEADINGS, TABLE_STRUCTURE, is_special};
use super::tree_builder::TreeBuilder;
use crate::tokenizer::{Attribute, Tag, Token, TokenizerState};

/// The prompt an `isindex` without a `prompt` attribute shows.
const ISINDEX_PROMPT: &str = "This is a searchable index. Enter search keywords: ";

impl<S: TreeSink> TreeBuilder<S> {
    /// Start tag tokens.
    pub(super) fn process_start_tag(&mut self, tag: &Tag) {
        let name = tag.name.as_str();
        match self.insertion_mode {
            InsertionMode::Initial => {
                self.process_default_for_initial(&Token::StartTag(tag.clone()));
                self.process_start_tag(tag);
            }

            // [§ 13.2.6.4.2 The "before html" insertion mode]
            InsertionMode::BeforeHtml => {
                if name == "html" {
                    self.insert_root_element(tag);
                } else {
                    self.process_default_for_before_html();
                    self.process_start_tag(tag);
                }
            }

            // [§ 13.2.6.4.3 The "before head" insertion mode]
            InsertionMode::BeforeHead => match name {
                "html" => self.process_start_tag_for_in_body(tag),
                "head" => {
                    let head = self.insert_html_element(tag);
                    self.head_element_pointer = Some(head);
                    self.switch_to(InsertionMode::InHead);
                }
                _ => {
                    self.process_default_for_before_head();
                    self.process_start_tag(tag);
                }
            },

            InsertionMode::InHead => {
                if !self.process_start_tag_for_in_head(tag) {
                    self.process_default_for_in_head();
                    self.process_start_tag(tag);
                }
            }

            // [§ 13.2.6.4.5 The "in head noscript" insertion mode]
            InsertionMode::InHeadNoscript => match name {
                "html" => self.process_start_tag_for_in_body(tag),
                "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style" => {
                    let _ = self.process_start_tag_for_in_head(tag);
                }
                "head" | "noscript" => self.unexpected_start_tag(tag),
                _ => {
                    self.process_default_for_in_head_noscript(&Token::StartTag(tag.clone()));
                    self.process_start_tag(tag);
                }
            },

            // [§ 13.2.6.4.6 The "after head" insertion mode]
            InsertionMode::AfterHead => match name {
                "html" => self.process_start_tag_for_in_body(tag),
                "body" => {
                    let _ = self.insert_html_element(tag);
                    self.frameset_ok = false;
                    self.switch_to(InsertionMode::InBody);
                }
                "frameset" => {
                    let _ = self.insert_html_element(tag);
                    self.switch_to(InsertionMode::InFrameset);
                }
                _ if HEAD_CONTENT.contains(&name) => {
                    // "Parse error. Push the node pointed to by the head element
                    // pointer onto the stack of open elements. Process the token
                    // using the rules for the "in head" insertion mode. Remove the
                    // node pointed to by the head element pointer from the stack
                    // of open elements."
                    self.unexpected_start_tag(tag);
                    let Some(head) = self.head_element_pointer else {
                        return;
                    };
                    self.open_elements.push(head, "head", Namespace::Html);
                    let _ = self.process_start_tag_for_in_head(tag);
                    let _ = self.open_elements.remove(head);
                }
                "head" => self.unexpected_start_tag(tag),
                _ => {
                    self.process_default_for_after_head();
                    self.process_start_tag(tag);
                }
            },

            InsertionMode::InBody => self.process_start_tag_for_in_body(tag),

            // Start tags never reach the text mode: the tokenizer is in a raw
            // text state until the matching end tag.
            InsertionMode::Text => self.unexpected_start_tag(tag),

            InsertionMode::InTable => self.process_start_tag_for_in_table(tag),

            InsertionMode::InTableText => {
                self.process_default_for_in_table_text();
                self.process_start_tag(tag);
            }

            // [§ 13.2.6.4.11 The "in caption" insertion mode]
            InsertionMode::InCaption => {
                if !TABLE_STRUCTURE.contains(&name) {
                    self.process_start_tag_for_in_body(tag);
                    return;
                }
                if self.close_caption() {
                    self.process_start_tag(tag);
                } else {
                    self.unexpected_start_tag(tag);
                }
            }

            // [§ 13.2.6.4.12 The "in column group" insertion mode]
            InsertionMode::InColumnGroup => match name {
                "html" => self.process_start_tag_for_in_body(tag),
                "col" => {
                    let _ = self.insert_html_element(tag);
                    let _ = self.open_elements.pop();
                }
                "template" => {
                    let _ = self.process_start_tag_for_in_head(tag);
                }
                _ => {
                    if self.process_default_for_in_column_group(&Token::StartTag(tag.clone())) {
                        self.process_start_tag(tag);
                    }
                }
            },

            // [§ 13.2.6.4.13 The "in table body" insertion mode]
            InsertionMode::InTableBody => match name {
                "tr" => {
                    self.clear_stack_back_to_table_body_context();
                    let _ = self.insert_html_element(tag);
                    self.switch_to(InsertionMode::InRow);
                }
                "th" | "td" => {
                    self.unexpected_start_tag(tag);
                    self.clear_stack_back_to_table_body_context();
                    let _ = self.insert_synthesized_element("tr");
                    self.switch_to(InsertionMode::InRow);
                    self.process_start_tag(tag);
                }
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    if self.close_table_body() {
                        self.process_start_tag(tag);
                    } else {
                        self.unexpected_start_tag(tag);
                    }
                }
                _ => self.process_start_tag_for_in_table(tag),
            },

            // [§ 13.2.6.4.14 The "in row" insertion mode]
            InsertionMode::InRow => match name {
                "th" | "td" => {
                    self.clear_stack_back_to_table_row_context();
                    let _ = self.insert_html_element(tag);
                    self.switch_to(InsertionMode::InCell);
                    self.active_formatting_elements.push_marker();
                }
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr" => {
                    if self.close_table_row() {
                        self.process_start_tag(tag);
                    } else {
                        self.unexpected_start_tag(tag);
                    }
                }
                _ => self.process_start_tag_for_in_table(tag),
            },

            // [§ 13.2.6.4.15 The "in cell" insertion mode]
            InsertionMode::InCell => {
                if !TABLE_STRUCTURE.contains(&name) {
                    self.process_start_tag_for_in_body(tag);
                    return;
                }
                // "If the stack of open elements does not have a td or th element
                // in table scope, then this is a parse error; ignore the token.
                // Otherwise, close the cell and reprocess the token."
                if self
                    .open_elements
                    .has_any_in_scope(&["td", "th"], Scope::Table)
                {
                    self.close_cell();
                    self.process_start_tag(tag);
                } else {
                    self.unexpected_start_tag(tag);
                }
            }

            InsertionMode::InSelect => self.process_start_tag_for_in_select(tag),

            // [§ 13.2.6.4.17 The "in select in table" insertion mode]
            InsertionMode::InSelectInTable => {
                if matches!(
                    name,
                    "caption" | "table" | "tbody" | "tfoot" | "thead" | "tr" | "td" | "th"
                ) {
                    // "Parse error. Pop elements from the stack of open elements
                    // until a select element has been popped from the stack. Reset
                    // the insertion mode appropriately. Reprocess the token."
                    self.unexpected_start_tag(tag);
                    let _ = self.open_elements.pop_until_named("select");
                    self.reset_insertion_mode_appropriately();
                    self.process_start_tag(tag);
                } else {
                    self.process_start_tag_for_in_select(tag);
                }
            }

            InsertionMode::InTemplate => self.process_start_tag_for_in_template(tag),

            // [§ 13.2.6.4.19 The "after body" insertion mode]
            InsertionMode::AfterBody | InsertionMode::AfterAfterBody => {
                if name == "html" {
                    self.process_start_tag_for_in_body(tag);
                } else {
                    self.process_default_for_after_body(&Token::StartTag(tag.clone()));
                    self.process_start_tag(tag);
                }
            }

            // [§ 13.2.6.4.20 The "in frameset" insertion mode]
            InsertionMode::InFrameset => match name {
                "html" => self.process_start_tag_for_in_body(tag),
                "frameset" => {
                    let _ = self.insert_html_element(tag);
                }
                "frame" => {
                    let _ = self.insert_html_element(tag);
                    let _ = self.open_elements.pop();
                }
                "noframes" => {
                    let _ = self.process_start_tag_for_in_head(tag);
                }
                _ => self.unexpected_start_tag(tag),
            },

            // [§ 13.2.6.4.21 The "after frameset" insertion mode]
            InsertionMode::AfterFrameset | InsertionMode::AfterAfterFrameset => match name {
                "html" => self.process_start_tag_for_in_body(tag),
                "noframes" => {
                    let _ = self.process_start_tag_for_in_head(tag);
                }
                _ => self.unexpected_start_tag(tag),
            },

            InsertionMode::InForeignContent => self.process_start_tag_in_foreign_content(tag),
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// Returns `false` for tags the "in head" rules send to "anything else".
    pub(super) fn process_start_tag_for_in_head(&mut self, tag: &Tag) -> bool {
        match tag.name.as_str() {
            "html" => self.process_start_tag_for_in_body(tag),

            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            "base" | "basefont" | "bgsound" | "link" | "meta" => {
                let _ = self.insert_html_element(tag);
                let _ = self.open_elements.pop();
            }

            // "Follow the generic RCDATA element parsing algorithm."
            "title" => self.parse_generic_text_element(tag, TokenizerState::RCDATA),

            "noscript" if !self.scripting_enabled => {
                let _ = self.insert_html_element(tag);
                self.switch_to(InsertionMode::InHeadNoscript);
            }

            // "Follow the generic raw text element parsing algorithm."
            "noscript" | "noframes" | "style" => {
                self.parse_generic_text_element(tag, TokenizerState::RAWTEXT);
            }

            "script" => {
                // STEP 1-5: "Let the adjusted insertion location be the
                // appropriate place for inserting a node ... Insert the newly
                // created element at the adjusted insertion location. Push the
                // element onto the stack of open elements"
                let _ = self.insert_html_element(tag);
                self.script_start_line = self.current_line;
                // STEP 6: "Switch the tokenizer to the script data state."
                self.request_tokenizer_state(TokenizerState::ScriptData);
                // STEP 7-8
                self.original_insertion_mode = Some(self.insertion_mode);
                self.switch_to(InsertionMode::Text);
            }

            "template" => {
                // "Insert an HTML element for the token. Insert a marker at the
                // end of the list of active formatting elements. Set the
                // frameset-ok flag to "not ok". Switch the insertion mode to "in
                // template". Push "in template" onto the stack of template
                // insertion modes so that it is the new current template
                // insertion mode."
                let _ = self.insert_html_element(tag);
                self.active_formatting_elements.push_marker();
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InTemplate);
                self.template_insertion_modes.push(InsertionMode::InTemplate);
            }

            "head" => self.unexpected_start_tag(tag),

            _ => return false,
        }
        true
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(super) fn process_start_tag_for_in_body(&mut self, tag: &Tag) {
        let name = tag.name.as_str();
        match name {
            "html" => {
                // "Parse error. If there is a template element on the stack of
                // open elements, then ignore the token. Otherwise, for each
                // attribute on the token, check to see if the attribute is
                // already present on the top element of the stack of open
                // elements. If it is not, add the attribute and its
                // corresponding value to that element."
                self.unexpected_start_tag(tag);
                if self.open_elements.contains_named("template") {
                    return;
                }
                if let Some(root) = self.root_element() {
                    self.merge_attributes(root, tag);
                }
            }

            _ if HEAD_CONTENT.contains(&name) => {
                let _ = self.process_start_tag_for_in_head(tag);
            }

            "body" => {
                // "If the stack of open elements has only one node on it, if the
                // second element on the stack of open elements is not a body
                // element, or if there is a template element on the stack of open
                // elements, then ignore the token."
                self.unexpected_start_tag(tag);
                let body = self.second_open_body();
                if self.open_elements.contains_named("template") {
                    return;
                }
                let Some(body) = body else {
                    return;
                };
                self.frameset_ok = false;
                self.merge_attributes(body, tag);
            }

            "frameset" => {
                self.unexpected_start_tag(tag);
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                let Some(body) = self.second_open_body() else {
                    return;
                };
                if !self.frameset_ok {
                    return;
                }
                // STEP 1: "Remove the second element on the stack of open
                // elements from its parent node, if it has one."
                self.sink.remove_from_parent(body);
                // STEP 2: "Pop all the nodes from the bottom of the stack of open
                // elements, from the current node up to, but not including, the
                // root html element."
                self.open_elements.truncate(1);
                // STEP 3-4
                let _ = self.insert_html_element(tag);
                self.switch_to(InsertionMode::InFrameset);
            }

            _ if BLOCK_CONTAINERS.contains(&name) => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(tag);
            }

            _ if HEADINGS.contains(&name) => {
                self.close_p_element_in_button_scope();
                // "If the current node is an HTML element whose tag name is one of
                // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; pop the current node off the stack of open elements."
                if self.open_elements.current_is_one_of(HEADINGS) {
                    self.unexpected_start_tag(tag);
                    let _ = self.open_elements.pop();
                }
                let _ = self.insert_html_element(tag);
            }

            "pre" | "listing" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(tag);
                self.ignore_next_line_feed = true;
                self.frameset_ok = false;
            }

            "form" => {
                // "If the form element pointer is not null, and there is no
                // template element on the stack of open elements, then this is a
                // parse error; ignore the token."
                let has_template = self.open_elements.contains_named("template");
                if self.open_form_element().is_some() && !has_template {
                    self.unexpected_start_tag(tag);
                    return;
                }
                self.close_p_element_in_button_scope();
                let form = self.insert_html_element(tag);
                if !has_template {
                    self.form_element_pointer = Some(form);
                }
            }

            "li" => {
                self.frameset_ok = false;
                self.close_list_item(&["li"]);
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(tag);
            }

            "dd" | "dt" => {
                self.frameset_ok = false;
                self.close_list_item(&["dd", "dt"]);
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(tag);
            }

            "plaintext" => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(tag);
                // "Switch the tokenizer to the PLAINTEXT state."
                self.request_tokenizer_state(TokenizerState::PLAINTEXT);
            }

            "button" => {
                if self.open_elements.has_in_scope("button", Scope::Default) {
                    self.unexpected_start_tag(tag);
                    self.generate_implied_end_tags(None);
                    let _ = self.open_elements.pop_until_named("button");
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(tag);
                self.frameset_ok = false;
            }

            "a" => {
                // "If the list of active formatting elements contains an a
                // element between the end of the list and the last marker on the
                // list (or the start of the list if there is no marker on the
                // list), then this is a parse error; run the adoption agency
                // algorithm for the token, then remove that element from the list
                // of active formatting elements and the stack of open elements if
                // the adoption agency algorithm didn't already remove it"
                if let Some((_, open_a)) = self.active_formatting_elements.last_element_named("a")
                {
                    self.unexpected_start_tag(tag);
                    let _ = self.run_adoption_agency(&Tag::new("a"));
                    let _ = self.active_formatting_elements.remove(open_a);
                    let _ = self.open_elements.remove(open_a);
                }
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element(tag);
            }

            "b" | "big" | "code" | "em" | "font" | "i" | "s" | "small" | "strike" | "strong"
            | "tt" | "u" => {
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element(tag);
            }

            "nobr" => {
                self.reconstruct_active_formatting_elements();
                if self.open_elements.has_in_scope("nobr", Scope::Default) {
                    self.unexpected_start_tag(tag);
                    let _ = self.run_adoption_agency(&Tag::new("nobr"));
                    self.reconstruct_active_formatting_elements();
                }
                self.insert_formatting_element(tag);
            }

            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(tag);
                self.active_formatting_elements.push_marker();
                self.frameset_ok = false;
            }

            "table" => {
                // "If the Document is not set to quirks mode, and the stack of
                // open elements has a p element in button scope, then close a p
                // element."
                if self.quirks_mode != QuirksMode::Quirks {
                    self.close_p_element_in_button_scope();
                }
                let _ = self.insert_html_element(tag);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InTable);
            }

            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_element(tag);
                self.frameset_ok = false;
            }

            "input" => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_element(tag);
                // "If the token does not have an attribute with the name "type",
                // or if it does, but that attribute's value is not an ASCII
                // case-insensitive match for the string "hidden", then: set the
                // frameset-ok flag to "not ok"."
                if !is_hidden_input(tag) {
                    self.frameset_ok = false;
                }
            }

            "param" | "source" | "track" => self.insert_void_element(tag),

            "hr" => {
                self.close_p_element_in_button_scope();
                self.insert_void_element(tag);
                self.frameset_ok = false;
            }

            "image" => {
                // "Parse error. Change the token's tag name to "img" and reprocess
                // it. (Don't ask.)"
                self.unexpected_start_tag(tag);
                let mut img = tag.clone();
                img.name = "img".to_string();
                self.process_start_tag(&img);
            }

            "isindex" => self.process_isindex_start_tag(tag),

            "textarea" => {
                let _ = self.insert_html_element(tag);
                self.ignore_next_line_feed = true;
                self.request_tokenizer_state(TokenizerState::RCDATA);
                self.original_insertion_mode = Some(self.insertion_mode);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::Text);
            }

            "xmp" => {
                self.close_p_element_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_generic_text_element(tag, TokenizerState::RAWTEXT);
            }

            "iframe" => {
                self.frameset_ok = false;
                self.parse_generic_text_element(tag, TokenizerState::RAWTEXT);
            }

            "noembed" => self.parse_generic_text_element(tag, TokenizerState::RAWTEXT),
            "noscript" if self.scripting_enabled => {
                self.parse_generic_text_element(tag, TokenizerState::RAWTEXT);
            }

            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(tag);
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption", "in
                // table body", "in row", or "in cell", then switch the insertion
                // mode to "in select in table". Otherwise, switch the insertion
                // mode to "in select"."
                if self.insertion_mode.is_table_related() {
                    self.switch_to(InsertionMode::InSelectInTable);
                } else {
                    self.switch_to(InsertionMode::InSelect);
                }
            }

            "optgroup" | "option" => {
                if self.open_elements.current_is("option") {
                    let _ = self.open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(tag);
            }

            "rb" | "rtc" => {
                if self.open_elements.has_in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(None);
                    if !self.open_elements.current_is("ruby") {
                        self.unexpected_start_tag(tag);
                    }
                }
                let _ = self.insert_html_element(tag);
            }

            "rp" | "rt" => {
                if self.open_elements.has_in_scope("ruby", Scope::Default) {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.open_elements.current_is_one_of(&["ruby", "rtc"]) {
                        self.unexpected_start_tag(tag);
                    }
                }
                let _ = self.insert_html_element(tag);
            }

            "math" => self.insert_foreign_root(tag, Namespace::MathMl),
            "svg" => self.insert_foreign_root(tag, Namespace::Svg),

            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => self.unexpected_start_tag(tag),

            // "Any other start tag: Reconstruct the active formatting elements,
            // if any. Insert an HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(tag);
            }
        }
    }

    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(super) fn process_start_tag_for_in_table(&mut self, tag: &Tag) {
        match tag.name.as_str() {
            "caption" => {
                self.clear_stack_back_to_table_context();
                self.active_formatting_elements.push_marker();
                let _ = self.insert_html_element(tag);
                self.switch_to(InsertionMode::InCaption);
            }
            "colgroup" => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(tag);
                self.switch_to(InsertionMode::InColumnGroup);
            }
            "col" => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_synthesized_element("colgroup");
                self.switch_to(InsertionMode::InColumnGroup);
                self.process_start_tag(tag);
            }
            "tbody" | "tfoot" | "thead" => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(tag);
                self.switch_to(InsertionMode::InTableBody);
            }
            "td" | "th" | "tr" => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_synthesized_element("tbody");
                self.switch_to(InsertionMode::InTableBody);
                self.process_start_tag(tag);
            }
            "table" => {
                // "Parse error. If the stack of open elements does not have a
                // table element in table scope, ignore the token. Otherwise: Pop
                // elements from this stack until a table element has been popped
                // from the stack. Reset the insertion mode appropriately.
                // Reprocess the token."
                self.unexpected_start_tag(tag);
                if !self.open_elements.has_in_scope("table", Scope::Table) {
                    return;
                }
                let _ = self.open_elements.pop_until_named("table");
                self.reset_insertion_mode_appropriately();
                self.process_start_tag(tag);
            }
            "style" | "script" | "template" => {
                let _ = self.process_start_tag_for_in_head(tag);
            }
            "input" if is_hidden_input(tag) => {
                self.unexpected_start_tag(tag);
                self.insert_void_element(tag);
            }
            "form" => {
                self.unexpected_start_tag(tag);
                if self.open_elements.contains_named("template")
                    || self.open_form_element().is_some()
                {
                    return;
                }
                let form = self.insert_html_element(tag);
                self.form_element_pointer = Some(form);
                let _ = self.open_elements.pop();
            }
            _ => {
                // "Parse error. Enable foster parenting, process the token using
                // the rules for the "in body" insertion mode, and then disable
                // foster parenting."
                self.unexpected_start_tag(tag);
                self.foster_parenting = true;
                self.process_start_tag_for_in_body(tag);
                self.foster_parenting = false;
            }
        }
    }

    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(super) fn process_start_tag_for_in_select(&mut self, tag: &Tag) {
        match tag.name.as_str() {
            "html" => self.process_start_tag_for_in_body(tag),
            "option" => {
                if self.open_elements.current_is("option") {
                    let _ = self.open_elements.pop();
                }
                let _ = self.insert_html_element(tag);
            }
            "optgroup" => {
                if self.open_elements.current_is("option") {
                    let _ = self.open_elements.pop();
                }
                if self.open_elements.current_is("optgroup") {
                    let _ = self.open_elements.pop();
                }
                let _ = self.insert_html_element(tag);
            }
            "hr" => {
                if self.open_elements.current_is("option") {
                    let _ = self.open_elements.pop();
                }
                if self.open_elements.current_is("optgroup") {
                    let _ = self.open_elements.pop();
                }
                self.insert_void_element(tag);
            }
            "select" => {
                // "Parse error. If the stack of open elements does not have a
                // select element in select scope, ignore the token. Otherwise:
                // Pop elements from the stack of open elements until a select
                // element has been popped from the stack. Reset the insertion
                // mode appropriately."
                self.unexpected_start_tag(tag);
                if self.open_elements.has_in_scope("select", Scope::Select) {
                    let _ = self.open_elements.pop_until_named("select");
                    self.reset_insertion_mode_appropriately();
                }
            }
            "input" | "keygen" | "textarea" => {
                self.unexpected_start_tag(tag);
                if !self.open_elements.has_in_scope("select", Scope::Select) {
                    return;
                }
                let _ = self.open_elements.pop_until_named("select");
                self.reset_insertion_mode_appropriately();
                self.process_start_tag(tag);
            }
            "script" | "template" => {
                let _ = self.process_start_tag_for_in_head(tag);
            }
            _ => self.unexpected_start_tag(tag),
        }
    }

    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    fn process_start_tag_for_in_template(&mut self, tag: &Tag) {
        let name = tag.name.as_str();
        if HEAD_CONTENT.contains(&name) {
            let _ = self.process_start_tag_for_in_head(tag);
            return;
        }
        // "Pop the current template insertion mode off the stack of template
        // insertion modes. Push "in table" onto the stack of template insertion
        // modes so that it is the new current template insertion mode. Switch
        // the insertion mode to "in table", and reprocess the token."
        let mode = match name {
            "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => InsertionMode::InTable,
            "col" => InsertionMode::InColumnGroup,
            "tr" => InsertionMode::InTableBody,
            "td" | "th" => InsertionMode::InRow,
            _ => InsertionMode::InBody,
        };
        let _ = self.template_insertion_modes.pop();
        self.template_insertion_modes.push(mode);
        self.switch_to(mode);
        self.process_start_tag(tag);
    }

    /// `isindex` in body: expands into a one-field search form.
    ///
    /// "Parse error. If the form element pointer is not null, then ignore the
    /// token. Otherwise: Acknowledge the token's self-closing flag, if it is
    /// set. Act as if a start tag token with the tag name "form" had been
    /// seen. If the token has an attribute called "action", set the action
    /// attribute on the resulting form element to the value of the "action"
    /// attribute of the token. Act as if a start tag token with the tag name
    /// "hr" had been seen. Act as if a start tag token with the tag name
    /// "label" had been seen. Act as if a stream of character tokens had been
    /// seen (the prompt). Act as if a start tag token with the tag name
    /// "input" had been seen, with all the attributes from the "isindex"
    /// token except "name", "action", and "prompt", and with an attribute
    /// named "name" with the value "isindex". Act as if an end tag token with
    /// the tag name "label" had been seen. Act as if a start tag token with
    /// the tag name "hr" had been seen. Act as if an end tag token with the
    /// tag name "form" had been seen."
    fn process_isindex_start_tag(&mut self, tag: &Tag) {
        self.unexpected_start_tag(tag);
        if self.open_form_element().is_some() {
            return;
        }

        let form = Tag::with_attributes(
            "form",
            tag.attributes
                .iter()
                .filter(|attribute| attribute.name == "action")
                .cloned(),
        );
        self.process_start_tag_for_in_body(&form);
        self.process_start_tag_for_in_body(&Tag::new("hr"));
        self.process_start_tag_for_in_body(&Tag::new("label"));

        let prompt = tag.attribute("prompt").unwrap_or(ISINDEX_PROMPT).to_string();
        for c in prompt.chars() {
            self.process_character_for_in_body(c);
        }

        let input = Tag::with_attributes(
            "input",
            tag.attributes
                .iter()
                .filter(|attribute| {
                    !matches!(attribute.name.as_str(), "name" | "action" | "prompt")
                })
                .cloned()
                .chain([Attribute::new("name", "isindex")]),
        );
        self.process_start_tag_for_in_body(&input);
        self.process_end_tag_for_in_body(&Tag::new("label"));
        self.process_start_tag_for_in_body(&Tag::new("hr"));
        self.process_end_tag_for_in_body(&Tag::new("form"));
    }

    // ===== Helpers shared with the end tag rules =====

    /// Insert an element that never has children and pop it straight away.
    fn insert_void_element(&mut self, tag: &Tag) {
        let _ = self.insert_html_element(tag);
        let _ = self.open_elements.pop();
    }

    /// `math` and `svg` in body: "Insert a foreign element for the token, with
    /// the adjusted insertion location ... If the token has its self-closing
    /// flag set, pop the current node off the stack of open elements".
    fn insert_foreign_root(&mut self, tag: &Tag, namespace: Namespace) {
        self.reconstruct_active_formatting_elements();
        let _ = self.insert_element(&adjust_foreign_tag(tag, namespace), namespace);
        if tag.self_closing {
            let _ = self.open_elements.pop();
        }
    }

    /// Add the attributes of `tag` that `element` does not have yet.
    fn merge_attributes(&mut self, element: S::Handle, tag: &Tag) {
        for attribute in &tag.attributes {
            self.sink
                .set_attribute_if_absent(element, &attribute.name, &attribute.value);
        }
    }

    /// The second element on the stack, if it is a `body`.
    fn second_open_body(&self) -> Option<S::Handle> {
        self.open_elements
            .get(1)
            .filter(|entry| entry.is_html("body"))
            .map(|entry| entry.handle)
    }

    /// The loop shared by `li`, `dd` and `dt` start tags: walk down from the
    /// current node and close the nearest open item named in `names`, stopping
    /// at special elements other than `address`, `div` and `p`.
    fn close_list_item(&mut self, names: &[&str]) {
        let mut found = None;
        for entry in self.open_elements.iter().rev() {
            if entry.is_html_one_of(names) {
                found = Some(entry.name.clone());
                break;
            }
            if is_special(&entry.name, entry.namespace)
                && !entry.is_html_one_of(&["address", "div", "p"])
            {
                break;
            }
        }
        let Some(name) = found else {
            return;
        };

        // "Generate implied end tags, except for li elements. If the current
        // node is not an li element, then this is a parse error. Pop elements
        // from the stack of open elements until an li element has been popped
        // from the stack."
        self.generate_implied_end_tags(Some(&name));
        if !self.open_elements.current_is(&name) {
            self.parse_error(&Token::end_tag(&name));
        }
        let _ = self.open_elements.pop_until_named(&name);
    }

    /// [§ 13.2.6.4.11](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    ///
    /// The `</caption>` steps. Returns `false` when no caption is in table
    /// scope and nothing was closed.
    pub(super) fn close_caption(&mut self) -> bool {
        if !self.open_elements.has_in_scope("caption", Scope::Table) {
            return false;
        }
        // "Generate implied end tags. Now, if the current node is not a caption
        // element, then this is a parse error. Pop elements from this stack
        // until a caption element has been popped from the stack. Clear the
        // list of active formatting elements up to the last marker. Switch the
        // insertion mode to "in table"."
        self.generate_implied_end_tags(None);
        if !self.open_elements.current_is("caption") {
            self.parse_error(&Token::end_tag("caption"));
        }
        let _ = self.open_elements.pop_until_named("caption");
        self.active_formatting_elements.clear_to_last_marker();
        self.switch_to(InsertionMode::InTable);
        true
    }

    /// Close the open table section so a new one (or the table end) can be
    /// handled in the "in table" mode. Returns `false` when no section is in
    /// table scope.
    pub(super) fn close_table_body(&mut self) -> bool {
        if !self
            .open_elements
            .has_any_in_scope(&["tbody", "thead", "tfoot"], Scope::Table)
        {
            return false;
        }
        self.clear_stack_back_to_table_body_context();
        let _ = self.open_elements.pop();
        self.switch_to(InsertionMode::InTable);
        true
    }

    /// The `</tr>` steps. Returns `false` when no `tr` is in table scope.
    pub(super) fn close_table_row(&mut self) -> bool {
        if !self.open_elements.has_in_scope("tr", Scope::Table) {
            return false;
        }
        // "Clear the stack back to a table row context. Pop the current node
        // (which will be a tr element) from the stack of open elements. Switch
        // the insertion mode to "in table body"."
        self.clear_stack_back_to_table_row_context();
        let _ = self.open_elements.pop();
        self.switch_to(InsertionMode::InTableBody);
        true
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    ///
    /// "close the cell"
    pub(super) fn close_cell(&mut self) {
        // STEP 1: "Generate implied end tags."
        self.generate_implied_end_tags(None);
        // STEP 2: "If the current node is not now a td element or a th element,
        // then this is a parse error."
        if !self.open_elements.current_is_one_of(&["td", "th"]) {
            self.parse_error(&Token::end_tag("td"));
        }
        // STEP 3: "Pop elements from the stack of open elements stack until a
        // td element or a th element has been popped from the stack."
        let _ = self.open_elements.pop_until_one_of(&["td", "th"]);
        // STEP 4: "Clear the list of active formatting elements up to the last
        // marker."
        self.active_formatting_elements.clear_to_last_marker();
        // STEP 5: "Switch the insertion mode to "in row"."
        self.switch_to(InsertionMode::InRow);
    }
}

/// An `input` whose `type` is an ASCII case-insensitive match for "hidden".
fn is_hidden_input(tag: &Tag) -> bool {
    tag.attribute("type")
        .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"))
}
