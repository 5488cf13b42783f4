use super::insertion_mode::InsertionMode;
use super::open_elements::Scope;
use super::sink::TreeSink;
use super::tags::{ALLOWED_OPEN_AT_END, BLOCK_END_TAGS, FORMATTING_ELEMENTS, HEADINGS, is_special};
use super::tree_builder::TreeBuilder;
use crate::tokenizer::{Tag, Token};

impl<S: TreeSink> TreeBuilder<S> {
    /// End tag tokens.
    pub(super) fn process_end_tag(&mut self, tag: &Tag) {
        let name = tag.name.as_str();
        match self.insertion_mode {
            InsertionMode::Initial => {
                self.process_default_for_initial(&Token::EndTag(tag.clone()));
                self.process_end_tag(tag);
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br":
            // Act as described in the "anything else" entry below."
            // "Any other end tag: Parse error. Ignore the token."
            InsertionMode::BeforeHtml => {
                if tag.is_one_of(&["head", "body", "html", "br"]) {
                    self.process_default_for_before_html();
                    self.process_end_tag(tag);
                } else {
                    self.unexpected_end_tag(tag);
                }
            }

            InsertionMode::BeforeHead => {
                if tag.is_one_of(&["head", "body", "html", "br"]) {
                    self.process_default_for_before_head();
                    self.process_end_tag(tag);
                } else {
                    self.unexpected_end_tag(tag);
                }
            }

            InsertionMode::InHead => match name {
                "head" => {
                    let _ = self.open_elements.pop();
                    self.switch_to(InsertionMode::AfterHead);
                }
                "body" | "html" | "br" => {
                    self.process_default_for_in_head();
                    self.process_end_tag(tag);
                }
                "template" => self.process_template_end_tag(tag),
                _ => self.unexpected_end_tag(tag),
            },

            InsertionMode::InHeadNoscript => match name {
                "noscript" => {
                    let _ = self.open_elements.pop();
                    self.switch_to(InsertionMode::InHead);
                }
                "br" => {
                    self.process_default_for_in_head_noscript(&Token::EndTag(tag.clone()));
                    self.process_end_tag(tag);
                }
                _ => self.unexpected_end_tag(tag),
            },

            InsertionMode::AfterHead => match name {
                "template" => self.process_template_end_tag(tag),
                "body" | "html" | "br" => {
                    self.process_default_for_after_head();
                    self.process_end_tag(tag);
                }
                _ => self.unexpected_end_tag(tag),
            },

            InsertionMode::InBody => self.process_end_tag_for_in_body(tag),

            // [§ 13.2.6.4.8 The "text" insertion mode]
            InsertionMode::Text => {
                // "Pop the current node off the stack of open elements. Switch the
                // insertion mode to the original insertion mode."
                let popped = self.open_elements.pop();
                let mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InBody);
                self.switch_to(mode);
                // "An end tag whose tag name is "script"": the script is handed to
                // the embedder before any further token is processed.
                if let Some(script) =
                    popped.filter(|entry| name == "script" && entry.is_html("script"))
                {
                    self.pause(script.handle);
                }
            }

            InsertionMode::InTable => self.process_end_tag_for_in_table(tag),

            InsertionMode::InTableText => {
                self.process_default_for_in_table_text();
                self.process_end_tag(tag);
            }

            // [§ 13.2.6.4.11 The "in caption" insertion mode]
            InsertionMode::InCaption => match name {
                "caption" => {
                    if !self.close_caption() {
                        self.unexpected_end_tag(tag);
                    }
                }
                "table" => {
                    if self.close_caption() {
                        self.process_end_tag(tag);
                    } else {
                        self.unexpected_end_tag(tag);
                    }
                }
                "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
                | "thead" | "tr" => self.unexpected_end_tag(tag),
                _ => self.process_end_tag_for_in_body(tag),
            },

            // [§ 13.2.6.4.12 The "in column group" insertion mode]
            InsertionMode::InColumnGroup => match name {
                "colgroup" => {
                    if self.open_elements.current_is("colgroup") {
                        let _ = self.open_elements.pop();
                        self.switch_to(InsertionMode::InTable);
                    } else {
                        self.unexpected_end_tag(tag);
                    }
                }
                "col" => self.unexpected_end_tag(tag),
                "template" => self.process_template_end_tag(tag),
                _ => {
                    if self.process_default_for_in_column_group(&Token::EndTag(tag.clone())) {
                        self.process_end_tag(tag);
                    }
                }
            },

            // [§ 13.2.6.4.13 The "in table body" insertion mode]
            InsertionMode::InTableBody => match name {
                "tbody" | "tfoot" | "thead" => {
                    if !self.open_elements.has_in_scope(name, Scope::Table) {
                        self.unexpected_end_tag(tag);
                        return;
                    }
                    self.clear_stack_back_to_table_body_context();
                    let _ = self.open_elements.pop();
                    self.switch_to(InsertionMode::InTable);
                }
                "table" => {
                    if self.close_table_body() {
                        self.process_end_tag(tag);
                    } else {
                        self.unexpected_end_tag(tag);
                    }
                }
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr" => {
                    self.unexpected_end_tag(tag);
                }
                _ => self.process_end_tag_for_in_table(tag),
            },

            // [§ 13.2.6.4.14 The "in row" insertion mode]
            InsertionMode::InRow => match name {
                "tr" => {
                    if !self.close_table_row() {
                        self.unexpected_end_tag(tag);
                    }
                }
                "table" => {
                    if self.close_table_row() {
                        self.process_end_tag(tag);
                    } else {
                        self.unexpected_end_tag(tag);
                    }
                }
                "tbody" | "tfoot" | "thead" => {
                    if !self.open_elements.has_in_scope(name, Scope::Table) {
                        self.unexpected_end_tag(tag);
                        return;
                    }
                    if self.close_table_row() {
                        self.process_end_tag(tag);
                    }
                }
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" => {
                    self.unexpected_end_tag(tag);
                }
                _ => self.process_end_tag_for_in_table(tag),
            },

            // [§ 13.2.6.4.15 The "in cell" insertion mode]
            InsertionMode::InCell => match name {
                "td" | "th" => {
                    if !self.open_elements.has_in_scope(name, Scope::Table) {
                        self.unexpected_end_tag(tag);
                        return;
                    }
                    // "Generate implied end tags. Now, if the current node is not
                    // an HTML element with the same tag name as the token, then
                    // this is a parse error. Pop elements from the stack of open
                    // elements stack until an HTML element with the same tag name
                    // as the token has been popped from the stack. Clear the list
                    // of active formatting elements up to the last marker. Switch
                    // the insertion mode to "in row"."
                    self.generate_implied_end_tags(None);
                    if !self.open_elements.current_is(name) {
                        self.unexpected_end_tag(tag);
                    }
                    let _ = self.open_elements.pop_until_named(name);
                    self.active_formatting_elements.clear_to_last_marker();
                    self.switch_to(InsertionMode::InRow);
                }
                "body" | "caption" | "col" | "colgroup" | "html" => self.unexpected_end_tag(tag),
                "table" | "tbody" | "tfoot" | "thead" | "tr" => {
                    if self.open_elements.has_in_scope(name, Scope::Table) {
                        self.close_cell();
                        self.process_end_tag(tag);
                    } else {
                        self.unexpected_end_tag(tag);
                    }
                }
                _ => self.process_end_tag_for_in_body(tag),
            },

            InsertionMode::InSelect => self.process_end_tag_for_in_select(tag),

            // [§ 13.2.6.4.17 The "in select in table" insertion mode]
            InsertionMode::InSelectInTable => {
                if !tag.is_one_of(&[
                    "caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th",
                ]) {
                    self.process_end_tag_for_in_select(tag);
                    return;
                }
                self.unexpected_end_tag(tag);
                if !self.open_elements.has_in_scope(name, Scope::Table) {
                    return;
                }
                let _ = self.open_elements.pop_until_named("select");
                self.reset_insertion_mode_appropriately();
                self.process_end_tag(tag);
            }

            // [§ 13.2.6.4.18 The "in template" insertion mode]
            InsertionMode::InTemplate => {
                if name == "template" {
                    self.process_template_end_tag(tag);
                } else {
                    self.unexpected_end_tag(tag);
                }
            }

            // [§ 13.2.6.4.19 The "after body" insertion mode]
            InsertionMode::AfterBody => {
                if name == "html" {
                    self.switch_to(InsertionMode::AfterAfterBody);
                } else {
                    self.process_default_for_after_body(&Token::EndTag(tag.clone()));
                    self.process_end_tag(tag);
                }
            }

            // [§ 13.2.6.4.20 The "in frameset" insertion mode]
            InsertionMode::InFrameset => {
                if name != "frameset" || self.open_elements.len() <= 1 {
                    // "If the current node is the root html element, then this is a
                    // parse error; ignore the token."
                    self.unexpected_end_tag(tag);
                    return;
                }
                let _ = self.open_elements.pop();
                // "If the parser was not created as part of the HTML fragment
                // parsing algorithm (fragment case), and the current node is no
                // longer a frameset element, then switch the insertion mode to
                // "after frameset"."
                if !self.open_elements.current_is("frameset") {
                    self.switch_to(InsertionMode::AfterFrameset);
                }
            }

            InsertionMode::AfterFrameset => {
                if name == "html" {
                    self.switch_to(InsertionMode::AfterAfterFrameset);
                } else {
                    self.unexpected_end_tag(tag);
                }
            }

            InsertionMode::AfterAfterBody => {
                self.process_default_for_after_body(&Token::EndTag(tag.clone()));
                self.process_end_tag(tag);
            }

            InsertionMode::AfterAfterFrameset => self.unexpected_end_tag(tag),

            InsertionMode::InForeignContent => self.process_end_tag_in_foreign_content(tag),
        }
    }

    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "An end tag whose tag name is "template""
    fn process_template_end_tag(&mut self, tag: &Tag) {
        // "If there is no template element on the stack of open elements, then
        // this is a parse error; ignore the token."
        if !self.open_elements.contains_named("template") {
            self.unexpected_end_tag(tag);
            return;
        }
        // STEP 1: "Generate all implied end tags thoroughly."
        self.generate_all_implied_end_tags_thoroughly();
        // STEP 2: "If the current node is not a template element, then this is a
        // parse error."
        if !self.open_elements.current_is("template") {
            self.unexpected_end_tag(tag);
        }
        // STEP 3-6
        let _ = self.open_elements.pop_until_named("template");
        self.active_formatting_elements.clear_to_last_marker();
        let _ = self.template_insertion_modes.pop();
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(super) fn process_end_tag_for_in_body(&mut self, tag: &Tag) {
        let name = tag.name.as_str();
        match name {
            "template" => self.process_template_end_tag(tag),

            "body" | "html" => {
                // "If the stack of open elements does not have a body element in
                // scope, this is a parse error; ignore the token."
                if !self.open_elements.has_in_scope("body", Scope::Default) {
                    self.unexpected_end_tag(tag);
                    return;
                }
                self.report_unclosed_elements(&Token::EndTag(tag.clone()));
                self.switch_to(InsertionMode::AfterBody);
                // `</html>`: "Reprocess the token."
                if name == "html" {
                    self.process_end_tag(tag);
                }
            }

            _ if BLOCK_END_TAGS.contains(&name) => {
                if !self.open_elements.has_in_scope(name, Scope::Default) {
                    self.unexpected_end_tag(tag);
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self.open_elements.current_is(name) {
                    self.unexpected_end_tag(tag);
                }
                let _ = self.open_elements.pop_until_named(name);
            }

            "form" => self.process_form_end_tag(tag),

            "p" => {
                // "If the stack of open elements does not have a p element in
                // button scope, then this is a parse error; insert an HTML element
                // for a "p" start tag token with no attributes."
                if !self.open_elements.has_in_scope("p", Scope::Button) {
                    self.unexpected_end_tag(tag);
                    let _ = self.insert_synthesized_element("p");
                }
                self.close_p_element();
            }

            "li" => self.close_open_item(tag, Scope::ListItem),
            "dd" | "dt" => self.close_open_item(tag, Scope::Default),

            _ if HEADINGS.contains(&name) => {
                if !self.open_elements.has_any_in_scope(HEADINGS, Scope::Default) {
                    self.unexpected_end_tag(tag);
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self.open_elements.current_is(name) {
                    self.unexpected_end_tag(tag);
                }
                let _ = self.open_elements.pop_until_one_of(HEADINGS);
            }

            _ if FORMATTING_ELEMENTS.contains(&name) => {
                if !self.run_adoption_agency(tag) {
                    self.process_any_other_end_tag(tag);
                }
            }

            "applet" | "marquee" | "object" => {
                if !self.open_elements.has_in_scope(name, Scope::Default) {
                    self.unexpected_end_tag(tag);
                    return;
                }
                self.generate_implied_end_tags(None);
                if !self.open_elements.current_is(name) {
                    self.unexpected_end_tag(tag);
                }
                let _ = self.open_elements.pop_until_named(name);
                self.active_formatting_elements.clear_to_last_marker();
            }

            "br" => {
                // "Parse error. Drop the attributes from the token, and act as
                // described in the next entry; i.e. act as if this was a "br"
                // start tag token with no attributes, rather than the end tag
                // token that it actually is."
                self.unexpected_end_tag(tag);
                self.process_start_tag_for_in_body(&Tag::new("br"));
            }

            _ => self.process_any_other_end_tag(tag),
        }
    }

    /// The `</form>` steps, with and without a `template` on the stack.
    fn process_form_end_tag(&mut self, tag: &Tag) {
        if self.open_elements.contains_named("template") {
            if !self.open_elements.has_in_scope("form", Scope::Default) {
                self.unexpected_end_tag(tag);
                return;
            }
            self.generate_implied_end_tags(None);
            if !self.open_elements.current_is("form") {
                self.unexpected_end_tag(tag);
            }
            let _ = self.open_elements.pop_until_named("form");
            return;
        }

        // STEP 1-2: "Let node be the element that the form element pointer is
        // set to, or null if it is not set to an element. Set the form element
        // pointer to null."
        let node = self.form_element_pointer.take();
        // STEP 3: "If node is null or if the stack of open elements does not have
        // node in scope, then this is a parse error; return and ignore the token."
        let Some(node) =
            node.filter(|&form| self.open_elements.has_handle_in_scope(form, Scope::Default))
        else {
            self.unexpected_end_tag(tag);
            return;
        };
        // STEP 4-6: "Generate implied end tags. If the current node is not node,
        // then this is a parse error. Remove node from the stack of open
        // elements."
        self.generate_implied_end_tags(None);
        if self.open_elements.current() != Some(node) {
            self.unexpected_end_tag(tag);
        }
        let _ = self.open_elements.remove(node);
    }

    /// `</li>`, `</dd>` and `</dt>`.
    fn close_open_item(&mut self, tag: &Tag, scope: Scope) {
        let name = tag.name.as_str();
        if !self.open_elements.has_in_scope(name, scope) {
            self.unexpected_end_tag(tag);
            return;
        }
        self.generate_implied_end_tags(Some(name));
        if !self.open_elements.current_is(name) {
            self.unexpected_end_tag(tag);
        }
        let _ = self.open_elements.pop_until_named(name);
    }

    /// "Any other end tag" in body.
    pub(super) fn process_any_other_end_tag(&mut self, tag: &Tag) {
        let name = tag.name.as_str();
        // STEP 1-2: "Initialize node to be the current node (the bottommost node
        // of the stack). Loop: If node is an HTML element with the same tag name
        // as the token, then: ..."
        let mut target = None;
        for entry in self.open_elements.iter().rev() {
            if entry.is_html(name) {
                target = Some(entry.handle);
                break;
            }
            // STEP 3: "Otherwise, if node is in the special category, then this
            // is a parse error; ignore the token, and return."
            if is_special(&entry.name, entry.namespace) {
                break;
            }
        }
        let Some(node) = target else {
            self.unexpected_end_tag(tag);
            return;
        };

        // "Generate implied end tags, except for HTML elements with the same tag
        // name as the token. If node is not the current node, then this is a
        // parse error. Pop all the nodes from the current node up to node,
        // including node, then stop these steps."
        self.generate_implied_end_tags(Some(name));
        if self.open_elements.current() != Some(node) {
            self.unexpected_end_tag(tag);
        }
        let _ = self.open_elements.pop_until(|entry| entry.handle == node);
    }

    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(super) fn process_end_tag_for_in_table(&mut self, tag: &Tag) {
        match tag.name.as_str() {
            "table" => {
                if !self.open_elements.has_in_scope("table", Scope::Table) {
                    self.unexpected_end_tag(tag);
                    return;
                }
                let _ = self.open_elements.pop_until_named("table");
                self.reset_insertion_mode_appropriately();
            }
            "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => self.unexpected_end_tag(tag),
            "template" => self.process_template_end_tag(tag),
            _ => {
                self.unexpected_end_tag(tag);
                self.foster_parenting = true;
                self.process_end_tag_for_in_body(tag);
                self.foster_parenting = false;
            }
        }
    }

    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    fn process_end_tag_for_in_select(&mut self, tag: &Tag) {
        match tag.name.as_str() {
            "optgroup" => {
                // "First, if the current node is an option element, and the node
                // immediately before it in the stack of open elements is an
                // optgroup element, then pop the current node from the stack of
                // open elements."
                let len = self.open_elements.len();
                let option_in_optgroup = self.open_elements.current_is("option")
                    && len >= 2
                    && self
                        .open_elements
                        .get(len - 2)
                        .is_some_and(|entry| entry.is_html("optgroup"));
                if option_in_optgroup {
                    let _ = self.open_elements.pop();
                }
                if self.open_elements.current_is("optgroup") {
                    let _ = self.open_elements.pop();
                } else {
                    self.unexpected_end_tag(tag);
                }
            }
            "option" => {
                if self.open_elements.current_is("option") {
                    let _ = self.open_elements.pop();
                } else {
                    self.unexpected_end_tag(tag);
                }
            }
            "select" => {
                if !self.open_elements.has_in_scope("select", Scope::Select) {
                    self.unexpected_end_tag(tag);
                    return;
                }
                let _ = self.open_elements.pop_until_named("select");
                self.reset_insertion_mode_appropriately();
            }
            "template" => self.process_template_end_tag(tag),
            _ => self.unexpected_end_tag(tag),
        }
    }

    /// "If there is a node in the stack of open elements that is not either a
    /// dd element, a dt element, an li element, ... the body element, or the
    /// html element, then this is a parse error."
    pub(super) fn report_unclosed_elements(&mut self, token: &Token) {
        let unclosed = self
            .open_elements
            .iter()
            .any(|entry| !entry.is_html_one_of(ALLOWED_OPEN_AT_END));
        if unclosed {
            self.parse_error(token);
        }
    }
}
