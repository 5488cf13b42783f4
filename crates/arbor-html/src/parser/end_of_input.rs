use super::insertion_mode::InsertionMode;
use super::sink::TreeSink;
use super::tree_builder::TreeBuilder;
use crate::tokenizer::Token;

impl<S: TreeSink> TreeBuilder<S> {
    /// The end-of-file token.
    pub(super) fn process_end_of_input(&mut self) {
        let token = Token::EndOfInput;
        match self.insertion_mode {
            InsertionMode::Initial => {
                self.process_default_for_initial(&token);
                self.process_end_of_input();
            }
            InsertionMode::BeforeHtml => {
                self.process_default_for_before_html();
                self.process_end_of_input();
            }
            InsertionMode::BeforeHead => {
                self.process_default_for_before_head();
                self.process_end_of_input();
            }
            InsertionMode::InHead => {
                self.process_default_for_in_head();
                self.process_end_of_input();
            }
            InsertionMode::InHeadNoscript => {
                self.process_default_for_in_head_noscript(&token);
                self.process_end_of_input();
            }
            InsertionMode::AfterHead => {
                self.process_default_for_after_head();
                self.process_end_of_input();
            }

            InsertionMode::InBody
            | InsertionMode::InTable
            | InsertionMode::InCaption
            | InsertionMode::InColumnGroup
            | InsertionMode::InTableBody
            | InsertionMode::InRow
            | InsertionMode::InCell
            | InsertionMode::InSelect
            | InsertionMode::InSelectInTable => self.process_end_of_input_for_in_body(),

            // [§ 13.2.6.4.8 The "text" insertion mode]
            // "Parse error. If the current node is a script element, then set its
            // already started to true. Pop the current node off the stack of open
            // elements. Switch the insertion mode to the original insertion mode
            // and reprocess the token."
            InsertionMode::Text => {
                self.parse_error(&token);
                let _ = self.open_elements.pop();
                let mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InBody);
                self.switch_to(mode);
                self.process_end_of_input();
            }

            InsertionMode::InTableText => {
                self.process_default_for_in_table_text();
                self.process_end_of_input();
            }

            InsertionMode::InTemplate => self.process_end_of_input_for_in_template(),

            // [§ 13.2.6.4.20 The "in frameset" insertion mode]
            // "If the current node is not the root html element, then this is a
            // parse error."
            InsertionMode::InFrameset => {
                if self.open_elements.len() > 1 {
                    self.parse_error(&token);
                }
                self.stop_parsing();
            }

            // "Stop parsing."
            InsertionMode::AfterBody
            | InsertionMode::AfterFrameset
            | InsertionMode::AfterAfterBody
            | InsertionMode::AfterAfterFrameset => self.stop_parsing(),

            // The dispatcher always hands end of input to the HTML mode.
            InsertionMode::InForeignContent => {
                self.leave_foreign_content();
                self.process_end_of_input();
            }
        }
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "If the stack of template insertion modes is not empty, then process the
    /// token using the rules for the "in template" insertion mode. Otherwise,
    /// follow these steps: ... Stop parsing."
    fn process_end_of_input_for_in_body(&mut self) {
        if !self.template_insertion_modes.is_empty() {
            self.process_end_of_input_for_in_template();
            return;
        }
        self.report_unclosed_elements(&Token::EndOfInput);
        self.stop_parsing();
    }

    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    fn process_end_of_input_for_in_template(&mut self) {
        // "If there is no template element on the stack of open elements, then
        // stop parsing. (fragment case)"
        if !self.open_elements.contains_named("template") {
            self.stop_parsing();
            return;
        }
        // "Otherwise, this is a parse error. Pop elements from the stack of open
        // elements until a template element has been popped from the stack.
        // Clear the list of active formatting elements up to the last marker.
        // Pop the current template insertion mode off the stack of template
        // insertion modes. Reset the insertion mode appropriately. Reprocess the
        // token."
        self.parse_error(&Token::EndOfInput);
        let _ = self.open_elements.pop_until_named("template");
        self.active_formatting_elements.clear_to_last_marker();
        let _ = self.template_insertion_modes.pop();
        self.reset_insertion_mode_appropriately();
        self.process_end_of_input();
    }
}
