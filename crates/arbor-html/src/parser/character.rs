use super::insertion_mode::InsertionMode;
use super::sink::TreeSink;
use super::tags::{TABLE_TEXT_PARENTS, is_whitespace};
use super::tree_builder::TreeBuilder;
use crate::tokenizer::Token;

impl<S: TreeSink> TreeBuilder<S> {
    /// Character tokens.
    pub(super) fn process_character(&mut self, c: char) {
        let token = Token::Character { data: c };
        match self.insertion_mode {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE: Ignore the token."
            InsertionMode::Initial if is_whitespace(c) => {}
            InsertionMode::Initial => {
                self.process_default_for_initial(&token);
                self.process_character(c);
            }

            InsertionMode::BeforeHtml if is_whitespace(c) => {}
            InsertionMode::BeforeHtml => {
                self.process_default_for_before_html();
                self.process_character(c);
            }

            InsertionMode::BeforeHead if is_whitespace(c) => {}
            InsertionMode::BeforeHead => {
                self.process_default_for_before_head();
                self.process_character(c);
            }

            // "Insert the character."
            InsertionMode::InHead | InsertionMode::AfterHead | InsertionMode::InColumnGroup
                if is_whitespace(c) =>
            {
                self.insert_character(c);
            }
            InsertionMode::InHead => {
                self.process_default_for_in_head();
                self.process_character(c);
            }
            InsertionMode::AfterHead => {
                self.process_default_for_after_head();
                self.process_character(c);
            }
            InsertionMode::InColumnGroup => {
                if self.process_default_for_in_column_group(&token) {
                    self.process_character(c);
                }
            }

            // "Process the token using the rules for the "in head" insertion mode."
            InsertionMode::InHeadNoscript if is_whitespace(c) => self.insert_character(c),
            InsertionMode::InHeadNoscript => {
                self.process_default_for_in_head_noscript(&token);
                self.process_character(c);
            }

            InsertionMode::InBody
            | InsertionMode::InCaption
            | InsertionMode::InCell
            | InsertionMode::InTemplate => self.process_character_for_in_body(c),

            // [§ 13.2.6.4.8 The "text" insertion mode]
            // "Insert the token's character."
            InsertionMode::Text => self.insert_character(c),

            InsertionMode::InTable | InsertionMode::InTableBody | InsertionMode::InRow => {
                self.process_character_for_in_table(c);
            }

            // [§ 13.2.6.4.10 The "in table text" insertion mode]
            InsertionMode::InTableText => {
                // "U+0000 NULL: Parse error. Ignore the token."
                if c == '\0' {
                    self.parse_error(&token);
                } else {
                    // "Append the character token to the pending table character
                    // tokens list."
                    self.pending_table_characters.push(c);
                }
            }

            // [§ 13.2.6.4.16 The "in select" insertion mode]
            InsertionMode::InSelect | InsertionMode::InSelectInTable => {
                if c == '\0' {
                    self.parse_error(&token);
                } else {
                    self.insert_character(c);
                }
            }

            // [§ 13.2.6.4.19 The "after body" insertion mode]
            // "Process the token using the rules for the "in body" insertion mode."
            InsertionMode::AfterBody | InsertionMode::AfterAfterBody if is_whitespace(c) => {
                self.process_character_for_in_body(c);
            }
            InsertionMode::AfterBody | InsertionMode::AfterAfterBody => {
                self.process_default_for_after_body(&token);
                self.process_character(c);
            }

            // [§ 13.2.6.4.20 The "in frameset" insertion mode]
            InsertionMode::InFrameset | InsertionMode::AfterFrameset if is_whitespace(c) => {
                self.insert_character(c);
            }
            InsertionMode::AfterAfterFrameset if is_whitespace(c) => {
                self.process_character_for_in_body(c);
            }
            // "Parse error. Ignore the token."
            InsertionMode::InFrameset
            | InsertionMode::AfterFrameset
            | InsertionMode::AfterAfterFrameset => self.parse_error(&token),

            InsertionMode::InForeignContent => self.process_character_in_foreign_content(c),
        }
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(super) fn process_character_for_in_body(&mut self, c: char) {
        // "A character token that is U+0000 NULL: Parse error. Ignore the token."
        if c == '\0' {
            self.unexpected_character(c);
            return;
        }
        // "Reconstruct the active formatting elements, if any. Insert the
        // token's character."
        self.reconstruct_active_formatting_elements();
        self.insert_character(c);
        // "Any other character token: ... Set the frameset-ok flag to "not ok"."
        if !is_whitespace(c) {
            self.frameset_ok = false;
        }
    }

    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    fn process_character_for_in_table(&mut self, c: char) {
        // "A character token, if the current node is table, tbody, template,
        // tfoot, thead, or tr element"
        if self.open_elements.current_is_one_of(TABLE_TEXT_PARENTS) {
            // "Let the pending table character tokens be an empty list of tokens.
            // Let the original insertion mode be the current insertion mode.
            // Switch the insertion mode to "in table text" and reprocess the token."
            self.pending_table_characters.clear();
            self.original_insertion_mode = Some(self.insertion_mode);
            self.switch_to(InsertionMode::InTableText);
            self.process_character(c);
            return;
        }

        // "Anything else: Parse error. Enable foster parenting, process the token
        // using the rules for the "in body" insertion mode, and then disable
        // foster parenting."
        self.unexpected_character(c);
        self.foster_parenting = true;
        self.process_character_for_in_body(c);
        self.foster_parenting = false;
    }
}
