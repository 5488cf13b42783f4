use super::insertion_mode::InsertionMode;
use super::quirks::quirks_mode_for_doctype;
use super::sink::TreeSink;
use super::tree_builder::TreeBuilder;
use crate::tokenizer::Token;

impl<S: TreeSink> TreeBuilder<S> {
    /// DOCTYPE tokens. Only the "initial" mode accepts one.
    pub(super) fn process_doctype(&mut self, token: &Token) {
        let Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } = token
        else {
            return;
        };

        match self.insertion_mode {
            // [§ 13.2.6.4.1 The "initial" insertion mode]
            InsertionMode::Initial => {
                // "If the DOCTYPE token's name is not "html", or the token's public
                // identifier is not missing, or the token's system identifier is
                // neither missing nor "about:legacy-compat", then there is a parse error."
                if name.as_deref() != Some("html")
                    || public_identifier.is_some()
                    || system_identifier
                        .as_deref()
                        .is_some_and(|s| s != "about:legacy-compat")
                {
                    self.parse_error(token);
                }

                // "Append a DocumentType node to the Document node, with its name
                // set to the name given in the DOCTYPE token, or the empty string
                // if the name was missing"
                let doctype = self.sink.create_doctype(
                    name.as_deref().unwrap_or(""),
                    public_identifier.as_deref().unwrap_or(""),
                    system_identifier.as_deref().unwrap_or(""),
                );
                let document = self.sink.document();
                self.sink.append_child(document, doctype);

                // "Then, if the document is not an iframe srcdoc document, and the
                // parser cannot change the mode flag is false, and the DOCTYPE token
                // matches one of the conditions in the following list, then set the
                // Document to quirks mode"
                let mode = quirks_mode_for_doctype(
                    name.as_deref(),
                    public_identifier.as_deref(),
                    system_identifier.as_deref(),
                    *force_quirks,
                );
                self.quirks_mode = mode;
                self.sink.set_quirks_mode(mode);

                // "Then, switch the insertion mode to "before html"."
                self.switch_to(InsertionMode::BeforeHtml);
            }
            // "in table text": flush, then reprocess in the original mode.
            InsertionMode::InTableText => {
                self.process_default_for_in_table_text();
                self.process_doctype(token);
            }
            // "A DOCTYPE token: Parse error. Ignore the token."
            _ => self.parse_error(token),
        }
    }

    /// Comment tokens.
    pub(super) fn process_comment(&mut self, data: &str) {
        match self.insertion_mode {
            // "Insert a comment as the last child of the Document object."
            InsertionMode::Initial
            | InsertionMode::BeforeHtml
            | InsertionMode::AfterAfterBody
            | InsertionMode::AfterAfterFrameset => self.insert_comment_on_document(data),

            // [§ 13.2.6.4.19 The "after body" insertion mode]
            // "Insert a comment as the last child of the first element in the
            // stack of open elements (the html element)."
            InsertionMode::AfterBody => self.insert_comment_on_root(data),

            InsertionMode::InTableText => {
                self.process_default_for_in_table_text();
                self.process_comment(data);
            }

            // "A comment token: Insert a comment."
            _ => self.insert_comment(data),
        }
    }
}
