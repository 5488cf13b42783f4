use arbor_dom::{Namespace, QuirksMode};

use super::formatting::{ActiveFormattingList, FormattingEntry};
use super::insertion_mode::InsertionMode;
use super::issues::{ErrorContext, ParseErrorReporter};
use super::open_elements::OpenElementStack;
use super::sink::TreeSink;
use super::tags::{FOSTER_TARGETS, IMPLIED_END_TAGS, THOROUGH_IMPLIED_END_TAGS};
use crate::error::TreeBuilderError;
use crate::tokenizer::{Tag, Token, TokenizerState};

/// What the driver should do after [`TreeBuilder::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Feed the next token.
    Continue,
    /// Switch the tokenizer to this state, then feed the next token.
    SwitchTokenizer(TokenizerState),
    /// A script end tag parked its script; call
    /// [`TreeBuilder::take_parked_script`] and [`TreeBuilder::resume`].
    Paused,
}

/// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
///
/// "the appropriate place for inserting a node": a parent and an optional
/// sibling to insert before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct InsertionPlace<H> {
    pub(super) parent: H,
    pub(super) before: Option<H>,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The tree construction stage. Consumes one token at a time and writes the
/// resulting document into a [`TreeSink`].
pub struct TreeBuilder<S: TreeSink> {
    pub(super) sink: S,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    /// "the original insertion mode", saved for the text detour.
    pub(super) original_insertion_mode: Option<InsertionMode>,

    /// HTML mode to go back to when foreign content ends.
    pub(super) secondary_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    pub(super) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(super) open_elements: OpenElementStack<S::Handle>,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(super) active_formatting_elements: ActiveFormattingList<S::Handle>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head_element_pointer: Option<S::Handle>,

    /// The open `form`, if any. Cleared once that element leaves the stack.
    pub(super) form_element_pointer: Option<S::Handle>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    pub(super) frameset_ok: bool,

    /// Set while the in-table "anything else" rule runs the in-body rules.
    pub(super) foster_parenting: bool,

    /// [§ 13.2.4.5](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    pub(super) scripting_enabled: bool,

    pub(super) quirks_mode: QuirksMode,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    /// "pending table character tokens"
    pub(super) pending_table_characters: String,

    /// Set after `pre`, `listing` and `textarea`: "If the next token is a
    /// U+000A LINE FEED (LF) character token, then ignore that token".
    pub(super) ignore_next_line_feed: bool,

    /// Line of the last `script` start tag, parked alongside it on pause.
    pub(super) script_start_line: usize,

    pub(super) stopped: bool,

    reporter: Option<Box<dyn ParseErrorReporter>>,
    paused: bool,
    parked_script: Option<(S::Handle, usize)>,
    pub(super) current_line: usize,
    tokenizer_request: Option<TokenizerState>,
}

impl<S: TreeSink> TreeBuilder<S> {
    /// A builder in the "initial" insertion mode writing into `sink`.
    /// Scripting is enabled.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            secondary_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            open_elements: OpenElementStack::new(),
            active_formatting_elements: ActiveFormattingList::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            // "The frameset-ok flag is set to "ok" when the parser is created."
            frameset_ok: true,
            foster_parenting: false,
            scripting_enabled: true,
            quirks_mode: QuirksMode::NoQuirks,
            pending_table_characters: String::new(),
            ignore_next_line_feed: false,
            script_start_line: 0,
            stopped: false,
            reporter: None,
            paused: false,
            parked_script: None,
            current_line: 1,
            tokenizer_request: None,
        }
    }

    /// "The scripting flag is set to "enabled" if scripting was enabled for
    /// the Document with which the parser is associated". Decides how
    /// `noscript` is parsed.
    pub fn set_scripting_enabled(&mut self, enabled: bool) {
        self.scripting_enabled = enabled;
    }

    /// Install a parse error reporter.
    pub fn set_reporter(&mut self, reporter: Box<dyn ParseErrorReporter>) {
        self.reporter = Some(reporter);
    }

    /// Tell the builder which source line the next token comes from.
    pub fn set_line(&mut self, line: usize) {
        self.current_line = line;
    }

    /// Process exactly one token.
    ///
    /// Malformed markup is never an error here; `Err` only signals that the
    /// builder is paused and must be resumed first.
    ///
    /// # Errors
    ///
    /// [`TreeBuilderError::Paused`] while a script is parked.
    pub fn process(&mut self, token: &Token) -> Result<ProcessOutcome, TreeBuilderError> {
        if self.paused {
            return Err(TreeBuilderError::Paused);
        }
        if self.stopped {
            return Ok(ProcessOutcome::Continue);
        }
        self.tokenizer_request = None;

        if std::mem::take(&mut self.ignore_next_line_feed)
            && matches!(token, Token::Character { data: '\n' })
        {
            return Ok(ProcessOutcome::Continue);
        }

        let root_existed = !self.open_elements.is_empty();
        self.dispatch(token);
        let _ = self.open_form_element();
        debug_assert!(
            self.stopped || !root_existed || !self.open_elements.is_empty(),
            "the stack of open elements emptied before end of input"
        );

        if self.paused {
            return Ok(ProcessOutcome::Paused);
        }
        Ok(self
            .tokenizer_request
            .take()
            .map_or(ProcessOutcome::Continue, ProcessOutcome::SwitchTokenizer))
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// Routes the token to the handler for its kind. While in foreign content,
    /// tokens that the dispatcher sends to HTML rules (start tags and text at
    /// integration points, end of input) are handled in the secondary mode.
    fn dispatch(&mut self, token: &Token) {
        if self.insertion_mode == InsertionMode::InForeignContent
            && !self.token_uses_foreign_rules(token)
        {
            self.leave_foreign_content();
        }

        match token {
            Token::Doctype { .. } => self.process_doctype(token),
            Token::StartTag(tag) => self.process_start_tag(tag),
            Token::EndTag(tag) => self.process_end_tag(tag),
            Token::Comment { data } => self.process_comment(data),
            Token::Character { data } => self.process_character(*data),
            Token::EndOfInput => self.process_end_of_input(),
        }

        self.sync_foreign_content_mode();
    }

    // ===== Pause / resume =====

    /// Whether the builder waits for a parked script.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// The script that caused the pause and the 1-based line of its start tag.
    /// Returns `Some` once per pause.
    pub fn take_parked_script(&mut self) -> Option<(S::Handle, usize)> {
        self.parked_script.take()
    }

    /// Leave the paused state so tokens are accepted again.
    ///
    /// # Errors
    ///
    /// [`TreeBuilderError::NotPaused`] when the builder is running.
    pub fn resume(&mut self) -> Result<(), TreeBuilderError> {
        if !self.paused {
            return Err(TreeBuilderError::NotPaused);
        }
        log::debug!("resuming after script at line {}", self.script_start_line);
        self.paused = false;
        Ok(())
    }

    /// Park `script` and stop accepting tokens.
    pub(super) fn pause(&mut self, script: S::Handle) {
        log::debug!("pausing for script from line {}", self.script_start_line);
        self.paused = true;
        self.parked_script = Some((script, self.script_start_line));
    }

    // ===== Accessors =====

    /// Current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }

    /// The mode saved before the text detour.
    #[must_use]
    pub const fn original_insertion_mode(&self) -> Option<InsertionMode> {
        self.original_insertion_mode
    }

    /// The HTML mode held while in foreign content.
    #[must_use]
    pub const fn secondary_insertion_mode(&self) -> Option<InsertionMode> {
        self.secondary_insertion_mode
    }

    /// The stack of open elements.
    #[must_use]
    pub const fn open_elements(&self) -> &OpenElementStack<S::Handle> {
        &self.open_elements
    }

    /// The list of active formatting elements.
    #[must_use]
    pub const fn active_formatting_elements(&self) -> &ActiveFormattingList<S::Handle> {
        &self.active_formatting_elements
    }

    /// The `head` element, once created.
    #[must_use]
    pub const fn head_element(&self) -> Option<S::Handle> {
        self.head_element_pointer
    }

    /// The open `form` element, if any.
    #[must_use]
    pub const fn form_element(&self) -> Option<S::Handle> {
        self.form_element_pointer
    }

    /// Whether the frameset-ok flag is still "ok".
    #[must_use]
    pub const fn frameset_ok(&self) -> bool {
        self.frameset_ok
    }

    /// Document mode chosen from the DOCTYPE.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// Whether end of input has been handled.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The sink being written to.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Hand back the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    // ===== Bookkeeping =====

    /// Change the insertion mode.
    pub(super) fn switch_to(&mut self, mode: InsertionMode) {
        if self.insertion_mode != mode {
            log::trace!("insertion mode: {} -> {}", self.insertion_mode, mode);
        }
        self.insertion_mode = mode;
    }

    /// Ask the driver to switch the tokenizer after this token.
    pub(super) fn request_tokenizer_state(&mut self, state: TokenizerState) {
        self.tokenizer_request = Some(state);
    }

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    pub(super) fn parse_error(&mut self, token: &Token) {
        log::debug!(
            "parse error at line {}: unexpected {token} in {}",
            self.current_line,
            self.insertion_mode
        );
        let context = ErrorContext {
            mode: self.insertion_mode,
            line: self.current_line,
        };
        if let Some(reporter) = self.reporter.as_mut() {
            reporter.report_error(token, context);
        }
    }

    pub(super) fn unexpected_start_tag(&mut self, tag: &Tag) {
        self.parse_error(&Token::StartTag(tag.clone()));
    }

    pub(super) fn unexpected_end_tag(&mut self, tag: &Tag) {
        self.parse_error(&Token::EndTag(tag.clone()));
    }

    pub(super) fn unexpected_character(&mut self, c: char) {
        self.parse_error(&Token::Character { data: c });
    }

    /// The form element pointer, cleared first if that form was closed.
    pub(super) fn open_form_element(&mut self) -> Option<S::Handle> {
        if let Some(form) = self.form_element_pointer
            && !self.open_elements.contains(form)
        {
            self.form_element_pointer = None;
        }
        self.form_element_pointer
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// "Stop parsing": "Pop all the nodes off the stack of open elements."
    pub(super) fn stop_parsing(&mut self) {
        log::debug!("stopped parsing in {}", self.insertion_mode);
        self.open_elements.truncate(0);
        self.stopped = true;
    }

    // ===== Creating and inserting nodes =====

    /// The root `html` element: bottom of the stack.
    pub(super) fn root_element(&self) -> Option<S::Handle> {
        self.open_elements.get(0).map(|entry| entry.handle)
    }

    pub(super) fn is_foster_target(&self, handle: S::Handle) -> bool {
        self.sink.namespace(handle) == Namespace::Html
            && FOSTER_TARGETS.contains(&self.sink.tag_name(handle))
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target"
    pub(super) fn appropriate_insertion_place(
        &self,
        override_target: Option<S::Handle>,
    ) -> InsertionPlace<S::Handle> {
        // STEP 1: "If there was an override target specified, then let target be
        // the override target. Otherwise, let target be the current node."
        let target = override_target
            .or_else(|| self.open_elements.current())
            .unwrap_or_else(|| self.sink.document());

        // STEP 2: "If foster parenting is enabled and target is a table, tbody,
        // tfoot, thead, or tr element"
        if self.foster_parenting && self.is_foster_target(target) {
            return self.foster_parent_place();
        }

        // "Otherwise: Let adjusted insertion location be inside target, after
        // its last child (if any)."
        InsertionPlace {
            parent: target,
            before: None,
        }
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    ///
    /// The foster-parenting substeps of the appropriate place.
    pub(super) fn foster_parent_place(&self) -> InsertionPlace<S::Handle> {
        // "Let last template be the last template element in the stack of open
        // elements, if any."
        let last_template = self.open_elements.last_position_of("template");
        // "Let last table be the last table element in the stack of open
        // elements, if any."
        let last_table = self.open_elements.last_position_of("table");

        // "If there is a last template and either there is no last table, or
        // there is one, but last template is lower (more recently added) than
        // last table in the stack of open elements, then: let adjusted
        // insertion location be inside last template's template contents"
        if let Some(template) = last_template
            && last_table.is_none_or(|table| template > table)
        {
            return self.append_place_at(template);
        }

        // "If there is no last table, then let adjusted insertion location be
        // inside the first element in the stack of open elements (the html
        // element), after its last child (if any)"
        let Some(table_index) = last_table else {
            return self.append_place_at(0);
        };

        // "If last table has a parent node, then let adjusted insertion location
        // be inside last table's parent node, immediately before last table"
        let table = self
            .open_elements
            .get(table_index)
            .map(|entry| entry.handle);
        if let Some(table) = table
            && let Some(parent) = self.sink.parent(table)
        {
            return InsertionPlace {
                parent,
                before: Some(table),
            };
        }

        // "Let previous element be the element immediately above last table in
        // the stack of open elements. Let adjusted insertion location be inside
        // previous element, after its last child (if any)."
        self.append_place_at(table_index.saturating_sub(1))
    }

    fn append_place_at(&self, index: usize) -> InsertionPlace<S::Handle> {
        let parent = self
            .open_elements
            .get(index)
            .map_or_else(|| self.sink.document(), |entry| entry.handle);
        InsertionPlace {
            parent,
            before: None,
        }
    }

    pub(super) fn insert_node_at(&mut self, place: InsertionPlace<S::Handle>, node: S::Handle) {
        match place.before {
            Some(reference) => self.sink.insert_before(place.parent, node, reference),
            None => self.sink.append_child(place.parent, node),
        }
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "Let the adjusted insertion location be the appropriate place for
    /// inserting a node. Let element be the result of creating an element for
    /// the token in the given namespace... insert element at the adjusted
    /// insertion location... Push element onto the stack of open elements so
    /// that it is the new current node."
    pub(super) fn insert_element(&mut self, tag: &Tag, namespace: Namespace) -> S::Handle {
        let place = self.appropriate_insertion_place(None);
        let element = self
            .sink
            .create_element(&tag.name, namespace, &tag.attributes);
        self.insert_node_at(place, element);
        self.open_elements.push(element, &tag.name, namespace);
        element
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    pub(super) fn insert_html_element(&mut self, tag: &Tag) -> S::Handle {
        self.insert_element(tag, Namespace::Html)
    }

    /// Insert an HTML element "for a "name" start tag token with no attributes".
    pub(super) fn insert_synthesized_element(&mut self, name: &str) -> S::Handle {
        self.insert_html_element(&Tag::new(name))
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(super) fn insert_character(&mut self, c: char) {
        let place = self.appropriate_insertion_place(None);
        // "If the adjusted insertion location is in a Document node, then return."
        if place.parent == self.sink.document() {
            return;
        }
        let mut buffer = [0; 4];
        let text = c.encode_utf8(&mut buffer);
        match place.before {
            Some(reference) => self.sink.insert_text_before(place.parent, text, reference),
            None => self.sink.append_text(place.parent, text),
        }
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    /// at the appropriate place.
    pub(super) fn insert_comment(&mut self, data: &str) {
        let place = self.appropriate_insertion_place(None);
        let comment = self.sink.create_comment(data);
        self.insert_node_at(place, comment);
    }

    /// "Insert a comment as the last child of the Document object."
    pub(super) fn insert_comment_on_document(&mut self, data: &str) {
        let document = self.sink.document();
        let comment = self.sink.create_comment(data);
        self.sink.append_child(document, comment);
    }

    /// "Insert a comment as the last child of the first element in the stack of
    /// open elements (the html element)."
    pub(super) fn insert_comment_on_root(&mut self, data: &str) {
        let parent = self
            .root_element()
            .unwrap_or_else(|| self.sink.document());
        let comment = self.sink.create_comment(data);
        self.sink.append_child(parent, comment);
    }

    // ===== Closing elements =====

    /// [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "generate implied end tags", optionally "except for" one name.
    pub(super) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        while let Some(top) = self.open_elements.top() {
            let implied = top.is_html_one_of(IMPLIED_END_TAGS)
                && except.is_none_or(|name| !top.is_html(name));
            if !implied {
                break;
            }
            let _ = self.open_elements.pop();
        }
    }

    /// "generate all implied end tags thoroughly"
    pub(super) fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while self.open_elements.current_is_one_of(THOROUGH_IMPLIED_END_TAGS) {
            let _ = self.open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "close a p element"
    pub(super) fn close_p_element(&mut self) {
        // STEP 1: "Generate implied end tags, except for p elements."
        self.generate_implied_end_tags(Some("p"));
        // STEP 2: "If the current node is not a p element, then this is a parse error."
        if !self.open_elements.current_is("p") {
            self.parse_error(&Token::end_tag("p"));
        }
        // STEP 3: "Pop elements from the stack of open elements until a p
        // element has been popped from the stack."
        let _ = self.open_elements.pop_until_named("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(super) fn close_p_element_in_button_scope(&mut self) {
        if self
            .open_elements
            .has_in_scope("p", super::open_elements::Scope::Button)
        {
            self.close_p_element();
        }
    }

    /// Pop the current node while it is not one of `names` (HTML).
    pub(super) fn clear_stack_back_to(&mut self, names: &[&str]) {
        while !self.open_elements.is_empty() && !self.open_elements.current_is_one_of(names) {
            let _ = self.open_elements.pop();
        }
    }

    /// "clear the stack back to a table context"
    pub(super) fn clear_stack_back_to_table_context(&mut self) {
        self.clear_stack_back_to(&["table", "template", "html"]);
    }

    /// "clear the stack back to a table body context"
    pub(super) fn clear_stack_back_to_table_body_context(&mut self) {
        self.clear_stack_back_to(&["tbody", "tfoot", "thead", "template", "html"]);
    }

    /// "clear the stack back to a table row context"
    pub(super) fn clear_stack_back_to_table_row_context(&mut self) {
        self.clear_stack_back_to(&["tr", "template", "html"]);
    }

    // ===== Active formatting elements =====

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "reconstruct the active formatting elements, if any"
    pub(super) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        // elements, then there is nothing to reconstruct; stop this algorithm."
        let len = self.active_formatting_elements.len();
        if len == 0 {
            return;
        }

        // STEP 2: "If the last (most recently added) entry in the list of active
        // formatting elements is a marker, or if it is an element that is in the
        // stack of open elements, then there is nothing to reconstruct"
        if self.entry_is_marker_or_open(len - 1) {
            return;
        }

        // STEP 3-6: "Rewind": walk back until an entry before us is a marker
        // or an open element, or we reach the start of the list.
        let mut index = len - 1;
        while index > 0 && !self.entry_is_marker_or_open(index - 1) {
            index -= 1;
        }

        // STEP 7-10: "Advance" / "Create": insert an HTML element for the
        // token each entry was created for, and replace the entry.
        for i in index..len {
            let Some(tag) = self.active_formatting_elements.tag_at(i).cloned() else {
                continue;
            };
            let element = self.insert_html_element(&tag);
            self.active_formatting_elements.replace(i, element);
        }
    }

    fn entry_is_marker_or_open(&self, index: usize) -> bool {
        match self.active_formatting_elements.get(index) {
            Some(FormattingEntry::Element { handle, .. }) => self.open_elements.contains(*handle),
            Some(FormattingEntry::Marker) | None => true,
        }
    }

    /// Insert an HTML element for `tag` and push it onto the list of active
    /// formatting elements.
    pub(super) fn insert_formatting_element(&mut self, tag: &Tag) {
        let element = self.insert_html_element(tag);
        self.active_formatting_elements.push(element, tag.clone());
    }

    // ===== Insertion mode bookkeeping =====

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    ///
    /// "reset the insertion mode appropriately"
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        let mode = self.appropriate_insertion_mode();
        self.secondary_insertion_mode = None;
        self.switch_to(mode);
        self.sync_foreign_content_mode();
    }

    fn appropriate_insertion_mode(&self) -> InsertionMode {
        let entries: Vec<_> = self.open_elements.iter().collect();
        for (index, entry) in entries.iter().enumerate().rev() {
            // "If node is the first node in the stack of open elements, then set
            // last to true"
            let last = index == 0;
            if entry.namespace != Namespace::Html {
                if last {
                    return InsertionMode::InBody;
                }
                continue;
            }
            match entry.name.as_str() {
                // "If node is a select element, run these substeps"
                "select" => {
                    if !last {
                        for ancestor in entries[..index].iter().rev() {
                            if ancestor.is_html("template") {
                                break;
                            }
                            if ancestor.is_html("table") {
                                return InsertionMode::InSelectInTable;
                            }
                        }
                    }
                    return InsertionMode::InSelect;
                }
                "td" | "th" if !last => return InsertionMode::InCell,
                "tr" => return InsertionMode::InRow,
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                "caption" => return InsertionMode::InCaption,
                "colgroup" => return InsertionMode::InColumnGroup,
                "table" => return InsertionMode::InTable,
                // "switch the insertion mode to the current template insertion mode"
                "template" => {
                    return self
                        .template_insertion_modes
                        .last()
                        .copied()
                        .unwrap_or(InsertionMode::InTemplate);
                }
                "head" if !last => return InsertionMode::InHead,
                "body" => return InsertionMode::InBody,
                "frameset" => return InsertionMode::InFrameset,
                "html" => {
                    return if self.head_element_pointer.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                }
                _ if last => return InsertionMode::InBody,
                _ => {}
            }
        }
        InsertionMode::InBody
    }

    /// [§ 13.2.6.4.8](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "generic raw text element parsing algorithm" (RAWTEXT) and
    /// "generic RCDATA element parsing algorithm".
    pub(super) fn parse_generic_text_element(&mut self, tag: &Tag, state: TokenizerState) {
        // STEP 1: "Insert an HTML element for the token."
        let _ = self.insert_html_element(tag);
        // STEP 2: "switch the tokenizer to the RAWTEXT state" / "RCDATA state"
        self.request_tokenizer_state(state);
        // STEP 3: "Let the original insertion mode be the current insertion mode."
        self.original_insertion_mode = Some(self.insertion_mode);
        // STEP 4: "Then, switch the insertion mode to "text"."
        self.switch_to(InsertionMode::Text);
    }

    // ===== Foreign content bookkeeping =====

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    ///
    /// Whether the rules for foreign content apply to `token` given the
    /// current node.
    fn token_uses_foreign_rules(&self, token: &Token) -> bool {
        use super::tags::{is_html_integration_point, is_mathml_text_integration_point};

        let Some(top) = self.open_elements.top() else {
            return false;
        };
        if top.namespace == Namespace::Html {
            return false;
        }
        let start_tag = match token {
            Token::StartTag(tag) => Some(tag.name.as_str()),
            _ => None,
        };
        let character = matches!(token, Token::Character { .. });

        // "If the adjusted current node is a MathML text integration point and
        // the token is a start tag whose tag name is neither "mglyph" nor
        // "malignmark"" / "...and the token is a character token"
        if is_mathml_text_integration_point(&top.name, top.namespace)
            && (character || start_tag.is_some_and(|n| n != "mglyph" && n != "malignmark"))
        {
            return false;
        }
        // "If the adjusted current node is a MathML annotation-xml element and
        // the token is a start tag whose tag name is "svg""
        if top.namespace == Namespace::MathMl
            && top.name == "annotation-xml"
            && start_tag == Some("svg")
        {
            return false;
        }
        // "If the adjusted current node is an HTML integration point and the
        // token is a start tag" / "...and the token is a character token"
        if is_html_integration_point(&top.name, top.namespace)
            && (character || start_tag.is_some())
        {
            return false;
        }
        // "If the token is an end-of-file token"
        !token.is_end_of_input()
    }

    /// Enter or leave "in foreign content" to match the current node.
    ///
    /// Foreign content is active exactly while the current node is an SVG or
    /// MathML element; the HTML mode in force is kept as the secondary mode.
    pub(super) fn sync_foreign_content_mode(&mut self) {
        if self.stopped {
            return;
        }
        let top_is_foreign = self
            .open_elements
            .top()
            .is_some_and(|entry| entry.namespace != Namespace::Html);
        match self.insertion_mode {
            InsertionMode::InForeignContent if !top_is_foreign => self.leave_foreign_content(),
            InsertionMode::InForeignContent | InsertionMode::Text | InsertionMode::InTableText => {}
            mode if top_is_foreign => {
                self.secondary_insertion_mode = Some(mode);
                self.switch_to(InsertionMode::InForeignContent);
            }
            _ => {}
        }
    }

    /// Go back to the secondary (HTML) insertion mode.
    pub(super) fn leave_foreign_content(&mut self) {
        let mode = self
            .secondary_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
        self.switch_to(mode);
    }
}
