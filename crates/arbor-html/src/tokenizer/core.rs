use std::collections::VecDeque;

use strum_macros::Display;

use super::token::{Attribute, Tag, Token};

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The content states the tree builder can put the tokenizer in. Tag, comment
/// and DOCTYPE sub-states are internal to each lexing routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    #[default]
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    RCDATA,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RAWTEXT,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    PLAINTEXT,
}

/// A lazy, finite producer of tokens the tree builder pulls from.
pub trait TokenSource {
    /// The next token, or `None` once the end-of-input token has been produced.
    fn next_token(&mut self) -> Option<Token>;

    /// 1-based line of the token most recently returned by [`Self::next_token`].
    fn current_line(&self) -> usize;

    /// Switch to a content state requested by the tree builder.
    fn switch_to(&mut self, state: TokenizerState);
}

/// Reference HTML tokenizer.
///
/// Produces tokens one at a time, so the tree builder can change the lexing
/// state between a start tag and the text that follows it. Character
/// references are passed through untouched.
pub struct HTMLTokenizer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    token_line: usize,
    state: TokenizerState,
    /// "The last start tag token emitted", used for the appropriate end tag check.
    last_start_tag_name: Option<String>,
    pending: VecDeque<Token>,
    emitted_eof: bool,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream):
    /// "the user agent must normalize newlines by replacing every U+000D CR
    /// U+000A LF code point pair with a single U+000A LF code point, and then
    /// replacing every remaining U+000D CR code point with a U+000A LF code point."
    #[must_use]
    pub fn new(input: &str) -> Self {
        let input = input.replace("\r\n", "\n").replace('\r', "\n");
        Self {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            token_line: 1,
            state: TokenizerState::Data,
            last_start_tag_name: None,
            pending: VecDeque::new(),
            emitted_eof: false,
        }
    }

    /// Current content state.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Tokenize the whole input in the data state, ignoring state requests.
    ///
    /// Useful for inspecting token streams; the tree builder drives
    /// [`TokenSource`] instead.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.collect()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip(&mut self, count: usize) {
        for _ in 0..count {
            let _ = self.consume();
        }
    }

    /// "If the next few characters are an ASCII case-insensitive match for..."
    fn next_few_characters_are_case_insensitive(&self, offset: usize, target: &str) -> bool {
        target
            .chars()
            .enumerate()
            .all(|(i, t)| self.peek(offset + i).is_some_and(|c| c.eq_ignore_ascii_case(&t)))
    }

    fn skip_whitespace(&mut self) {
        while self.peek(0).is_some_and(is_whitespace_char) {
            let _ = self.consume();
        }
    }

    /// Consume up to and including `terminator`, returning what came before it.
    /// Runs to the end of input when the terminator never appears.
    fn consume_until(&mut self, terminator: &str) -> String {
        let mut data = String::new();
        loop {
            if self.next_few_characters_are_case_insensitive(0, terminator) {
                self.skip(terminator.chars().count());
                return data;
            }
            match self.consume() {
                Some(c) => data.push(c),
                None => return data,
            }
        }
    }

    fn produce(&mut self) -> Token {
        match self.state {
            TokenizerState::Data => self.lex_data(),
            TokenizerState::PLAINTEXT => self.lex_plaintext(),
            TokenizerState::RCDATA | TokenizerState::RAWTEXT | TokenizerState::ScriptData => {
                self.lex_raw_text()
            }
        }
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn lex_data(&mut self) -> Token {
        loop {
            self.token_line = self.line;
            let Some(c) = self.consume() else {
                return Token::EndOfInput;
            };
            if c != '<' {
                return Token::Character { data: c };
            }
            if let Some(token) = self.lex_tag_open() {
                return token;
            }
        }
    }

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    ///
    /// Called after the `<`. `None` means the markup produced nothing (`</>`).
    fn lex_tag_open(&mut self) -> Option<Token> {
        match self.peek(0) {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            Some('!') => {
                self.skip(1);
                Some(self.lex_markup_declaration())
            }
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.lex_end_tag_open(),
            // "ASCII alpha - Create a new start tag token"
            Some(c) if c.is_ascii_alphabetic() => {
                let tag = self.lex_tag()?;
                self.last_start_tag_name = Some(tag.name.clone());
                Some(Token::StartTag(tag))
            }
            // "U+003F QUESTION MARK (?) - This is an unexpected-question-mark-instead-of-tag-name
            // parse error. Create a comment token whose data is the empty string.
            // Reconsume in the bogus comment state."
            Some('?') => Some(Token::Comment {
                data: self.consume_until(">"),
            }),
            // "Anything else - This is an invalid-first-character-of-tag-name parse error.
            // Emit a U+003C LESS-THAN SIGN character token."
            _ => Some(Token::Character { data: '<' }),
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn lex_end_tag_open(&mut self) -> Option<Token> {
        self.skip(1);
        match self.peek(0) {
            Some(c) if c.is_ascii_alphabetic() => self.lex_tag().map(Token::EndTag),
            // "U+003E GREATER-THAN SIGN (>) - missing-end-tag-name parse error.
            // Switch to the data state."
            Some('>') => {
                self.skip(1);
                None
            }
            // "EOF - eof-before-tag-name parse error. Emit a U+003C LESS-THAN SIGN
            // character token, a U+002F SOLIDUS character token and an end-of-file token."
            None => {
                self.pending.push_back(Token::Character { data: '/' });
                Some(Token::Character { data: '<' })
            }
            // "Anything else - invalid-first-character-of-tag-name parse error.
            // Create a comment token... Reconsume in the bogus comment state."
            Some(_) => Some(Token::Comment {
                data: self.consume_until(">"),
            }),
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn lex_markup_declaration(&mut self) -> Token {
        // "Two U+002D HYPHEN-MINUS characters (-)"
        if self.peek(0) == Some('-') && self.peek(1) == Some('-') {
            self.skip(2);
            return self.lex_comment();
        }
        // "ASCII case-insensitive match for the word "DOCTYPE""
        if self.next_few_characters_are_case_insensitive(0, "doctype") {
            self.skip(7);
            return self.lex_doctype();
        }
        // "Anything else - incorrectly-opened-comment parse error. Create a comment
        // token whose data is the empty string. Switch to the bogus comment state."
        Token::Comment {
            data: self.consume_until(">"),
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn lex_comment(&mut self) -> Token {
        // "U+003E GREATER-THAN SIGN (>) - abrupt-closing-of-empty-comment parse error."
        if self.peek(0) == Some('>') {
            self.skip(1);
            return Token::comment("");
        }
        if self.peek(0) == Some('-') && self.peek(1) == Some('>') {
            self.skip(2);
            return Token::comment("");
        }
        let mut data = String::new();
        loop {
            if self.peek(0) == Some('-') && self.peek(1) == Some('-') {
                // "--!>" also closes a comment (incorrectly-closed-comment).
                if self.peek(2) == Some('>') {
                    self.skip(3);
                    return Token::Comment { data };
                }
                if self.peek(2) == Some('!') && self.peek(3) == Some('>') {
                    self.skip(4);
                    return Token::Comment { data };
                }
            }
            match self.consume() {
                Some(c) => data.push(c),
                // "EOF - eof-in-comment parse error. Emit the comment."
                None => return Token::Comment { data },
            }
        }
    }

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn lex_doctype(&mut self) -> Token {
        let mut force_quirks = false;
        self.skip_whitespace();

        // [§ 13.2.5.55 DOCTYPE name state]
        // "ASCII upper alpha - Append the lowercase version..."
        let mut name = String::new();
        while let Some(c) = self.peek(0) {
            if is_whitespace_char(c) || c == '>' {
                break;
            }
            let _ = self.consume();
            name.push(c.to_ascii_lowercase());
        }
        let name = if name.is_empty() {
            // "missing-doctype-name parse error... Set the current token's
            // force-quirks flag to on."
            force_quirks = true;
            None
        } else {
            Some(name)
        };

        let mut public_identifier = None;
        let mut system_identifier = None;
        self.skip_whitespace();
        if self.next_few_characters_are_case_insensitive(0, "public") {
            self.skip(6);
            public_identifier = self.lex_doctype_identifier();
            if public_identifier.is_none() {
                force_quirks = true;
            } else {
                self.skip_whitespace();
                if matches!(self.peek(0), Some('"' | '\'')) {
                    system_identifier = self.lex_doctype_identifier();
                }
            }
        } else if self.next_few_characters_are_case_insensitive(0, "system") {
            self.skip(6);
            system_identifier = self.lex_doctype_identifier();
            if system_identifier.is_none() {
                force_quirks = true;
            }
        }

        self.skip_whitespace();
        match self.peek(0) {
            Some('>') => self.skip(1),
            // "EOF - eof-in-doctype parse error. Set the current DOCTYPE token's
            // force-quirks flag to on."
            None => force_quirks = true,
            // [§ 13.2.5.68 Bogus DOCTYPE state]
            Some(_) => {
                force_quirks = true;
                let _ = self.consume_until(">");
            }
        }

        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        }
    }

    /// A quoted DOCTYPE identifier, or `None` when the quote is missing.
    fn lex_doctype_identifier(&mut self) -> Option<String> {
        self.skip_whitespace();
        let quote = self.peek(0).filter(|&c| c == '"' || c == '\'')?;
        self.skip(1);
        let mut value = String::new();
        while let Some(c) = self.peek(0) {
            if c == quote {
                self.skip(1);
                return Some(value);
            }
            // "abrupt-doctype-public-identifier parse error"
            if c == '>' {
                return Some(value);
            }
            let _ = self.consume();
            value.push(c);
        }
        Some(value)
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    /// through [§ 13.2.5.40 Self-closing start tag state].
    ///
    /// Returns `None` at end of input: "EOF - eof-in-tag parse error. Emit an
    /// end-of-file token." The partial tag is dropped.
    fn lex_tag(&mut self) -> Option<Tag> {
        let mut tag = Tag::default();
        while let Some(c) = self.peek(0) {
            if is_whitespace_char(c) || c == '/' || c == '>' {
                break;
            }
            let _ = self.consume();
            tag.name.push(c.to_ascii_lowercase());
        }

        loop {
            self.skip_whitespace();
            match self.peek(0)? {
                '>' => {
                    self.skip(1);
                    return Some(tag);
                }
                '/' => {
                    self.skip(1);
                    // "U+003E GREATER-THAN SIGN (>) - Set the self-closing flag of
                    // the current tag token."
                    if self.peek(0) == Some('>') {
                        self.skip(1);
                        tag.self_closing = true;
                        return Some(tag);
                    }
                    // "unexpected-solidus-in-tag parse error. Reconsume in the
                    // before attribute name state."
                }
                _ => {
                    let attribute = self.lex_attribute()?;
                    // "duplicate-attribute parse error... the new attribute must be
                    // removed from the token."
                    let _ = tag.push_attribute(attribute);
                }
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    /// and the value states that follow it.
    fn lex_attribute(&mut self) -> Option<Attribute> {
        let mut name = String::new();
        // "U+003D EQUALS SIGN (=) - unexpected-equals-sign-before-attribute-name
        // parse error. ... Set that attribute's name to the current input character"
        if self.peek(0) == Some('=') {
            let _ = self.consume();
            name.push('=');
        }
        while let Some(c) = self.peek(0) {
            if is_whitespace_char(c) || matches!(c, '/' | '>' | '=') {
                break;
            }
            let _ = self.consume();
            name.push(c.to_ascii_lowercase());
        }

        self.skip_whitespace();
        if self.peek(0) != Some('=') {
            return Some(Attribute::new(name, ""));
        }
        self.skip(1);
        self.skip_whitespace();

        let mut value = String::new();
        match self.peek(0)? {
            // [§ 13.2.5.36 Attribute value (double-quoted) state]
            // [§ 13.2.5.37 Attribute value (single-quoted) state]
            quote @ ('"' | '\'') => {
                self.skip(1);
                loop {
                    let c = self.consume()?;
                    if c == quote {
                        break;
                    }
                    value.push(c);
                }
            }
            // [§ 13.2.5.38 Attribute value (unquoted) state]
            _ => {
                while let Some(c) = self.peek(0) {
                    if is_whitespace_char(c) || c == '>' {
                        break;
                    }
                    let _ = self.consume();
                    value.push(c);
                }
            }
        }
        Some(Attribute::new(name, value))
    }

    /// RCDATA, RAWTEXT and script data: everything is text until an
    /// "appropriate end tag token" for the last start tag.
    fn lex_raw_text(&mut self) -> Token {
        self.token_line = self.line;
        if self.peek(0) == Some('<') && self.peek(1) == Some('/') && self.at_appropriate_end_tag()
        {
            self.skip(2);
            if let Some(tag) = self.lex_tag() {
                self.state = TokenizerState::Data;
                return Token::EndTag(tag);
            }
            return Token::EndOfInput;
        }
        match self.consume() {
            Some(data) => Token::Character { data },
            None => Token::EndOfInput,
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this tokenizer"
    fn at_appropriate_end_tag(&self) -> bool {
        let Some(name) = self.last_start_tag_name.as_deref() else {
            return false;
        };
        let length = name.chars().count();
        self.next_few_characters_are_case_insensitive(2, name)
            && self
                .peek(2 + length)
                .is_some_and(|c| is_whitespace_char(c) || c == '/' || c == '>')
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    fn lex_plaintext(&mut self) -> Token {
        self.token_line = self.line;
        match self.consume() {
            Some(data) => Token::Character { data },
            None => Token::EndOfInput,
        }
    }
}

impl TokenSource for HTMLTokenizer {
    fn next_token(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.pop_front() {
            return Some(token);
        }
        if self.emitted_eof {
            return None;
        }
        let token = self.produce();
        if token.is_end_of_input() {
            self.emitted_eof = true;
        }
        Some(token)
    }

    fn current_line(&self) -> usize {
        self.token_line
    }

    fn switch_to(&mut self, state: TokenizerState) {
        self.state = state;
    }
}

impl Iterator for HTMLTokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// "ASCII whitespace" as seen after newline normalization: TAB, LF, FF, SPACE.
pub(crate) const fn is_whitespace_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        HTMLTokenizer::new(input).into_tokens()
    }

    #[test]
    fn tag_with_attributes() {
        let toks = tokens("<A Href=x id='y' disabled>");
        assert_eq!(
            toks[0],
            Token::start_tag("a", &[("href", "x"), ("id", "y"), ("disabled", "")])
        );
        assert_eq!(toks[1], Token::EndOfInput);
    }

    #[test]
    fn self_closing_and_end_tags() {
        let toks = tokens("<br/></P>");
        let Token::StartTag(br) = &toks[0] else {
            panic!("expected start tag, got {:?}", toks[0]);
        };
        assert!(br.self_closing);
        assert_eq!(toks[1], Token::end_tag("p"));
    }

    #[test]
    fn comments_and_bogus_comments() {
        let toks = tokens("<!--x--><!----><?pi?><!x>");
        assert_eq!(
            toks,
            vec![
                Token::comment("x"),
                Token::comment(""),
                Token::comment("?pi?"),
                Token::comment("x"),
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn doctype_identifiers() {
        let toks = tokens(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://x">"#);
        assert_eq!(
            toks[0],
            Token::Doctype {
                name: Some("html".to_string()),
                public_identifier: Some("-//W3C//DTD HTML 4.01//EN".to_string()),
                system_identifier: Some("http://x".to_string()),
                force_quirks: false,
            }
        );
    }

    #[test]
    fn stray_less_than_is_text() {
        let toks = tokens("a < b");
        assert!(toks.contains(&Token::Character { data: '<' }));
    }

    #[test]
    fn raw_text_until_appropriate_end_tag() {
        let mut tokenizer = HTMLTokenizer::new("<style>a</b></style>x");
        assert_eq!(tokenizer.next_token(), Some(Token::start_tag("style", &[])));
        tokenizer.switch_to(TokenizerState::RAWTEXT);
        let text: String = std::iter::from_fn(|| match tokenizer.next_token() {
            Some(Token::Character { data }) => Some(data),
            _ => None,
        })
        .collect();
        assert_eq!(text, "a</b>");
        assert_eq!(tokenizer.state(), TokenizerState::Data);
        assert_eq!(tokenizer.next_token(), Some(Token::Character { data: 'x' }));
    }

    #[test]
    fn lines_are_tracked() {
        let mut tokenizer = HTMLTokenizer::new("a\r\n\n<p>");
        while let Some(token) = tokenizer.next_token() {
            if matches!(token, Token::StartTag(_)) {
                break;
            }
        }
        assert_eq!(tokenizer.current_line(), 3);
    }
}
