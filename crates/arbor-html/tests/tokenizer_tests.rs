//! Integration tests for the reference tokenizer.

use arbor_html::{Attribute, HTMLTokenizer, Tag, Token, TokenSource, TokenizerState};

/// Helper to tokenize a string in the data state.
fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::new(input).into_tokens()
}

/// Helper to collect character tokens until anything else shows up.
fn take_text(tokenizer: &mut HTMLTokenizer) -> (String, Option<Token>) {
    let mut text = String::new();
    loop {
        match tokenizer.next_token() {
            Some(Token::Character { data }) => text.push(data),
            other => return (text, other),
        }
    }
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + end of input
    assert_eq!(tokens[0], Token::Character { data: 'H' });
    assert_eq!(tokens[4], Token::Character { data: 'o' });
    assert_eq!(tokens[5], Token::EndOfInput);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens, vec![Token::html_doctype(), Token::EndOfInput]);
}

#[test]
fn test_doctype_without_name_forces_quirks() {
    let tokens = tokenize("<!DOCTYPE>");
    assert!(matches!(
        &tokens[0],
        Token::Doctype { name: None, force_quirks: true, .. }
    ));
}

#[test]
fn test_start_and_end_tags() {
    let tokens = tokenize("<DIV></div>");
    assert_eq!(
        tokens,
        vec![
            Token::start_tag("div", &[]),
            Token::end_tag("div"),
            Token::EndOfInput
        ]
    );
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    let Token::StartTag(tag) = &tokens[0] else {
        panic!("Expected StartTag token, got {:?}", tokens[0]);
    };
    assert_eq!(tag.name, "br");
    assert!(tag.self_closing);
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert_eq!(tokens, vec![Token::comment(" hello "), Token::EndOfInput]);
}

#[test]
fn test_attribute_quoting_styles() {
    let tokens = tokenize(r#"<input type="text" id='name' size=3 disabled>"#);
    let Token::StartTag(tag) = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(
        tag.attributes,
        vec![
            Attribute::new("type", "text"),
            Attribute::new("id", "name"),
            Attribute::new("size", "3"),
            Attribute::new("disabled", ""),
        ]
    );
}

#[test]
fn test_duplicate_attribute_keeps_the_first() {
    let tokens = tokenize("<p class=a class=b>");
    let Token::StartTag(tag) = &tokens[0] else {
        panic!("Expected StartTag token");
    };
    assert_eq!(tag.attribute("class"), Some("a"));
    assert_eq!(tag.attributes.len(), 1);
}

#[test]
fn test_tag_with_text_content() {
    let tokens = tokenize("<p>Hi</p>");
    assert_eq!(
        tokens,
        vec![
            Token::StartTag(Tag::new("p")),
            Token::Character { data: 'H' },
            Token::Character { data: 'i' },
            Token::end_tag("p"),
            Token::EndOfInput,
        ]
    );
}

#[test]
fn test_carriage_returns_are_normalized() {
    let text: String = tokenize("a\r\nb\rc")
        .into_iter()
        .filter_map(|token| match token {
            Token::Character { data } => Some(data),
            _ => None,
        })
        .collect();
    assert_eq!(text, "a\nb\nc");
}

#[test]
fn test_character_references_are_kept_verbatim() {
    let text: String = tokenize("&amp;&lt;")
        .into_iter()
        .filter_map(|token| match token {
            Token::Character { data } => Some(data),
            _ => None,
        })
        .collect();
    assert_eq!(text, "&amp;&lt;");
}

#[test]
fn test_title_element_rcdata() {
    let mut tokenizer = HTMLTokenizer::new("<title>a <b> c</TITLE>x");
    assert_eq!(tokenizer.next_token(), Some(Token::start_tag("title", &[])));
    tokenizer.switch_to(TokenizerState::RCDATA);
    let (text, next) = take_text(&mut tokenizer);
    assert_eq!(text, "a <b> c");
    assert_eq!(next, Some(Token::end_tag("title")));
    assert_eq!(tokenizer.next_token(), Some(Token::Character { data: 'x' }));
}

#[test]
fn test_style_with_wrong_end_tag() {
    let mut tokenizer = HTMLTokenizer::new("<style></styles></style>");
    let _ = tokenizer.next_token();
    tokenizer.switch_to(TokenizerState::RAWTEXT);
    let (text, next) = take_text(&mut tokenizer);
    assert_eq!(text, "</styles>");
    assert_eq!(next, Some(Token::end_tag("style")));
}

#[test]
fn test_script_data_ends_at_script_end_tag() {
    let mut tokenizer = HTMLTokenizer::new("<script>a</div>b</script>");
    let _ = tokenizer.next_token();
    tokenizer.switch_to(TokenizerState::ScriptData);
    let (text, next) = take_text(&mut tokenizer);
    assert_eq!(text, "a</div>b");
    assert_eq!(next, Some(Token::end_tag("script")));
}

#[test]
fn test_plaintext_never_ends() {
    let mut tokenizer = HTMLTokenizer::new("<plaintext></plaintext>");
    let _ = tokenizer.next_token();
    tokenizer.switch_to(TokenizerState::PLAINTEXT);
    let (text, next) = take_text(&mut tokenizer);
    assert_eq!(text, "</plaintext>");
    assert_eq!(next, Some(Token::EndOfInput));
    assert_eq!(tokenizer.next_token(), None);
}

#[test]
fn test_token_lines() {
    let mut tokenizer = HTMLTokenizer::new("<html>\n<body>\n\n<p>");
    let mut lines = Vec::new();
    while let Some(token) = tokenizer.next_token() {
        if let Token::StartTag(tag) = token {
            lines.push((tag.name, tokenizer.current_line()));
        }
    }
    assert_eq!(
        lines,
        [
            ("html".to_string(), 1),
            ("body".to_string(), 2),
            ("p".to_string(), 4)
        ]
    );
}
