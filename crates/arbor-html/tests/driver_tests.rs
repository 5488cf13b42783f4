//! Integration tests for the parser driver: options, script pauses and
//! feeding tokens by hand.

use arbor_dom::DomTree;
use arbor_html::{
    EngineKind, HTMLParser, InsertionMode, ParseStatus, ParserError, ParserOptions,
    ProcessOutcome, Token, TokenSource, TokenizerState, TreeBuilder, TreeBuilderError,
    parse_document_with_options, serialize_children,
};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

/// A token source replaying a fixed list, for driving the parser without the
/// tokenizer.
struct ReplayTokens {
    tokens: std::vec::IntoIter<Token>,
    switches: Vec<TokenizerState>,
}

impl ReplayTokens {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            switches: Vec::new(),
        }
    }
}

impl TokenSource for ReplayTokens {
    fn next_token(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    fn current_line(&self) -> usize {
        1
    }

    fn switch_to(&mut self, state: TokenizerState) {
        self.switches.push(state);
    }
}

fn run_to_end(parser: &mut HTMLParser<DomTree>) {
    while let ParseStatus::ScriptPaused { .. } = parser.pump().expect("pump") {
        parser.resume().expect("resume");
    }
}

#[test]
fn test_script_end_tag_pauses_with_line() {
    let html = "<p>a\n\n<script>x()</script>b";
    let mut parser = HTMLParser::new(html, DomTree::new(), ParserOptions::default())
        .expect("modern engine");

    let ParseStatus::ScriptPaused { script, line } = parser.pump().expect("pump") else {
        panic!("expected a script pause");
    };
    assert_eq!(line, 3);
    assert!(parser.tree_builder().is_paused());
    assert!(
        parser
            .tree_builder()
            .sink()
            .as_element(script)
            .is_some_and(|e| e.is_html("script"))
    );

    assert_eq!(
        parser.pump(),
        Err(ParserError::TreeBuilder(TreeBuilderError::Paused))
    );
    parser.resume().expect("resume");
    assert_eq!(
        parser.resume(),
        Err(ParserError::TreeBuilder(TreeBuilderError::NotPaused))
    );
    assert_eq!(parser.pump(), Ok(ParseStatus::Finished));

    let (tree, _) = parser.finish();
    let body = tree.body().expect("body");
    assert_eq!(
        serialize_children(&tree, body),
        "<p>a\n\n<script>x()</script>b</p>"
    );
}

#[test]
fn test_each_script_pauses_once() {
    let html = "<script>1</script><script>2</script>";
    let mut parser =
        HTMLParser::new(html, DomTree::new(), ParserOptions::default()).expect("parser");
    let mut pauses = 0;
    while let ParseStatus::ScriptPaused { .. } = parser.pump().expect("pump") {
        pauses += 1;
        parser.resume().expect("resume");
    }
    assert_eq!(pauses, 2);
    assert!(parser.tree_builder().is_stopped());
}

#[test]
fn test_legacy_engine_is_rejected() {
    let options = ParserOptions::default().engine(EngineKind::Legacy);
    let result = HTMLParser::new("<p>x", DomTree::new(), options);
    assert!(matches!(
        result,
        Err(ParserError::LegacyEngineUnavailable)
    ));
}

#[test]
fn test_document_parse_reports_construction_errors() {
    let options = ParserOptions::default().engine(EngineKind::Legacy);
    assert!(matches!(
        parse_document_with_options("<p>x", options),
        Err(ParserError::LegacyEngineUnavailable)
    ));

    let (tree, issues) =
        parse_document_with_options("<script>a()</script><p>x", ParserOptions::default())
            .expect("modern engine");
    assert!(issues.is_empty());
    let body = tree.body().expect("body");
    assert_eq!(serialize_children(&tree, body), "<p>x</p>");
}

#[test]
fn test_noscript_follows_the_scripting_flag() {
    let html = "<body><noscript><p>x</p></noscript>";

    let mut parser =
        HTMLParser::new(html, DomTree::new(), ParserOptions::default()).expect("parser");
    run_to_end(&mut parser);
    let (tree, _) = parser.finish();
    let body = tree.body().expect("body");
    let noscript = tree.first_child(body).expect("noscript");
    assert_eq!(tree.children(noscript).len(), 1);
    assert_eq!(
        tree.as_text(tree.children(noscript)[0]),
        Some("<p>x</p>")
    );

    let options = ParserOptions::default().scripting(false);
    let mut parser = HTMLParser::new(html, DomTree::new(), options).expect("parser");
    run_to_end(&mut parser);
    let (tree, _) = parser.finish();
    let body = tree.body().expect("body");
    assert_eq!(
        serialize_children(&tree, body),
        "<noscript><p>x</p></noscript>"
    );
}

#[test]
fn test_issues_are_collected_only_on_request() {
    let html = "<div></span>";

    let mut parser =
        HTMLParser::new(html, DomTree::new(), ParserOptions::default()).expect("parser");
    run_to_end(&mut parser);
    assert!(parser.finish().1.is_empty());

    let options = ParserOptions::default().collect_issues(true);
    let mut parser = HTMLParser::new(html, DomTree::new(), options).expect("parser");
    run_to_end(&mut parser);
    let (_, issues) = parser.finish();
    assert!(issues.iter().any(|issue| issue.token_kind == "EndTag"));
}

#[test]
fn test_replayed_tokens_request_tokenizer_states() {
    let mut tokens = vec![Token::html_doctype(), Token::start_tag("title", &[])];
    tokens.extend(Token::characters("t"));
    tokens.push(Token::end_tag("title"));
    tokens.push(Token::start_tag("textarea", &[("rows", "2")]));
    tokens.push(Token::end_tag("textarea"));
    tokens.push(Token::EndOfInput);

    let mut source = ReplayTokens::new(tokens);
    let mut builder = TreeBuilder::new(DomTree::new());
    let mut requested = Vec::new();
    while let Some(token) = source.next_token() {
        if let ProcessOutcome::SwitchTokenizer(state) = builder.process(&token).expect("process") {
            requested.push(state);
            source.switch_to(state);
        }
    }
    assert_eq!(requested, [TokenizerState::RCDATA, TokenizerState::RCDATA]);
    assert_eq!(source.switches, requested);
    assert!(builder.is_stopped());
}

#[test]
fn test_driver_accepts_any_token_source() {
    let mut tokens = vec![Token::start_tag("p", &[("class", "x")])];
    tokens.extend(Token::characters("hi"));
    tokens.push(Token::EndOfInput);

    let mut parser = HTMLParser::with_token_source(
        ReplayTokens::new(tokens),
        DomTree::new(),
        ParserOptions::default(),
    )
    .expect("parser");
    assert_eq!(parser.pump(), Ok(ParseStatus::Finished));
    let (tree, _) = parser.finish();
    let body = tree.body().expect("body");
    assert_eq!(serialize_children(&tree, body), "<p class=\"x\">hi</p>");
}

#[test]
fn test_builder_modes_follow_the_document() {
    let mut builder = TreeBuilder::new(DomTree::new());
    assert_eq!(builder.insertion_mode(), InsertionMode::Initial);

    let _ = builder.process(&Token::html_doctype()).expect("doctype");
    assert_eq!(builder.insertion_mode(), InsertionMode::BeforeHtml);

    let _ = builder.process(&Token::start_tag("table", &[])).expect("table");
    assert_eq!(builder.insertion_mode(), InsertionMode::InTable);
    assert!(!builder.frameset_ok());

    let _ = builder.process(&Token::start_tag("td", &[])).expect("td");
    assert_eq!(builder.insertion_mode(), InsertionMode::InCell);

    let _ = builder.process(&Token::start_tag("svg", &[])).expect("svg");
    assert_eq!(builder.insertion_mode(), InsertionMode::InForeignContent);
    assert_eq!(
        builder.secondary_insertion_mode(),
        Some(InsertionMode::InCell)
    );

    let _ = builder.process(&Token::end_tag("svg")).expect("end svg");
    assert_eq!(builder.insertion_mode(), InsertionMode::InCell);
    assert_eq!(builder.secondary_insertion_mode(), None);

    let _ = builder.process(&Token::EndOfInput).expect("eof");
    assert!(builder.is_stopped());
}

/// A token drawn from a small vocabulary that reaches most insertion modes.
#[derive(Debug, Clone)]
struct FuzzToken(Token);

impl Arbitrary for FuzzToken {
    fn arbitrary(g: &mut Gen) -> Self {
        const TAGS: &[&str] = &[
            "html", "head", "body", "p", "div", "b", "i", "a", "table", "tbody", "tr", "td",
            "th", "caption", "colgroup", "col", "select", "option", "template", "frameset",
            "frame", "svg", "math", "mi", "foreignObject", "li", "form", "button", "br",
            "title", "script", "textarea", "pre", "nobr", "font",
        ];
        let name = *g.choose(TAGS).unwrap_or(&"p");
        let token = match u8::arbitrary(g) % 6 {
            0 | 1 => Token::start_tag(name, &[]),
            2 | 3 => Token::end_tag(name),
            4 => Token::Character {
                data: *g.choose(&['x', ' ', '\n', '\0']).unwrap_or(&'x'),
            },
            _ => Token::comment("c"),
        };
        Self(token)
    }
}

#[quickcheck]
fn open_elements_stay_non_empty_until_end_of_input(tokens: Vec<FuzzToken>) -> bool {
    let mut builder = TreeBuilder::new(DomTree::new());
    let mut seen_root = false;
    for FuzzToken(token) in tokens {
        let outcome = builder.process(&token).expect("process");
        if outcome == ProcessOutcome::Paused {
            builder.resume().expect("resume");
        }
        seen_root |= !builder.open_elements().is_empty();
        if seen_root && builder.open_elements().is_empty() {
            return false;
        }
    }
    let _ = builder.process(&Token::EndOfInput).expect("eof");
    builder.is_stopped()
}

#[quickcheck]
fn formatting_bound_holds_for_any_markup(tokens: Vec<FuzzToken>) -> bool {
    let mut builder = TreeBuilder::new(DomTree::new());
    for FuzzToken(token) in tokens {
        if builder.process(&token).expect("process") == ProcessOutcome::Paused {
            builder.resume().expect("resume");
        }
        let list = builder.active_formatting_elements();
        let within_bound = (0..list.len())
            .filter_map(|index| list.tag_at(index))
            .all(|tag| list.count_matching_after_last_marker(tag) <= arbor_html::NOAHS_ARK_LIMIT);
        if !within_bound {
            return false;
        }
    }
    true
}
