//! Arbor CLI - parse an HTML document and inspect the tree it builds
//!
//! Usage:
//!   arbor <file>                 Print the DOM tree
//!   arbor <file> --json          Output the DOM as JSON
//!   arbor <file> --serialize     Output the DOM serialized back to HTML
//!   arbor <file> --issues        Also list parse errors
//!   arbor --html '<p>Hello'      Parse a string instead of a file
//!
//! Scripts are never run: each script pause is reported and parsing resumes.

mod json;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use arbor_dom::{DomTree, NodeId};
use arbor_html::{
    EngineKind, HTMLParser, ParseIssue, ParseStatus, ParserOptions, print_tree, serialize,
};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use owo_colors::OwoColorize;
use serde_json::json;
use simple_logger::SimpleLogger;

use crate::json::{IssueReport, tree_to_json};

#[derive(Debug, Parser)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "arbor", version, about = "Parse HTML into a DOM tree")]
struct Cli {
    /// HTML file to parse
    file: Option<PathBuf>,

    /// Parse this string instead of a file
    #[arg(long, value_name = "STRING", conflicts_with = "file")]
    html: Option<String>,

    /// Output the DOM as JSON
    #[arg(long, short)]
    json: bool,

    /// Output the DOM serialized back to HTML
    #[arg(long, short, conflicts_with = "json")]
    serialize: bool,

    /// List parse errors
    #[arg(long, short)]
    issues: bool,

    /// Parse as if scripting were disabled (affects `noscript`)
    #[arg(long)]
    no_scripting: bool,

    /// Request the legacy tree construction engine
    #[arg(long)]
    legacy: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(long, short, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn parser_options(&self) -> ParserOptions {
        let engine = if self.legacy {
            EngineKind::Legacy
        } else {
            EngineKind::Modern
        };
        ParserOptions::default()
            .engine(engine)
            .scripting(!self.no_scripting)
            .collect_issues(self.issues)
    }

    const fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    SimpleLogger::new().with_level(cli.log_level()).init()?;

    let html = read_input(&cli)?;
    let (tree, issues) = parse(&html, cli.parser_options())?;

    if cli.json {
        let document = tree_to_json(&tree, tree.root());
        let output = if cli.issues {
            let reports: Vec<IssueReport<'_>> = issues.iter().map(IssueReport::from).collect();
            json!({ "document": document, "issues": reports })
        } else {
            document
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if cli.serialize {
        println!("{}", serialize(&tree));
    } else {
        println!("=== DOM Tree ===");
        print_tree(&tree, tree.root(), 0);
    }
    if cli.issues {
        print_issues(&issues);
    }
    Ok(())
}

fn read_input(cli: &Cli) -> Result<String> {
    if let Some(html) = &cli.html {
        return Ok(html.clone());
    }
    let Some(path) = &cli.file else {
        bail!("no input file or --html provided");
    };
    fs::read_to_string(path).with_context(|| format!("reading '{}'", path.display()))
}

/// Run the parser to completion, reporting every script it stops for.
fn parse(html: &str, options: ParserOptions) -> Result<(DomTree, Vec<ParseIssue>)> {
    let mut parser =
        HTMLParser::new(html, DomTree::new(), options).context("cannot construct the parser")?;

    while let ParseStatus::ScriptPaused { script, line } = parser.pump()? {
        let source = script_text(parser.tree_builder().sink(), script);
        eprintln!(
            "{} script at line {line} not executed ({} chars)",
            "note:".cyan().bold(),
            source.chars().count()
        );
        log::debug!("script source: {source:?}");
        parser.resume()?;
    }
    Ok(parser.finish())
}

fn script_text(tree: &DomTree, script: NodeId) -> String {
    tree.children(script)
        .iter()
        .filter_map(|&child| tree.as_text(child))
        .collect()
}

fn print_issues(issues: &[ParseIssue]) {
    println!();
    println!("=== Parse Errors ({}) ===", issues.len());
    for issue in issues {
        println!(
            "  {} [{}] {}",
            format!("line {}:", issue.line).yellow(),
            issue.mode.dimmed(),
            issue.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_parser_options() {
        let cli = Cli::parse_from(["arbor", "--html", "<p>", "--no-scripting", "-i"]);
        let options = cli.parser_options();
        assert_eq!(options.engine, EngineKind::Modern);
        assert!(!options.scripting_enabled);
        assert!(options.collect_issues);
        assert_eq!(cli.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn repeated_verbose_raises_the_level() {
        let cli = Cli::parse_from(["arbor", "x.html", "-vv"]);
        assert_eq!(cli.log_level(), LevelFilter::Trace);
    }

    #[test]
    fn legacy_engine_fails_with_context() {
        let options = ParserOptions::default().engine(EngineKind::Legacy);
        let error = parse("<p>", options).expect_err("legacy engine is not built");
        assert_eq!(error.to_string(), "cannot construct the parser");
    }

    #[test]
    fn scripts_are_skipped_and_parsing_completes() {
        let (tree, _) = parse("<script>a()</script><p>b", ParserOptions::default())
            .expect("modern engine");
        assert_eq!(serialize(&tree).matches("<p>b</p>").count(), 1);
    }

    #[test]
    fn serialize_and_json_are_exclusive() {
        assert!(Cli::try_parse_from(["arbor", "x.html", "--json", "--serialize"]).is_err());
    }
}
