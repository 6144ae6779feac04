//! Inline formatting of message bodies.
//!
//! Two ordered passes over the raw text:
//!
//! 1. **Autolink**: the text is split into plain segments and `scheme://` links
//!    (http, https, ftp, file). Formatting codes never appear inside a link, so
//!    link targets are never reinterpreted.
//! 2. **Codes**: plain segments are scanned for IRC control codes. A small state
//!    machine folds the token stream into styled runs, which are inserted into a
//!    span tree. Serializing the tree escapes every piece of text, so the output
//!    is balanced and free of injected markup no matter how malformed the input is.

use crate::render::markup::Markup;
use regex::Regex;
use std::sync::OnceLock;

/// Toggles bold.
pub const BOLD: char = '\x02';
/// Opens a color scope: `\x03FG[,BG]`; bare, it closes the color scope.
pub const COLOR: char = '\x03';
/// Closes every open scope.
pub const RESET: char = '\x0F';
/// Toggles italic.
pub const ITALIC: char = '\x1D';
/// Toggles underline.
pub const UNDERLINE: char = '\x1F';

/// Theme color names for IRC color codes 0-15.
pub const IRC_COLORS: [&str; 16] = [
    "white",
    "black",
    "blue",
    "green",
    "red",
    "brown",
    "magenta",
    "orange",
    "yellow",
    "light-green",
    "cyan",
    "light-cyan",
    "light-blue",
    "pink",
    "grey",
    "light-grey",
];

/// Trailing characters never considered part of a link.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"'];

// ===== Tokens =====

/// Theme color token selected by an IRC color code.
///
/// Codes outside `0..=15` map to the theme's default token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorToken(Option<u8>);

impl ColorToken {
    /// Token for a numeric IRC color code.
    pub fn from_code(code: u8) -> Self {
        if usize::from(code) < IRC_COLORS.len() {
            Self(Some(code))
        } else {
            Self(None)
        }
    }

    /// Theme name of the token (`"red"`, ..., or `"default"`).
    pub fn name(self) -> &'static str {
        match self.0 {
            Some(code) => IRC_COLORS[usize::from(code)],
            None => "default",
        }
    }
}

/// A recognized control code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// `\x02`
    Bold,
    /// `\x1D`
    Italic,
    /// `\x1F`
    Underline,
    /// `\x0F`
    Reset,
    /// `\x03` with its optional digit groups.
    Color {
        /// Foreground code, `None` for a bare `\x03`.
        fg: Option<u8>,
        /// Background code, only present after a foreground.
        bg: Option<u8>,
    },
}

/// Lexical unit of a message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text.
    Text(&'a str),
    /// Autolinked URL.
    Link(&'a str),
    /// Formatting code.
    Code(Code),
}

/// Split raw text into text, link and code tokens (autolink pass first).
pub fn tokenize(raw: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for (start, end) in link_spans(raw) {
        scan_codes(&raw[cursor..start], &mut tokens);
        tokens.push(Token::Link(&raw[start..end]));
        cursor = end;
    }
    scan_codes(&raw[cursor..], &mut tokens);

    tokens
}

fn url_pattern() -> &'static Regex {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)(?:https?|ftp|file)://[^\s<>"'\x00-\x1F\x7F]+"#)
            .expect("Valid regex pattern")
    })
}

/// Byte ranges of links, with trailing punctuation excluded.
///
/// A scheme glued to a preceding letter (`xhttp://`) is not a link; digits
/// may precede it, since color codes end in digits.
fn link_spans(raw: &str) -> Vec<(usize, usize)> {
    url_pattern()
        .find_iter(raw)
        .filter_map(|m| {
            if raw[..m.start()]
                .chars()
                .next_back()
                .is_some_and(char::is_alphabetic)
            {
                return None;
            }
            let candidate = m.as_str();
            let trimmed = trim_link(candidate);
            let scheme_len = candidate.find("://")? + 3;
            (trimmed.len() > scheme_len).then(|| (m.start(), m.start() + trimmed.len()))
        })
        .collect()
}

fn trim_link(mut link: &str) -> &str {
    loop {
        let Some(last) = link.chars().last() else {
            return link;
        };
        let unbalanced = match last {
            ')' => link.matches('(').count() < link.matches(')').count(),
            ']' => link.matches('[').count() < link.matches(']').count(),
            '}' => link.matches('{').count() < link.matches('}').count(),
            c => TRAILING_PUNCTUATION.contains(&c),
        };
        if !unbalanced {
            return link;
        }
        link = &link[..link.len() - last.len_utf8()];
    }
}

fn scan_codes<'a>(segment: &'a str, tokens: &mut Vec<Token<'a>>) {
    // Every control code is ASCII, so byte offsets next to one are char boundaries.
    let bytes = segment.as_bytes();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if !is_control(b) {
            i += 1;
            continue;
        }

        push_text(tokens, &segment[text_start..i]);
        i += 1;
        match char::from(b) {
            BOLD => tokens.push(Token::Code(Code::Bold)),
            ITALIC => tokens.push(Token::Code(Code::Italic)),
            UNDERLINE => tokens.push(Token::Code(Code::Underline)),
            RESET => tokens.push(Token::Code(Code::Reset)),
            COLOR => {
                let (code, consumed) = parse_color(&bytes[i..]);
                i += consumed;
                tokens.push(Token::Code(code));
            }
            // Reverse, monospace and other unsupported codes are dropped.
            _ => {}
        }
        text_start = i;
    }

    push_text(tokens, &segment[text_start..]);
}

fn push_text<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str) {
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
}

fn is_control(b: u8) -> bool {
    (b < 0x20 && b != b'\t' && b != b'\n') || b == 0x7F
}

/// Parse `FG[,BG]` after a color introducer. Returns the code and bytes consumed.
fn parse_color(bytes: &[u8]) -> (Code, usize) {
    let (fg, mut used) = parse_digits(bytes);
    let Some(fg) = fg else {
        return (Code::Color { fg: None, bg: None }, 0);
    };

    let mut bg = None;
    if bytes.get(used) == Some(&b',') {
        if let (Some(value), n) = parse_digits(&bytes[used + 1..]) {
            bg = Some(value);
            used += 1 + n;
        }
    }

    (Code::Color { fg: Some(fg), bg }, used)
}

fn parse_digits(bytes: &[u8]) -> (Option<u8>, usize) {
    let n = bytes
        .iter()
        .take(2)
        .take_while(|b| b.is_ascii_digit())
        .count();
    if n == 0 {
        return (None, 0);
    }
    let value = bytes[..n].iter().fold(0u8, |acc, b| acc * 10 + (b - b'0'));
    (Some(value), n)
}

// ===== Style state machine =====

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Style {
    bold: bool,
    italic: bool,
    underline: bool,
    fg: Option<ColorToken>,
    bg: Option<ColorToken>,
}

impl Style {
    fn apply(&mut self, code: Code) {
        match code {
            Code::Bold => self.bold = !self.bold,
            Code::Italic => self.italic = !self.italic,
            Code::Underline => self.underline = !self.underline,
            Code::Reset => *self = Style::default(),
            Code::Color { fg: None, .. } => {
                self.fg = None;
                self.bg = None;
            }
            Code::Color { fg: Some(fg), bg } => {
                self.fg = Some(ColorToken::from_code(fg));
                if let Some(bg) = bg {
                    self.bg = Some(ColorToken::from_code(bg));
                }
            }
        }
    }

    /// Open scopes, outermost first.
    fn tags(&self) -> Vec<Tag> {
        let mut tags = Vec::with_capacity(4);
        if self.fg.is_some() || self.bg.is_some() {
            tags.push(Tag::Color {
                fg: self.fg,
                bg: self.bg,
            });
        }
        if self.bold {
            tags.push(Tag::Bold);
        }
        if self.italic {
            tags.push(Tag::Italic);
        }
        if self.underline {
            tags.push(Tag::Underline);
        }
        tags
    }
}

// ===== Span tree =====

/// Formatting scope in the span tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Color scope.
    Color {
        /// Foreground token.
        fg: Option<ColorToken>,
        /// Background token.
        bg: Option<ColorToken>,
    },
    /// Bold scope.
    Bold,
    /// Italic scope.
    Italic,
    /// Underline scope.
    Underline,
}

impl Tag {
    fn open(&self) -> String {
        match self {
            Tag::Color { fg, bg } => {
                let classes: Vec<String> = fg
                    .map(|t| format!("fg-{}", t.name()))
                    .into_iter()
                    .chain(bg.map(|t| format!("bg-{}", t.name())))
                    .collect();
                format!("<span class=\"{}\">", classes.join(" "))
            }
            Tag::Bold => "<b>".to_string(),
            Tag::Italic => "<i>".to_string(),
            Tag::Underline => "<u>".to_string(),
        }
    }

    fn close(&self) -> &'static str {
        match self {
            Tag::Color { .. } => "</span>",
            Tag::Bold => "</b>",
            Tag::Italic => "</i>",
            Tag::Underline => "</u>",
        }
    }
}

/// Node of the span tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text (escaped on output).
    Text(String),
    /// Link whose text and target are the URL.
    Link(String),
    /// Formatting scope wrapping its children.
    Styled {
        /// Scope kind.
        tag: Tag,
        /// Contents of the scope.
        children: Vec<Node>,
    },
}

/// Parsed message body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanTree {
    nodes: Vec<Node>,
}

impl SpanTree {
    /// Top-level nodes.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Serialize to balanced, escaped markup.
    pub fn to_markup(&self) -> Markup {
        let mut out = Markup::new();
        write_nodes(&self.nodes, &mut out);
        out
    }

    /// Concatenated text with all formatting removed.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }
}

/// Parse raw message text into a span tree.
pub fn parse(raw: &str) -> SpanTree {
    let mut style = Style::default();
    let mut tree = SpanTree::default();

    for token in tokenize(raw) {
        match token {
            Token::Code(code) => style.apply(code),
            Token::Text(text) => insert(&mut tree.nodes, &style.tags(), Node::Text(text.to_string())),
            Token::Link(url) => insert(&mut tree.nodes, &style.tags(), Node::Link(url.to_string())),
        }
    }

    tree
}

/// Format raw message text into safe markup.
pub fn format(raw: &str) -> Markup {
    parse(raw).to_markup()
}

/// Remove all formatting codes, keeping text and link text.
pub fn strip(raw: &str) -> String {
    parse(raw).plain_text()
}

/// Place `leaf` under the chain of `tags`, reusing the trailing scopes of
/// `children` when they match so adjacent runs share their common prefix.
fn insert(children: &mut Vec<Node>, tags: &[Tag], leaf: Node) {
    let Some((first, rest)) = tags.split_first() else {
        if let Node::Text(next) = &leaf {
            if let Some(Node::Text(prev)) = children.last_mut() {
                prev.push_str(next);
                return;
            }
        }
        children.push(leaf);
        return;
    };

    let extends_last = matches!(children.last(), Some(Node::Styled { tag, .. }) if tag == first);
    if !extends_last {
        children.push(Node::Styled {
            tag: *first,
            children: Vec::new(),
        });
    }
    if let Some(Node::Styled { children: inner, .. }) = children.last_mut() {
        insert(inner, rest, leaf);
    }
}

fn write_nodes(nodes: &[Node], out: &mut Markup) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_text(text),
            Node::Link(url) => {
                out.push_trusted("<a href=\"");
                out.push_text(url);
                out.push_trusted("\" target=\"_blank\" rel=\"noopener noreferrer\">");
                out.push_text(url);
                out.push_trusted("</a>");
            }
            Node::Styled { tag, children } => {
                out.push_trusted(&tag.open());
                write_nodes(children, out);
                out.push_trusted(tag.close());
            }
        }
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) | Node::Link(text) => out.push_str(text),
            Node::Styled { children, .. } => collect_text(children, out),
        }
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
