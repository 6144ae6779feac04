//! Safe markup strings.
//!
//! [`Markup`] can only be grown through escaping helpers or by other markup,
//! so raw message text never reaches the output unescaped.

use std::fmt;

/// HTML that is safe to paint as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Empty markup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup containing `text` with every HTML-significant character escaped.
    pub fn text(text: &str) -> Self {
        Self(escape(text))
    }

    /// Wrap markup built by this crate. Callers must escape every piece of input.
    pub(crate) fn trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Append escaped text.
    pub fn push_text(&mut self, text: &str) {
        self.0.push_str(&escape(text));
    }

    /// Append other markup.
    pub fn push_markup(&mut self, other: &Markup) {
        self.0.push_str(&other.0);
    }

    /// Append a literal tag or fragment produced by this crate.
    pub(crate) fn push_trusted(&mut self, html: &str) {
        self.0.push_str(html);
    }

    /// Borrow the HTML.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the HTML.
    pub fn into_string(self) -> String {
        self.0
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
