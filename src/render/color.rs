//! Deterministic author colors.
//!
//! An author name is hashed with the Java `String.hashCode` recurrence over
//! UTF-16 code units and reduced modulo the palette size, so the same nick
//! keeps its color across days, searches and reloads.

use thiserror::Error;

/// Default author colors.
pub const DEFAULT_PALETTE: [&str; 11] = [
    "#7b8d43", "#ada63e", "#a27943", "#8a5d3c", "#eabe5b", "#edefe2", "#ea92a8", "#5587bc",
    "#4ec0c9", "#8d4986", "#4e5a98",
];

/// Position in a [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaletteIndex(usize);

impl PaletteIndex {
    /// Raw index value.
    pub fn get(self) -> usize {
        self.0
    }
}

/// 32-bit signed rolling hash: `h = h * 31 + unit`, wrapping.
///
/// The empty string hashes to 0.
pub fn hash_code(name: &str) -> i32 {
    name.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Map a name to a palette slot of a palette with `palette_len` entries.
///
/// `i32::MIN` has no positive counterpart; it clamps to 0 instead of
/// wrapping back to a negative value. A zero-length palette yields index 0.
pub fn color_for(name: &str, palette_len: usize) -> PaletteIndex {
    if palette_len == 0 {
        return PaletteIndex(0);
    }
    let magnitude = hash_code(name).checked_abs().unwrap_or(0);
    PaletteIndex(magnitude.unsigned_abs() as usize % palette_len)
}

/// Rejected palette definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPalette {
    /// A palette needs at least one color.
    #[error("Palette must contain at least one color")]
    Empty,
    /// The entry cannot be placed inside a `style` attribute.
    #[error("Palette color {0:?} is not a plain CSS color value")]
    UnsafeColor(String),
}

/// Non-empty list of CSS colors used for author names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Smart constructor: rejects empty palettes and values that could break
    /// out of a `style` attribute.
    pub fn new<I, S>(colors: I) -> Result<Self, InvalidPalette>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            return Err(InvalidPalette::Empty);
        }
        if let Some(bad) = colors.iter().find(|c| !is_plain_css_color(c)) {
            return Err(InvalidPalette::UnsafeColor(bad.clone()));
        }
        Ok(Self { colors })
    }

    /// Number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True if the palette has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Palette slot for `name`.
    pub fn index_for(&self, name: &str) -> PaletteIndex {
        color_for(name, self.colors.len())
    }

    /// CSS color at `index`, wrapping out-of-range indices.
    pub fn color(&self, index: PaletteIndex) -> &str {
        &self.colors[index.0 % self.colors.len()]
    }

    /// CSS color for `name`.
    pub fn color_for(&self, name: &str) -> &str {
        self.color(self.index_for(name))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

fn is_plain_css_color(value: &str) -> bool {
    !value.trim().is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' ' | '-'))
}
