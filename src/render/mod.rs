//! Message rendering pipeline (pure).
//!
//! Records go in, safe markup comes out:
//! - `color`: deterministic author colors
//! - `format`: autolinking and inline formatting codes
//! - `renderer`: message fragments, date headers and whole views

pub mod color;
pub mod format;
pub mod markup;
pub mod renderer;

// Re-export for convenience
pub use color::{color_for, hash_code, InvalidPalette, Palette, PaletteIndex};
pub use markup::Markup;
pub use renderer::{
    render_plaintext, LinkContext, LogRenderer, MessageFragment, RenderedSection, RenderedView,
    ScrollIntent,
};
