//! chanlog: viewer core for archived chat logs.
//!
//! Logs are fetched per calendar date from a log server and rendered as safe
//! HTML: per-author colors, IRC-style inline formatting, autolinked URLs.
//! Navigation (previous/next date, date picker, search, deep links) is driven
//! by [`view::ViewController`], which paints through the
//! [`view::RenderTarget`] capability.
//!
//! Layout follows a pure core / impure shell split:
//! - `model`, `render`, `state`: pure data and transformations
//! - `source`, `view`: backend access and the controller
//! - `config`, `logging`: ambient setup for the binary

pub mod config;
pub mod logging;
pub mod model;
pub mod render;
pub mod source;
pub mod state;
pub mod view;

#[cfg(test)]
mod test_harness;
