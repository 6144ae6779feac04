//! Viewer shell: controller and render targets (impure).
//!
//! - `target`: the [`RenderTarget`] capability the controller paints through
//! - `document`: an in-memory HTML page implementing it
//! - `controller`: route dispatch, fetch sequencing, notices and layout

pub mod controller;
pub mod document;
pub mod target;

pub use controller::{
    Applied, ControllerOptions, LoadEpoch, LoadOutcome, LoadRequest, Loaded, PendingLoad, Phase,
    ViewController, LOAD_FAILED,
};
pub use document::{HtmlDocument, LOADING_INDICATOR};
pub use target::RenderTarget;
