//! Report renderers for classification results.
//!
//! - [`terminal`] — colored summary box and result table; respects `--verbose` / `--quiet`.
//! - [`json`] — the classified rows as a pretty-printed JSON array.

pub mod json;
pub mod terminal;
