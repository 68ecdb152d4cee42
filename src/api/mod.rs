//! API Module - Console front end
//!
//! `commands` turns input lines into form edits and prediction triggers;
//! `render` draws the page.

pub mod commands;
pub mod render;
