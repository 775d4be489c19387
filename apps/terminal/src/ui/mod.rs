//! Plain-text rendering of the controller view and parsing of typed input.

pub mod input;
pub mod render;
