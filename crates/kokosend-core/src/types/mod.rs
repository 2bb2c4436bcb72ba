//! Core type definitions for KokoSend.

mod destination;
mod history;

pub use destination::*;
pub use history::*;
