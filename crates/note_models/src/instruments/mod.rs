//! Structured product definitions.

pub mod autocallable;
pub mod error;

pub use autocallable::{AutocallableNote, AutocallableNoteBuilder, TerminalPayoff};
pub use error::InstrumentError;
