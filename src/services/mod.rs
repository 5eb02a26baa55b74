//! Business logic services.
//!
//! Services orchestrate the parser and the atom store and provide the
//! high-level parse operation.

pub mod materializer;
mod parse;
mod sequence;

pub use materializer::{LinkageMaterializer, validate_linkage};
pub use parse::ParseService;
pub use sequence::{WordSequence, global_word_sequence};
