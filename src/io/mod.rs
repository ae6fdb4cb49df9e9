//! Line-oriented text formats for every artifact the pipeline reads or
//! writes (`§6`): word- and bit-level bindings, the word-level function
//! listing, and the gate-level NAND listing.
//!
//! Every format is `LABEL,...` CSV with no header and no quoting — the
//! label grammar in [`crate::signal`] never needs a comma. Parsing
//! reports [`crate::error::Error::MalformedLine`] with the offending file
//! name and 1-based line number rather than panicking, since these files
//! are meant to be hand-editable.

pub mod bits;
pub mod functions;
pub mod nands;
pub mod words;

pub use bits::{parse_bit_bindings, write_bit_bindings};
pub use functions::{parse_functions, write_functions};
pub use nands::{parse_nands, write_nands};
pub use words::{parse_word_bindings, write_word_bindings};
