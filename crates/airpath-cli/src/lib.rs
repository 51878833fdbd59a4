//! airpath CLI library.
//!
//! Text rendering for path results, kept separate from the binary so it can be
//! unit tested.

pub mod output;
