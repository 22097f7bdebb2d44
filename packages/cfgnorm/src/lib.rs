//! Normalization of context-free grammars into Chomsky normal form.
//!
//! The pipeline removes empty productions, unit productions, inaccessible and unproductive
//! symbols, then isolates terminals and splits long right-hand sides into binary chains.

pub mod error;
pub mod grammar;
pub mod grammars;
pub mod language;
