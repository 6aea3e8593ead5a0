//! Scanner, parser, operation tree and the grammar that evaluates it.

pub mod context;
pub mod grammar;
pub mod operation;
pub mod parse;
pub mod scan;
