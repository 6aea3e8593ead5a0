//! Tracery — a generative grammar engine for procedural text.
//!
//! Grammar source text embeds symbol references (`#name#`), local
//! assignment (`[name:value]`, `[name:POP]`) and chainable modifiers
//! (`#name.a.capitalize#`). A [`Grammar`] expands that text by randomized
//! recursive substitution against its per-symbol value stacks.

pub mod core;
pub mod modifiers;
pub mod schema;

pub use crate::core::context::{Context, RandomSource, SeededRandom};
pub use crate::core::grammar::{Grammar, GrammarBuilder};
pub use crate::core::operation::{ModifierCall, Operation};
pub use crate::schema::rule_set::{Rule, RuleSet, RuleSetError};
