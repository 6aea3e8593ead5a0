//! Modifier packs. Each pack exposes plain functions plus a `register`
//! helper that installs them on a [`Grammar`](crate::core::grammar::Grammar).

pub mod en;
