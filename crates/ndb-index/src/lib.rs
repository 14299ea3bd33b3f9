//! ndb-index
//!
//! In-memory token index: a binary search tree keyed by search term where every
//! node accumulates the tokens (document ids) inserted under its key. See
//! `tree` for insertion and lookup and `node` for the per-key storage.
#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod node;
pub mod tree;

pub use node::{Node, Pair};
pub use tree::{InOrderTokens, Tree};
