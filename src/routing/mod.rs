//! Ordered route table and path rewriting.
//!
//! [`table`] holds the compiled route table built once at startup:
//! rules are evaluated in insertion order and the first matching path
//! predicate wins. [`rewrite`] applies a rule's named-capture-group
//! regex to produce the path forwarded upstream.

pub mod rewrite;
pub mod table;

pub use table::{RouteMatch, RouteTable};
