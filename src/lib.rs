//! Static site builder for markdown content with per-node render overrides.
//!
//! A site declares which markdown node kinds (`h2`, `a`, `img`, `pre`, ...)
//! are rendered by which component. The table is validated once into an
//! immutable [`registry::Overrides`] and consulted for every node during the
//! build.

pub mod build;
pub mod components;
pub mod config;
pub mod registry;
