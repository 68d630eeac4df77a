//! Xpedia Core -- the ruleset merge engine and catalog builder.
//!
//! A ruleset arrives as an ordered list of partially overlapping documents.
//! This crate reconciles them into one typed, cross-linked, read-only
//! [`ruleset::Ruleset`] that a browser or search front-end can consume.
//!
//! # Parse Pipeline
//!
//! Each call to [`ruleset::Ruleset::parse`] runs these phases, in order:
//!
//! 1. **Merge** -- Section values of all documents are accumulated per section
//!    name; language tables also feed the [`lang::Localization`] table.
//! 2. **Deduplicate** -- Per-entity sections collapse patch fragments that
//!    share a key, honoring tombstones in document order.
//! 3. **Construct** -- Each resolved record becomes a typed entity, registered
//!    under its key. Kinds are constructed in a fixed order because some
//!    constructors wire themselves into kinds built before them.
//! 4. **Link** -- Back-references between kinds are installed once, after
//!    every kind exists. Dangling references are skipped and recorded.
//! 5. **Sort** -- The TYPE catalogue sections are ordered by title.
//!
//! Attack modes are derived lazily per item and memoized for the lifetime of
//! the ruleset.
//!
//! # Key Types
//!
//! - [`ruleset::Ruleset`] -- The finished catalog and its query API.
//! - [`merge::merge_documents`] -- Document Merge Engine.
//! - [`dedup::deduplicate`] -- Record Deduplicator.
//! - [`registry::Registry`] -- Insertion-ordered, key-indexed entity store.
//! - [`catalog::Catalog`] -- Articles and sections.
//! - [`attack::Attack`] -- A derived combat mode of an item.

pub mod attack;
pub mod catalog;
pub mod dedup;
pub mod entity;
pub mod error;
pub mod lang;
pub mod link;
pub mod merge;
pub mod record;
pub mod registry;
pub mod ruleset;
pub mod sprite;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::RulesetError;
pub use record::{Document, Record};
pub use ruleset::{ParseOptions, Ruleset};
