//! Red-black tree map and word cross-reference tooling for Rust.
//!
//! This crate provides [`RBTreeMap`], an ordered map kept balanced by the
//! red-black rules, whose ordering is a pluggable [`Comparator`] strategy
//! rather than a fixed `Ord` bound. Around it sit two small collaborators:
//!
//! - [`UniqueList`] - an append-only sequence that drops repeated values
//! - [`TextAnalyzer`] - builds a word → line-numbers index from text and
//!   prints it as a cross-reference table (requires the `std` feature)
//!
//! # Example
//!
//! ```
//! use cross_refs::{Error, RBTreeMap};
//!
//! let mut ages = RBTreeMap::new();
//! ages.insert("Carol", 41);
//! ages.insert("Alice", 33);
//! ages.insert("Bob", 27);
//!
//! // Overwriting keeps one entry per key.
//! assert_eq!(ages.insert("Bob", 28), Some(27));
//! assert_eq!(ages.len(), 3);
//!
//! // Iteration is ascending under the comparator.
//! let names: Vec<_> = ages.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob", "Carol"]);
//!
//! // Absent keys are an error on the checked path.
//! assert_eq!(ages.try_get(&"Dave"), Err(Error::KeyNotFound));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - The map and list only require `alloc`
//! - **`std`** (default) - Enables [`TextAnalyzer`] and the `cross_refs` binary
//!
//! # Implementation
//!
//! Nodes live in a slot arena and link to each other through compact
//! handles, so parent back-references are plain indices and rotations are
//! handle reassignment. Freed slots are recycled through a free list.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

pub mod compare;
mod error;
mod raw;

pub mod rbtree_map;
#[cfg(feature = "std")]
pub mod text_analyzer;
pub mod unique_list;

pub use compare::{Comparator, Natural};
pub use error::Error;
pub use rbtree_map::RBTreeMap;
#[cfg(feature = "std")]
pub use text_analyzer::{AnalysisError, TextAnalyzer};
pub use unique_list::UniqueList;
