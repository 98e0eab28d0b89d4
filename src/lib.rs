//! Self-balancing ordered maps for Rust.
//!
//! This crate provides three in-memory ordered associative containers, all
//! mapping a unique [`Ord`] key to an arbitrary value:
//!
//! - [`BstMap`] - a plain binary search tree, the baseline ordered structure
//!   with explicit node navigation and no rebalancing
//! - [`AvlMap`] - a height-balanced binary search tree that restores the AVL
//!   invariant with rotations after every insert and remove
//! - [`MultiwayMap`] - a B-tree of configurable order `m`, rebalanced at the
//!   node level by splitting on overflow and borrowing or merging on
//!   underflow
//!
//! The binary maps expose their nodes through copyable [`NodeId`] references:
//! `insert` returns the stored (or pre-existing) node, and in-order
//! neighbors are reachable through `successor`/`predecessor` without
//! materializing a full traversal.
//!
//! # Example
//!
//! ```
//! use sabi_tree::{AvlMap, MultiwayMap};
//!
//! let mut ranks = AvlMap::new();
//! ranks.insert(3, "bronze");
//! ranks.insert(1, "gold");
//! ranks.insert(2, "silver");
//!
//! // Keys come back in ascending order regardless of insertion order.
//! let order: Vec<_> = ranks.keys().copied().collect();
//! assert_eq!(order, [1, 2, 3]);
//!
//! // The multiway map overwrites on duplicate keys and reports removal of
//! // absent keys as a hard error.
//! let mut pages = MultiwayMap::new(2).unwrap();
//! pages.insert(7, "seven");
//! assert_eq!(pages.insert(7, "VII"), Some("seven"));
//! assert!(pages.remove(&9).is_err());
//! ```
//!
//! # Duplicate keys
//!
//! The two binary maps treat an insert of an existing key as a no-op that
//! returns the existing node; the first value wins and callers update it
//! through [`BstMap::value_mut`]/[`AvlMap::value_mut`]. [`MultiwayMap`]
//! instead overwrites and returns the previous value. The same asymmetry
//! applies to removal: the binary maps report an absent key with `None`,
//! while the multiway map returns [`Error::KeyNotFound`]. Both contracts are
//! deliberate; check the map you are using.
//!
//! # Implementation
//!
//! All three trees store their nodes in an arena addressed by niche-optimized
//! index handles, so parent back-references are plain non-owning indices and
//! no reference cycles exist. Values live in an arena of their own, which
//! lets rebalancing move entries between nodes without moving any `V`. None
//! of the structures is safe for concurrent mutation; callers serialize
//! mutating access.

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

mod error;
mod node;
mod raw;

pub mod avl_map;
pub mod bst_map;
pub mod multiway_map;

pub use avl_map::AvlMap;
pub use bst_map::BstMap;
pub use error::Error;
pub use multiway_map::MultiwayMap;
pub use node::{NodeId, Removed};
