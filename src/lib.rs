//! An AVL order-statistic tree for Rust.
//!
//! [`OSAvlTree`] is an ordered multiset kept as a height-balanced binary search
//! tree in which every node also records the size of its subtree. That extra
//! count turns rank questions into O(log n) descents:
//!
//! - [`get`](OSAvlTree::get) - the value at a sorted position
//! - [`index_of`](OSAvlTree::index_of) - the position of the first equal value
//! - [`remove_at`](OSAvlTree::remove_at) - remove the value at a sorted position
//! - Indexing by [`Rank`] - e.g. `tree[Rank(0)]` for the smallest value
//!
//! # Example
//!
//! ```
//! use avl_ost::{OSAvlTree, Rank};
//!
//! let mut latencies = OSAvlTree::new();
//! for ms in [120, 85, 310, 85, 99] {
//!     latencies.insert(ms);
//! }
//!
//! // Duplicates are kept.
//! assert_eq!(latencies.len(), 5);
//!
//! // The median is the value at rank len / 2.
//! assert_eq!(latencies[Rank(latencies.len() / 2)], 99);
//!
//! // Where does 120 sit?
//! assert_eq!(latencies.index_of(&120), Some(3));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Pluggable ordering** - Any [`Comparator`], including plain closures
//! - **Arena storage** - Nodes live in one `Vec` and link to each other by index
//!
//! # Implementation
//!
//! Nodes carry parent links so that rebalancing can walk upward from the point
//! where an insertion or removal changed the shape. The walk recomputes subtree
//! sizes and heights and applies single or double rotations wherever the two
//! child heights differ by more than one.

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

mod compare;
mod error;
mod order_statistic;
mod raw;

pub mod avl_tree;

pub use avl_tree::OSAvlTree;
pub use compare::{Comparator, NaturalOrder};
pub use error::{Error, ErrorKind};
pub use order_statistic::Rank;
