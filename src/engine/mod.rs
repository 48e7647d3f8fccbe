//! Widget engine - Registry and child messages.
//!
//! The engine manages the widget tree the panel is built on:
//! - Registry: Index allocation, ID mapping, parent/child lists, flags, classes
//! - Messages: Child-removed notifications delivered to parents
//!
//! # Architecture
//!
//! Widgets are NOT objects. They are indices into thread-local tables:
//!
//! ```text
//! Index 0: Panel   (parent=None, children=[2, 1], flags=DISALLOW_LAYOUT_CHANGE)
//! Index 1: Toolbar (parent=0)
//! Index 2: Search  (parent=0)
//! ```
//!
//! A widget handle is its index, and handle identity is index equality.

mod registry;
pub mod messages;

pub use registry::*;
pub use messages::{ChildCallback, ChildMessage, on_child_removed, send_child_removed};
