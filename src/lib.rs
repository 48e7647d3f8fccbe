//! # ranked-panel
//!
//! Rank-ordered widget panels for hosting plugin-contributed UI regions.
//!
//! ## Architecture
//!
//! Widgets are indices into thread-local registry tables, not objects. A
//! panel is a widget with a box layout plus a `(widget, rank)` index kept in
//! lockstep with its physical child list:
//!
//! ```text
//! add_widget ──► detach from old parent ──► upper_bound(rank)
//!            ──► layout::insert_widget(position) ──► index.insert(position)
//!
//! any detach ──► registry bookkeeping ──► child-removed message ──► index.remove
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rank, Direction, Alignment, WidgetFlags)
//! - [`engine`] - Widget registry and child messages
//! - [`layout`] - Box layout and Taffy-backed geometry
//! - [`shell`] - The ranked panel
//! - [`error`] - Error type shared by all of the above

pub mod engine;
pub mod error;
pub mod layout;
pub mod shell;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{Result, WidgetError};

pub use engine::{
    add_class, allocate_widget, child_count, dispose_widget, get_children, get_classes,
    get_flags, get_id, get_index, get_parent, has_class, insert_child, is_allocated,
    on_child_removed, on_destroy, remove_class, reset_registry, set_flag, set_parent, test_flag,
    ChildCallback, ChildMessage,
};

pub use layout::{
    compute_layout, get_layout, insert_widget, set_layout, set_size_hint, BoxLayout,
    ChildGeometry, ComputedLayout, LayoutItem,
};

pub use shell::{rank_cmp, upper_bound, RankEntry, RankedPanel, WidgetOptions, SHELL_PANEL_CLASS};
