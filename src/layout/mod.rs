//! Box layout and geometry.
//!
//! # Architecture
//!
//! A parent widget owns at most one [`BoxLayout`]. Its physical child order
//! is the registry's child list; the layout adds:
//!
//! 1. Positional insertion with per-child stretch and alignment
//! 2. Size hints for leaf widgets
//! 3. Flexbox geometry via [Taffy](https://github.com/DioxusLabs/taffy)
//!
//! # Example
//!
//! ```ignore
//! use ranked_panel::layout::{compute_layout, set_layout, BoxLayout};
//! use ranked_panel::Direction;
//!
//! set_layout(parent, BoxLayout::new(Direction::LeftToRight, 0))?;
//! let geometry = compute_layout(parent, 80, 1)?;
//! ```

mod box_layout;
mod taffy_bridge;
mod types;

pub use box_layout::{
    get_layout, get_layout_item, get_size_hint, insert_widget, reset_layouts, set_layout,
    set_size_hint, BoxLayout, LayoutItem,
};
pub(crate) use box_layout::{destroy_layout_state, forget_layout_item, install_layout};
pub use types::*;

pub use taffy_bridge::compute_layout_taffy as compute_layout;
