//! Shell containers.
//!
//! - [`RankedPanel`]: box container ordering children by rank
//! - [`rank`]: rank entries and the upper-bound search

pub mod rank;
mod panel;

pub use panel::{RankedPanel, WidgetOptions, SHELL_PANEL_CLASS};
pub use rank::{rank_cmp, upper_bound, RankEntry};
