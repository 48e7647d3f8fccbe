//! Core types for ranked-panel.
//!
//! These types define the vocabulary shared by the registry, the box layout
//! and the panel: ranks, axis directions, child alignment and widget flags.

use serde::{Deserialize, Serialize};

// =============================================================================
// Rank
// =============================================================================

/// Integer ordering key for a hosted widget.
///
/// Lower ranks sort earlier along the panel's axis.
pub type Rank = i32;

/// Rank used when the caller does not provide one.
pub const DEFAULT_RANK: Rank = 100;

// =============================================================================
// Direction - Layout axis
// =============================================================================

/// Axis and flow direction of a box layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    TopToBottom,
    LeftToRight,
    BottomToTop,
    RightToLeft,
}

// =============================================================================
// Alignment - Cross axis placement of a single child
// =============================================================================

/// Cross-axis alignment for one child of a box layout.
///
/// The panel never interprets this; it is handed to the layout as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    #[default]
    Stretch,
    Start,
    Center,
    End,
}

// =============================================================================
// Widget Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Per-widget state bits kept by the registry.
    ///
    /// Combine with bitwise OR: `WidgetFlags::IS_DISPOSED | WidgetFlags::DISALLOW_LAYOUT_CHANGE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WidgetFlags: u8 {
        /// Set while the widget is being torn down.
        const IS_DISPOSED = 1 << 0;
        /// The widget's layout may not be replaced.
        const DISALLOW_LAYOUT_CHANGE = 1 << 1;
    }
}
