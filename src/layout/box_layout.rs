//! Box Layout - Arranges a widget's children along one axis.
//!
//! A box layout is attached to a parent widget. The parent's child list in
//! the registry is the physical order; the layout adds per-child placement
//! (stretch, alignment, size hint) and positional insertion.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::engine::{insert_child, is_allocated, test_flag};
use crate::error::{Result, WidgetError};
use crate::types::{Alignment, Direction, WidgetFlags};

/// Axis configuration of a box layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoxLayout {
    /// Direction children flow in.
    pub direction: Direction,
    /// Gap between adjacent children, in cells.
    pub spacing: u16,
}

impl BoxLayout {
    pub const fn new(direction: Direction, spacing: u16) -> Self {
        Self { direction, spacing }
    }
}

/// Placement of one child inside its parent's box layout.
///
/// Written by [`insert_widget`]; both fields are opaque to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutItem {
    /// Flex grow factor. `None` means the child keeps its size hint.
    pub stretch: Option<f32>,
    /// Cross-axis alignment. `None` inherits the layout default (stretch).
    pub alignment: Option<Alignment>,
}

// =============================================================================
// Layout State
// =============================================================================

thread_local! {
    /// Parent index → box layout.
    static LAYOUTS: RefCell<HashMap<usize, BoxLayout>> = RefCell::new(HashMap::new());

    /// Child index → placement inside its parent.
    static LAYOUT_ITEMS: RefCell<HashMap<usize, LayoutItem>> = RefCell::new(HashMap::new());

    /// Widget index → preferred (width, height) in cells.
    static SIZE_HINTS: RefCell<HashMap<usize, (u16, u16)>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Layout Assignment
// =============================================================================

/// Replace the box layout of a widget.
///
/// Fails with [`WidgetError::LayoutChangeDisallowed`] when the widget carries
/// [`WidgetFlags::DISALLOW_LAYOUT_CHANGE`].
pub fn set_layout(index: usize, layout: BoxLayout) -> Result<()> {
    if !is_allocated(index) {
        return Err(WidgetError::NotAllocated(index));
    }
    if test_flag(index, WidgetFlags::DISALLOW_LAYOUT_CHANGE) {
        return Err(WidgetError::LayoutChangeDisallowed(index));
    }
    install_layout(index, layout);
    Ok(())
}

/// Attach a layout without consulting the widget's flags.
///
/// Used by widgets that configure their own layout during construction,
/// before they lock it.
pub(crate) fn install_layout(index: usize, layout: BoxLayout) {
    LAYOUTS.with(|layouts| {
        layouts.borrow_mut().insert(index, layout);
    });
}

/// Get the box layout of a widget, if it has one.
pub fn get_layout(index: usize) -> Option<BoxLayout> {
    LAYOUTS.with(|layouts| layouts.borrow().get(&index).copied())
}

// =============================================================================
// Positional Insertion
// =============================================================================

/// Insert `widget` as a child of `parent` at `position`.
///
/// The widget is detached from any previous parent first (see
/// [`insert_child`]). `stretch` and `alignment` are stored as-is.
///
/// # Arguments
/// * `parent` - Widget owning the box layout
/// * `position` - Target child position, `0..=child_count(parent)`
/// * `widget` - Widget to insert
/// * `stretch` - Optional flex grow factor
/// * `alignment` - Optional cross-axis alignment
pub fn insert_widget(
    parent: usize,
    position: usize,
    widget: usize,
    stretch: Option<f32>,
    alignment: Option<Alignment>,
) -> Result<()> {
    if !is_allocated(parent) {
        return Err(WidgetError::NotAllocated(parent));
    }
    if get_layout(parent).is_none() {
        return Err(WidgetError::NoLayout(parent));
    }

    insert_child(parent, position, widget)?;

    LAYOUT_ITEMS.with(|items| {
        items.borrow_mut().insert(widget, LayoutItem { stretch, alignment });
    });
    Ok(())
}

/// Drop the placement of a child that left its parent.
///
/// Called by the registry on every detach; stretch and alignment belong to
/// one insertion and are not carried to the next parent.
pub(crate) fn forget_layout_item(widget: usize) {
    LAYOUT_ITEMS.with(|items| {
        items.borrow_mut().remove(&widget);
    });
}

/// Get the placement of a child (default if it was never inserted through a layout).
pub fn get_layout_item(widget: usize) -> LayoutItem {
    LAYOUT_ITEMS.with(|items| items.borrow().get(&widget).copied().unwrap_or_default())
}

// =============================================================================
// Size Hints
// =============================================================================

/// Set the preferred size of a widget in cells.
pub fn set_size_hint(index: usize, width: u16, height: u16) {
    SIZE_HINTS.with(|hints| {
        hints.borrow_mut().insert(index, (width, height));
    });
}

/// Get the preferred size of a widget, if one was set.
pub fn get_size_hint(index: usize) -> Option<(u16, u16)> {
    SIZE_HINTS.with(|hints| hints.borrow().get(&index).copied())
}

// =============================================================================
// Cleanup
// =============================================================================

/// Drop all layout state for a disposed widget.
///
/// Called by the registry during disposal.
pub(crate) fn destroy_layout_state(index: usize) {
    LAYOUTS.with(|layouts| {
        layouts.borrow_mut().remove(&index);
    });
    LAYOUT_ITEMS.with(|items| {
        items.borrow_mut().remove(&index);
    });
    SIZE_HINTS.with(|hints| {
        hints.borrow_mut().remove(&index);
    });
}

/// Reset all layout state (for testing).
pub fn reset_layouts() {
    LAYOUTS.with(|layouts| layouts.borrow_mut().clear());
    LAYOUT_ITEMS.with(|items| items.borrow_mut().clear());
    SIZE_HINTS.with(|hints| hints.borrow_mut().clear());
}
