//! Taffy Bridge - Geometry for box layouts via Taffy.
//!
//! Converts a box layout and its children's placement into Taffy styles,
//! runs flexbox computation, and extracts per-child rectangles in the
//! parent's physical child order.

use taffy::{
    AlignSelf as TaffyAlignSelf, AvailableSpace, Dimension as TaffyDimension, Display,
    FlexDirection as TaffyFlexDirection, LengthPercentage, Size, Style, TaffyTree,
};

use crate::engine::get_children;
use crate::error::{Result, WidgetError};
use crate::types::{Alignment, Direction};

use super::box_layout::{get_layout, get_layout_item, get_size_hint, BoxLayout};
use super::types::{ChildGeometry, ComputedLayout};

// =============================================================================
// ENUM CONVERSIONS
// =============================================================================

fn to_taffy_flex_direction(dir: Direction) -> TaffyFlexDirection {
    match dir {
        Direction::TopToBottom => TaffyFlexDirection::Column,
        Direction::LeftToRight => TaffyFlexDirection::Row,
        Direction::BottomToTop => TaffyFlexDirection::ColumnReverse,
        Direction::RightToLeft => TaffyFlexDirection::RowReverse,
    }
}

fn to_taffy_align_self(align: Alignment) -> TaffyAlignSelf {
    match align {
        Alignment::Stretch => TaffyAlignSelf::Stretch,
        Alignment::Start => TaffyAlignSelf::FlexStart,
        Alignment::Center => TaffyAlignSelf::Center,
        Alignment::End => TaffyAlignSelf::FlexEnd,
    }
}

// =============================================================================
// STYLE BUILDING
// =============================================================================

fn container_style(layout: BoxLayout, width: u16, height: u16) -> Style {
    let gap = LengthPercentage::Length(layout.spacing as f32);
    Style {
        display: Display::Flex,
        flex_direction: to_taffy_flex_direction(layout.direction),
        gap: Size { width: gap, height: gap },
        size: Size {
            width: TaffyDimension::Length(width as f32),
            height: TaffyDimension::Length(height as f32),
        },
        ..Default::default()
    }
}

fn child_style(widget: usize) -> Style {
    let item = get_layout_item(widget);
    let size = match get_size_hint(widget) {
        Some((w, h)) => Size {
            width: TaffyDimension::Length(w as f32),
            height: TaffyDimension::Length(h as f32),
        },
        None => Size::auto(),
    };

    Style {
        flex_grow: item.stretch.unwrap_or(0.0),
        align_self: item.alignment.map(to_taffy_align_self),
        size,
        ..Default::default()
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Compute child geometry for the box layout owned by `parent`.
///
/// # Arguments
///
/// * `parent` - Widget owning the box layout
/// * `width` - Container width in cells
/// * `height` - Container height in cells
///
/// # Returns
///
/// One rectangle per child, in the same order as the parent's children.
pub fn compute_layout_taffy(parent: usize, width: u16, height: u16) -> Result<ComputedLayout> {
    let layout = get_layout(parent).ok_or(WidgetError::NoLayout(parent))?;
    let children = get_children(parent);

    let mut tree: TaffyTree<()> = TaffyTree::new();

    let mut nodes = Vec::with_capacity(children.len());
    for &child in &children {
        nodes.push(tree.new_leaf(child_style(child))?);
    }
    let root = tree.new_with_children(container_style(layout, width, height), &nodes)?;

    let available = Size {
        width: AvailableSpace::Definite(width as f32),
        height: AvailableSpace::Definite(height as f32),
    };
    tree.compute_layout(root, available)?;

    let mut result = ComputedLayout {
        width,
        height,
        children: Vec::with_capacity(children.len()),
    };

    for (&widget, &node) in children.iter().zip(&nodes) {
        let node_layout = tree.layout(node)?;
        result.children.push(ChildGeometry {
            widget,
            x: node_layout.location.x.round() as u16,
            y: node_layout.location.y.round() as u16,
            width: node_layout.size.width.round() as u16,
            height: node_layout.size.height.round() as u16,
        });
    }

    Ok(result)
}
