//! Layout output types.

/// Position and size of one child, relative to its parent, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChildGeometry {
    pub widget: usize,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Result of laying out one box container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComputedLayout {
    /// Container width.
    pub width: u16,
    /// Container height.
    pub height: u16,
    /// One entry per child, in physical child order.
    pub children: Vec<ChildGeometry>,
}

impl ComputedLayout {
    /// Geometry of a specific child, if it was laid out.
    pub fn child(&self, widget: usize) -> Option<&ChildGeometry> {
        self.children.iter().find(|g| g.widget == widget)
    }
}
