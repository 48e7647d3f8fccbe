//! Ranked Panel - A box container ordering its children by rank.
//!
//! Hosts widgets contributed by independent sources (plugins, extensions)
//! along one axis. Callers don't control the order in which widgets arrive,
//! only the rank they want; the panel keeps children sorted by rank, with
//! equal ranks kept in arrival order.
//!
//! # Example
//!
//! ```ignore
//! use ranked_panel::{allocate_widget, Direction, RankedPanel, WidgetOptions};
//!
//! let toolbar = RankedPanel::new(Direction::LeftToRight);
//!
//! let search = allocate_widget(Some("search"));
//! let save = allocate_widget(Some("save"));
//!
//! toolbar.add_widget(search, WidgetOptions::default())?;          // rank 100
//! toolbar.add_widget(save, WidgetOptions::new().with_rank(10))?;  // goes first
//!
//! assert_eq!(toolbar.widgets(), vec![save, search]);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::engine::{
    add_class, allocate_widget, dispose_widget, is_allocated, on_child_removed, on_destroy,
    set_flag, set_parent, ChildMessage,
};
use crate::error::{Result, WidgetError};
use crate::layout::{self, install_layout, BoxLayout, ComputedLayout};
use crate::types::{Alignment, Direction, Rank, WidgetFlags, DEFAULT_RANK};

use super::rank::{upper_bound, RankEntry};

/// Class name added to every ranked panel.
pub const SHELL_PANEL_CLASS: &str = "p-ShellPanel";

// =============================================================================
// Widget Options
// =============================================================================

/// Placement options for [`RankedPanel::add_widget`].
///
/// Every field is optional, so plugin manifests can carry just the parts they
/// care about:
///
/// ```json
/// { "rank": 50, "stretch": 1.0, "alignment": "center" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetOptions {
    /// Layout rank. Defaults to [`DEFAULT_RANK`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<Rank>,

    /// Layout stretch factor, handed to the box layout unmodified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stretch: Option<f32>,

    /// Layout alignment, handed to the box layout unmodified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl WidgetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn with_stretch(mut self, stretch: f32) -> Self {
        self.stretch = Some(stretch);
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }
}

// =============================================================================
// Ranked Panel
// =============================================================================

/// A panel whose children are ordered by rank.
///
/// The panel keeps an ordered `(widget, rank)` index next to the registry's
/// child list. Invariants, after every call and every child-removed message:
///
/// - ranks in the index are non-decreasing
/// - `entries()[i].widget == get_children(panel.index())[i]` for every `i`
///
/// Cloning yields another handle to the same panel.
#[derive(Debug, Clone)]
pub struct RankedPanel {
    index: usize,
    direction: Direction,
    entries: Rc<RefCell<Vec<RankEntry>>>,
    disposed: Rc<Cell<bool>>,
}

impl RankedPanel {
    /// Create a panel laying out its children in `direction` with no spacing.
    ///
    /// The panel's layout is locked: [`layout::set_layout`] on it fails.
    pub fn new(direction: Direction) -> Self {
        let index = allocate_widget(None);
        add_class(index, SHELL_PANEL_CLASS);
        install_layout(index, BoxLayout::new(direction, 0));
        set_flag(index, WidgetFlags::DISALLOW_LAYOUT_CHANGE);

        let entries = Rc::new(RefCell::new(Vec::new()));
        let tracked = Rc::clone(&entries);
        on_child_removed(
            index,
            Rc::new(move |msg: &ChildMessage| remove_entry(index, &tracked, msg.child)),
        );

        // Disposal may come from an ancestor rather than from `dispose()`
        let disposed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&disposed);
        on_destroy(index, move || flag.set(true));

        tracing::debug!(panel = index, ?direction, "created ranked panel");

        Self {
            index,
            direction,
            entries,
            disposed,
        }
    }

    /// Registry index of the panel widget.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Add a widget to the panel.
    ///
    /// Widgets are ordered from lowest to highest rank in the direction of
    /// the panel. A widget with the same rank as existing ones goes after
    /// all of them. The widget is removed from its current parent first;
    /// adding a widget that is already in this panel moves it to the
    /// position of its new rank.
    pub fn add_widget(&self, widget: usize, options: WidgetOptions) -> Result<()> {
        if self.disposed.get() {
            return Err(WidgetError::Disposed(self.index));
        }

        // Fires the old parent's child-removed handlers, possibly our own
        set_parent(widget, None)?;

        let rank = options.rank.unwrap_or(DEFAULT_RANK);
        let position = upper_bound(&self.entries.borrow(), rank);

        layout::insert_widget(self.index, position, widget, options.stretch, options.alignment)?;
        self.entries.borrow_mut().insert(position, RankEntry { widget, rank });

        tracing::debug!(panel = self.index, widget, rank, position, "added widget");
        Ok(())
    }

    /// Number of hosted widgets.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Hosted widgets in rank order.
    pub fn widgets(&self) -> Vec<usize> {
        self.entries.borrow().iter().map(|e| e.widget).collect()
    }

    /// Snapshot of the ordered `(widget, rank)` index.
    pub fn entries(&self) -> Vec<RankEntry> {
        self.entries.borrow().clone()
    }

    /// Rank a hosted widget was added with.
    pub fn rank_of(&self, widget: usize) -> Option<Rank> {
        self.entries
            .borrow()
            .iter()
            .find(|e| e.widget == widget)
            .map(|e| e.rank)
    }

    pub fn contains(&self, widget: usize) -> bool {
        self.rank_of(widget).is_some()
    }

    /// Compute child geometry for a panel of the given size.
    pub fn compute_layout(&self, width: u16, height: u16) -> Result<ComputedLayout> {
        if self.disposed.get() {
            return Err(WidgetError::Disposed(self.index));
        }
        layout::compute_layout(self.index, width, height)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get() || !is_allocated(self.index)
    }

    /// Dispose the panel.
    ///
    /// Clears the rank index and then disposes the panel widget, which in
    /// turn disposes whatever children it still has. Safe to call repeatedly.
    pub fn dispose(&self) {
        if self.disposed.get() {
            return;
        }
        self.entries.borrow_mut().clear();
        dispose_widget(self.index);
        tracing::debug!(panel = self.index, "disposed ranked panel");
    }
}

/// Child-removed handler: drop the entry for `widget`, if tracked.
fn remove_entry(panel: usize, entries: &RefCell<Vec<RankEntry>>, widget: usize) {
    let mut entries = entries.borrow_mut();
    match entries.iter().position(|e| e.widget == widget) {
        Some(position) => {
            let entry = entries.remove(position);
            tracing::debug!(panel, widget, rank = entry.rank, position, "removed widget");
        }
        None => {
            tracing::trace!(panel, widget, "ignoring removal of untracked widget");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{get_children, get_parent, has_class, reset_registry, test_flag};
    use crate::engine::send_child_removed;
    use crate::layout::{get_layout_item, set_layout, set_size_hint};

    fn setup() {
        reset_registry();
    }

    fn add_ranked(panel: &RankedPanel, ranks: &[Rank]) -> Vec<usize> {
        ranks
            .iter()
            .map(|&rank| {
                let w = allocate_widget(None);
                panel.add_widget(w, WidgetOptions::new().with_rank(rank)).unwrap();
                w
            })
            .collect()
    }

    fn assert_in_sync(panel: &RankedPanel) {
        assert_eq!(panel.widgets(), get_children(panel.index()));
    }

    #[test]
    fn test_construction() {
        setup();

        let panel = RankedPanel::new(Direction::LeftToRight);
        assert!(panel.is_empty());
        assert!(has_class(panel.index(), SHELL_PANEL_CLASS));
        assert!(test_flag(panel.index(), WidgetFlags::DISALLOW_LAYOUT_CHANGE));
        assert!(matches!(
            set_layout(panel.index(), BoxLayout::default()),
            Err(WidgetError::LayoutChangeDisallowed(_))
        ));
    }

    #[test]
    fn test_orders_by_rank() {
        setup();

        let panel = RankedPanel::new(Direction::TopToBottom);
        let w = add_ranked(&panel, &[30, 10, 20]);

        assert_eq!(panel.widgets(), vec![w[1], w[2], w[0]]);
        assert_in_sync(&panel);
    }

    #[test]
    fn test_equal_ranks_keep_arrival_order() {
        setup();

        let panel = RankedPanel::new(Direction::TopToBottom);
        let w = add_ranked(&panel, &[1, 5, 5, 9]);
        let new = add_ranked(&panel, &[5])[0];

        let ranks: Vec<Rank> = panel.entries().iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 5, 5, 5, 9]);
        assert_eq!(panel.widgets(), vec![w[0], w[1], w[2], new, w[3]]);
        assert_in_sync(&panel);
    }

    #[test]
    fn test_default_rank() {
        setup();

        let panel = RankedPanel::new(Direction::TopToBottom);
        let w = add_ranked(&panel, &[99, 101]);
        let default = allocate_widget(None);
        panel.add_widget(default, WidgetOptions::default()).unwrap();

        assert_eq!(panel.rank_of(default), Some(DEFAULT_RANK));
        assert_eq!(panel.widgets(), vec![w[0], default, w[1]]);
    }

    #[test]
    fn test_options_forwarded_to_layout() {
        setup();

        let panel = RankedPanel::new(Direction::LeftToRight);
        let w = allocate_widget(None);
        panel
            .add_widget(w, WidgetOptions::new().with_stretch(2.0).with_alignment(Alignment::End))
            .unwrap();

        let item = get_layout_item(w);
        assert_eq!(item.stretch, Some(2.0));
        assert_eq!(item.alignment, Some(Alignment::End));
    }

    #[test]
    fn test_external_detach_removes_entry() {
        setup();

        let panel = RankedPanel::new(Direction::TopToBottom);
        let w = add_ranked(&panel, &[3, 7]);

        set_parent(w[0], None).unwrap();

        assert_eq!(panel.widgets(), vec![w[1]]);
        assert_in_sync(&panel);
    }

    #[test]
    fn test_readding_moves_to_new_rank() {
        setup();

        let panel = RankedPanel::new(Direction::TopToBottom);
        let w = add_ranked(&panel, &[10, 20, 30]);

        panel.add_widget(w[0], WidgetOptions::new().with_rank(25)).unwrap();

        assert_eq!(panel.widgets(), vec![w[1], w[0], w[2]]);
        assert_eq!(panel.rank_of(w[0]), Some(25));
        assert_eq!(panel.len(), 3);
        assert_in_sync(&panel);
    }

    #[test]
    fn test_child_dispose_removes_entry() {
        setup();

        let panel = RankedPanel::new(Direction::TopToBottom);
        let w = add_ranked(&panel, &[1, 2, 3]);

        dispose_widget(w[1]);

        assert_eq!(panel.widgets(), vec![w[0], w[2]]);
        assert_in_sync(&panel);
    }

    #[test]
    fn test_unknown_removal_is_ignored() {
        setup();

        let panel = RankedPanel::new(Direction::TopToBottom);
        let w = add_ranked(&panel, &[1, 2]);
        let stranger = allocate_widget(None);

        send_child_removed(ChildMessage { parent: panel.index(), child: stranger });

        assert_eq!(panel.widgets(), w);
    }

    #[test]
    fn test_dispose() {
        setup();

        let panel = RankedPanel::new(Direction::TopToBottom);
        let w = add_ranked(&panel, &[1, 2]);

        panel.dispose();
        panel.dispose();

        assert!(panel.is_disposed());
        assert!(panel.is_empty());
        assert!(!is_allocated(w[0]));

        let late = allocate_widget(None);
        assert!(matches!(
            panel.add_widget(late, WidgetOptions::default()),
            Err(WidgetError::Disposed(_))
        ));
    }

    #[test]
    fn test_dispose_through_parent() {
        setup();

        let root = allocate_widget(None);
        let panel = RankedPanel::new(Direction::TopToBottom);
        set_parent(panel.index(), Some(root)).unwrap();

        dispose_widget(root);
        assert!(panel.is_disposed());

        // Index may be reused; the stale handle must not touch it
        let reused = allocate_widget(None);
        panel.dispose();
        assert!(is_allocated(reused));
    }

    #[test]
    fn test_stale_handle_does_not_lay_out_reused_index() {
        setup();

        let root = allocate_widget(None);
        let panel = RankedPanel::new(Direction::LeftToRight);
        set_parent(panel.index(), Some(root)).unwrap();
        dispose_widget(root);

        // Both freed indices are handed out again
        let first = allocate_widget(None);
        let second = allocate_widget(None);
        let owner = if first == panel.index() { first } else { second };
        assert_eq!(owner, panel.index());
        set_layout(owner, BoxLayout::default()).unwrap();
        let foreign = allocate_widget(None);
        set_parent(foreign, Some(owner)).unwrap();

        assert!(matches!(
            panel.compute_layout(40, 1),
            Err(WidgetError::Disposed(_))
        ));
        assert!(panel.widgets().is_empty());
        assert_eq!(get_children(owner), vec![foreign]);
    }

    #[test]
    fn test_invalid_widget_leaves_index_unchanged() {
        setup();

        let panel = RankedPanel::new(Direction::TopToBottom);
        let w = add_ranked(&panel, &[1]);
        let gone = allocate_widget(None);
        dispose_widget(gone);

        assert!(panel.add_widget(gone, WidgetOptions::default()).is_err());
        assert!(matches!(
            panel.add_widget(panel.index(), WidgetOptions::default()),
            Err(WidgetError::Cycle { .. })
        ));
        assert_eq!(panel.widgets(), w);
        assert_in_sync(&panel);
    }

    #[test]
    fn test_geometry_follows_rank() {
        setup();

        let panel = RankedPanel::new(Direction::LeftToRight);
        let late = allocate_widget(None);
        let early = allocate_widget(None);
        set_size_hint(late, 8, 1);
        set_size_hint(early, 4, 1);

        panel.add_widget(late, WidgetOptions::new().with_rank(50)).unwrap();
        panel.add_widget(early, WidgetOptions::new().with_rank(5)).unwrap();

        let layout = panel.compute_layout(40, 1).unwrap();
        assert_eq!(layout.child(early).unwrap().x, 0);
        assert_eq!(layout.child(late).unwrap().x, 4);
        assert_eq!(get_parent(early), Some(panel.index()));
    }
}
