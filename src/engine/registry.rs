//! Widget Registry - Index allocation and the widget tree.
//!
//! Manages the lifecycle of widget indices:
//! - ID ↔ Index bidirectional mapping
//! - Free index pool for O(1) reuse
//! - Parent pointers and ordered child lists
//! - Flag bits and class tags
//! - Idempotent disposal with destroy callbacks
//!
//! A widget has at most one parent. Moving it anywhere (including to no
//! parent) first removes it from the old parent's child list and then sends
//! that parent a child-removed message.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::messages::{self, ChildMessage};
use crate::error::{Result, WidgetError};
use crate::layout;
use crate::types::WidgetFlags;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map widget ID to index.
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Map index to widget ID.
    static INDEX_TO_ID: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());

    /// Set of currently allocated indices.
    static ALLOCATED_INDICES: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Next index to allocate if pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Counter for generating unique IDs.
    static ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };

    /// Child index → parent index.
    static PARENTS: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());

    /// Parent index → children in physical order.
    static CHILDREN: RefCell<HashMap<usize, Vec<usize>>> = RefCell::new(HashMap::new());

    /// Flag bits per index.
    static FLAGS: RefCell<HashMap<usize, WidgetFlags>> = RefCell::new(HashMap::new());

    /// Class tags per index, in the order they were added.
    static CLASSES: RefCell<HashMap<usize, Vec<String>>> = RefCell::new(HashMap::new());

    /// Destroy callbacks registered per index.
    static DESTROY_CALLBACKS: RefCell<HashMap<usize, Vec<Box<dyn FnOnce()>>>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Index Allocation
// =============================================================================

/// Allocate an index for a new widget.
///
/// # Arguments
/// * `id` - Optional widget ID. If not provided, one is generated.
///
/// # Returns
/// The allocated index. Allocating an ID that is already live returns the
/// existing index.
pub fn allocate_widget(id: Option<&str>) -> usize {
    let widget_id = match id {
        Some(id) => id.to_string(),
        None => ID_COUNTER.with(|counter| {
            let mut counter = counter.borrow_mut();
            let id = format!("w{}", *counter);
            *counter += 1;
            id
        }),
    };

    let existing = ID_TO_INDEX.with(|map| map.borrow().get(&widget_id).copied());
    if let Some(index) = existing {
        return index;
    }

    // Reuse free index or allocate new
    let index = FREE_INDICES.with(|free| {
        free.borrow_mut().pop().unwrap_or_else(|| {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        })
    });

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().insert(widget_id.clone(), index);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().insert(index, widget_id);
    });
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().insert(index);
    });

    index
}

/// Check that a widget is allocated and not being disposed.
fn ensure_live(index: usize) -> Result<()> {
    if !is_allocated(index) {
        return Err(WidgetError::NotAllocated(index));
    }
    if test_flag(index, WidgetFlags::IS_DISPOSED) {
        return Err(WidgetError::Disposed(index));
    }
    Ok(())
}

// =============================================================================
// Widget Tree
// =============================================================================

/// Get the parent of a widget, if any.
pub fn get_parent(index: usize) -> Option<usize> {
    PARENTS.with(|parents| parents.borrow().get(&index).copied())
}

/// Get the children of a widget in physical order.
pub fn get_children(index: usize) -> Vec<usize> {
    CHILDREN.with(|children| children.borrow().get(&index).cloned().unwrap_or_default())
}

/// Number of children of a widget.
pub fn child_count(index: usize) -> usize {
    CHILDREN.with(|children| children.borrow().get(&index).map_or(0, Vec::len))
}

/// Check whether `ancestor` is `index` or lies above it in the tree.
fn is_ancestor_or_self(ancestor: usize, index: usize) -> bool {
    let mut current = Some(index);
    while let Some(node) = current {
        if node == ancestor {
            return true;
        }
        current = get_parent(node);
    }
    false
}

fn check_cycle(parent: usize, child: usize) -> Result<()> {
    if is_ancestor_or_self(child, parent) {
        return Err(WidgetError::Cycle { parent, child });
    }
    Ok(())
}

/// Remove a widget from its parent's child list and notify the parent.
///
/// The bookkeeping (including the child's layout placement) is finished
/// before the message is sent, so handlers see the tree without the child.
fn detach(child: usize) {
    let Some(parent) = PARENTS.with(|parents| parents.borrow_mut().remove(&child)) else {
        return;
    };

    CHILDREN.with(|children| {
        if let Some(list) = children.borrow_mut().get_mut(&parent) {
            list.retain(|&c| c != child);
        }
    });
    layout::forget_layout_item(child);

    tracing::trace!(parent, child, "detached");
    messages::send_child_removed(ChildMessage { parent, child });
}

/// Set (or clear) the parent of a widget.
///
/// The widget is appended to the end of the new parent's children. Setting
/// the current parent again is a no-op.
pub fn set_parent(child: usize, parent: Option<usize>) -> Result<()> {
    ensure_live(child)?;
    if let Some(parent) = parent {
        ensure_live(parent)?;
        check_cycle(parent, child)?;
    }

    if parent.is_some() && get_parent(child) == parent {
        return Ok(());
    }

    detach(child);

    if let Some(parent) = parent {
        let position = child_count(parent);
        attach(parent, position, child);
    }
    Ok(())
}

/// Insert a widget into `parent`'s children at `position`.
///
/// The widget is first detached from its current parent, even if that is
/// `parent` itself. `position` is validated against the child list as it
/// will be after the detach.
pub fn insert_child(parent: usize, position: usize, child: usize) -> Result<()> {
    ensure_live(parent)?;
    ensure_live(child)?;
    check_cycle(parent, child)?;

    let mut len = child_count(parent);
    if get_parent(child) == Some(parent) {
        len -= 1;
    }
    if position > len {
        return Err(WidgetError::IndexOutOfRange { index: position, len });
    }

    detach(child);
    attach(parent, position, child);
    Ok(())
}

fn attach(parent: usize, position: usize, child: usize) {
    CHILDREN.with(|children| {
        children.borrow_mut().entry(parent).or_default().insert(position, child);
    });
    PARENTS.with(|parents| {
        parents.borrow_mut().insert(child, parent);
    });
    tracing::trace!(parent, child, position, "attached");
}

// =============================================================================
// Flags
// =============================================================================

/// Get the flag bits of a widget.
pub fn get_flags(index: usize) -> WidgetFlags {
    FLAGS.with(|flags| flags.borrow().get(&index).copied().unwrap_or_default())
}

/// Set flag bits on a widget.
pub fn set_flag(index: usize, flag: WidgetFlags) {
    if !is_allocated(index) {
        return;
    }
    FLAGS.with(|flags| {
        *flags.borrow_mut().entry(index).or_default() |= flag;
    });
}

/// Clear flag bits on a widget.
pub fn clear_flag(index: usize, flag: WidgetFlags) {
    FLAGS.with(|flags| {
        if let Some(bits) = flags.borrow_mut().get_mut(&index) {
            bits.remove(flag);
        }
    });
}

/// Check whether all bits of `flag` are set on a widget.
pub fn test_flag(index: usize, flag: WidgetFlags) -> bool {
    get_flags(index).contains(flag)
}

// =============================================================================
// Classes
// =============================================================================

/// Tag a widget with a class name. Duplicate names are ignored.
pub fn add_class(index: usize, name: &str) {
    if !is_allocated(index) {
        return;
    }
    CLASSES.with(|classes| {
        let mut classes = classes.borrow_mut();
        let list = classes.entry(index).or_default();
        if !list.iter().any(|c| c == name) {
            list.push(name.to_string());
        }
    });
}

/// Remove a class name from a widget.
pub fn remove_class(index: usize, name: &str) {
    CLASSES.with(|classes| {
        if let Some(list) = classes.borrow_mut().get_mut(&index) {
            list.retain(|c| c != name);
        }
    });
}

pub fn has_class(index: usize, name: &str) -> bool {
    CLASSES.with(|classes| {
        classes
            .borrow()
            .get(&index)
            .is_some_and(|list| list.iter().any(|c| c == name))
    })
}

pub fn get_classes(index: usize) -> Vec<String> {
    CLASSES.with(|classes| classes.borrow().get(&index).cloned().unwrap_or_default())
}

// =============================================================================
// Disposal
// =============================================================================

/// Register a callback to run when the widget at `index` is disposed.
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) {
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(index)
            .or_default()
            .push(Box::new(callback));
    });
}

/// Run and clear destroy callbacks for an index.
fn run_destroy_callbacks(index: usize) {
    let callbacks = DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().remove(&index));
    if let Some(callbacks) = callbacks {
        for callback in callbacks {
            callback();
        }
    }
}

/// Dispose a widget and, recursively, its children.
///
/// Safe to call more than once. Order:
/// 1. mark `IS_DISPOSED`
/// 2. detach from the parent (the parent gets a child-removed message)
/// 3. dispose children (this widget gets a child-removed message per child)
/// 4. run destroy callbacks
/// 5. drop handlers, layout state and mappings, and free the index
pub fn dispose_widget(index: usize) {
    if !is_allocated(index) || test_flag(index, WidgetFlags::IS_DISPOSED) {
        return;
    }
    set_flag(index, WidgetFlags::IS_DISPOSED);
    tracing::debug!(widget = index, "disposing widget");

    detach(index);

    for child in get_children(index) {
        dispose_widget(child);
    }

    run_destroy_callbacks(index);

    messages::clear_handlers(index);
    layout::destroy_layout_state(index);

    CHILDREN.with(|children| {
        children.borrow_mut().remove(&index);
    });
    FLAGS.with(|flags| {
        flags.borrow_mut().remove(&index);
    });
    CLASSES.with(|classes| {
        classes.borrow_mut().remove(&index);
    });
    let id = INDEX_TO_ID.with(|map| map.borrow_mut().remove(&index));
    if let Some(id) = id {
        ID_TO_INDEX.with(|map| {
            map.borrow_mut().remove(&id);
        });
    }
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().remove(&index);
    });

    // Return to pool for reuse
    FREE_INDICES.with(|free| {
        free.borrow_mut().push(index);
    });
}

// =============================================================================
// Lookups
// =============================================================================

/// Get index for a widget ID.
pub fn get_index(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

/// Get ID for an index.
pub fn get_id(index: usize) -> Option<String> {
    INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED_INDICES.with(|set| set.borrow().contains(&index))
}

/// Get the count of currently allocated widgets.
pub fn get_allocated_count() -> usize {
    ALLOCATED_INDICES.with(|set| set.borrow().len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_registry() {
    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    INDEX_TO_ID.with(|map| map.borrow_mut().clear());
    ALLOCATED_INDICES.with(|set| set.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    ID_COUNTER.with(|counter| *counter.borrow_mut() = 0);
    PARENTS.with(|parents| parents.borrow_mut().clear());
    CHILDREN.with(|children| children.borrow_mut().clear());
    FLAGS.with(|flags| flags.borrow_mut().clear());
    CLASSES.with(|classes| classes.borrow_mut().clear());
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().clear());
    messages::reset_messages();
    layout::reset_layouts();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_allocate_widget() {
        reset_registry();

        let w1 = allocate_widget(None);
        let w2 = allocate_widget(None);
        let w3 = allocate_widget(Some("toolbar"));

        assert_eq!((w1, w2, w3), (0, 1, 2));
        assert_eq!(get_allocated_count(), 3);
        assert_eq!(get_index("toolbar"), Some(w3));
        assert_eq!(get_id(w1), Some("w0".to_string()));

        // Same ID returns the same index
        assert_eq!(allocate_widget(Some("toolbar")), w3);
    }

    #[test]
    fn test_dispose_and_reuse() {
        reset_registry();

        let w1 = allocate_widget(None);
        let w2 = allocate_widget(None);

        dispose_widget(w1);
        assert!(!is_allocated(w1));
        assert!(is_allocated(w2));

        // Freed index is reused
        assert_eq!(allocate_widget(None), w1);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        reset_registry();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let w = allocate_widget(None);
        on_destroy(w, move || count_clone.set(count_clone.get() + 1));

        dispose_widget(w);
        dispose_widget(w);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_insert_child_positions() {
        reset_registry();

        let parent = allocate_widget(None);
        let a = allocate_widget(None);
        let b = allocate_widget(None);
        let c = allocate_widget(None);

        insert_child(parent, 0, a).unwrap();
        insert_child(parent, 0, b).unwrap();
        insert_child(parent, 1, c).unwrap();

        assert_eq!(get_children(parent), vec![b, c, a]);
        assert_eq!(get_parent(c), Some(parent));
    }

    #[test]
    fn test_insert_child_out_of_range() {
        reset_registry();

        let parent = allocate_widget(None);
        let a = allocate_widget(None);

        let err = insert_child(parent, 1, a).unwrap_err();
        assert!(matches!(err, WidgetError::IndexOutOfRange { index: 1, len: 0 }));
        assert_eq!(get_parent(a), None);
    }

    #[test]
    fn test_move_within_same_parent() {
        reset_registry();

        let parent = allocate_widget(None);
        let a = allocate_widget(None);
        let b = allocate_widget(None);
        set_parent(a, Some(parent)).unwrap();
        set_parent(b, Some(parent)).unwrap();

        // Two children, moving one: last valid position is 1
        insert_child(parent, 1, a).unwrap();
        assert_eq!(get_children(parent), vec![b, a]);
    }

    #[test]
    fn test_reparent_notifies_old_parent() {
        reset_registry();

        let old_parent = allocate_widget(None);
        let new_parent = allocate_widget(None);
        let child = allocate_widget(None);
        set_parent(child, Some(old_parent)).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        messages::on_child_removed(old_parent, Rc::new(move |msg: &ChildMessage| {
            // Base bookkeeping is already done
            assert!(!get_children(msg.parent).contains(&msg.child));
            seen_clone.borrow_mut().push(msg.child);
        }));

        set_parent(child, Some(new_parent)).unwrap();

        assert_eq!(*seen.borrow(), vec![child]);
        assert_eq!(get_children(old_parent), Vec::<usize>::new());
        assert_eq!(get_children(new_parent), vec![child]);
    }

    #[test]
    fn test_cycle_rejected() {
        reset_registry();

        let root = allocate_widget(None);
        let mid = allocate_widget(None);
        let leaf = allocate_widget(None);
        set_parent(mid, Some(root)).unwrap();
        set_parent(leaf, Some(mid)).unwrap();

        assert!(matches!(
            set_parent(root, Some(leaf)),
            Err(WidgetError::Cycle { .. })
        ));
        assert!(matches!(
            insert_child(mid, 0, mid),
            Err(WidgetError::Cycle { .. })
        ));
    }

    #[test]
    fn test_dispose_recurses_and_detaches() {
        reset_registry();

        let root = allocate_widget(None);
        let mid = allocate_widget(None);
        let leaf = allocate_widget(None);
        set_parent(mid, Some(root)).unwrap();
        set_parent(leaf, Some(mid)).unwrap();

        dispose_widget(mid);

        assert!(!is_allocated(mid));
        assert!(!is_allocated(leaf));
        assert!(get_children(root).is_empty());
    }

    #[test]
    fn test_disposed_widget_rejected() {
        reset_registry();

        let parent = allocate_widget(None);
        let child = allocate_widget(None);
        dispose_widget(child);

        assert!(matches!(
            insert_child(parent, 0, child),
            Err(WidgetError::NotAllocated(_))
        ));
    }

    #[test]
    fn test_flags_and_classes() {
        reset_registry();

        let w = allocate_widget(None);
        set_flag(w, WidgetFlags::DISALLOW_LAYOUT_CHANGE);
        assert!(test_flag(w, WidgetFlags::DISALLOW_LAYOUT_CHANGE));
        clear_flag(w, WidgetFlags::DISALLOW_LAYOUT_CHANGE);
        assert!(!test_flag(w, WidgetFlags::DISALLOW_LAYOUT_CHANGE));

        add_class(w, "p-Panel");
        add_class(w, "p-Panel");
        add_class(w, "p-Side");
        assert_eq!(get_classes(w), vec!["p-Panel".to_string(), "p-Side".to_string()]);
        remove_class(w, "p-Panel");
        assert!(!has_class(w, "p-Panel"));
        assert!(has_class(w, "p-Side"));
    }
}
