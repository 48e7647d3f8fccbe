//! Child messages - Notifications sent to a parent about its children.
//!
//! The registry sends a child-removed message whenever a child leaves a
//! parent, whoever caused it: a reparent, an explicit detach, or the child
//! being disposed. Handlers run synchronously and one at a time.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A message about one child of one parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildMessage {
    /// Parent that lost (or gained) the child.
    pub parent: usize,
    /// The child widget.
    pub child: usize,
}

/// Child message callback (Rc so it can be cloned out before dispatch).
pub type ChildCallback = Rc<dyn Fn(&ChildMessage)>;

thread_local! {
    /// Child-removed handlers registered per parent index.
    static CHILD_REMOVED_HANDLERS: RefCell<HashMap<usize, Vec<ChildCallback>>> = RefCell::new(HashMap::new());
}

/// Register a handler for child-removed messages addressed to `parent`.
pub fn on_child_removed(parent: usize, handler: ChildCallback) {
    CHILD_REMOVED_HANDLERS.with(|handlers| {
        handlers.borrow_mut().entry(parent).or_default().push(handler);
    });
}

/// Deliver a child-removed message to every handler of `msg.parent`.
///
/// Handlers are cloned out first so they can freely call back into the
/// registry (including registering or clearing handlers).
pub fn send_child_removed(msg: ChildMessage) {
    let handlers: Vec<ChildCallback> = CHILD_REMOVED_HANDLERS.with(|handlers| {
        handlers
            .borrow()
            .get(&msg.parent)
            .cloned()
            .unwrap_or_default()
    });

    tracing::trace!(parent = msg.parent, child = msg.child, handlers = handlers.len(), "child-removed");

    for handler in handlers {
        handler(&msg);
    }
}

/// Drop all handlers registered for `parent`.
pub fn clear_handlers(parent: usize) {
    CHILD_REMOVED_HANDLERS.with(|handlers| {
        handlers.borrow_mut().remove(&parent);
    });
}

#[cfg(test)]
fn handler_count(parent: usize) -> usize {
    CHILD_REMOVED_HANDLERS.with(|handlers| {
        handlers.borrow().get(&parent).map_or(0, Vec::len)
    })
}

/// Reset all handler state (for testing).
pub fn reset_messages() {
    CHILD_REMOVED_HANDLERS.with(|handlers| handlers.borrow_mut().clear());
}
