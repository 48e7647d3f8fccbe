//! Errors raised by the widget registry and the box layout.
//!
//! The ranked panel has no error cases of its own; it propagates these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("widget {0} is not allocated")]
    NotAllocated(usize),

    #[error("widget {0} is disposed")]
    Disposed(usize),

    #[error("child position {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot make widget {child} a child of {parent}: would create a cycle")]
    Cycle { parent: usize, child: usize },

    #[error("layout of widget {0} cannot be changed")]
    LayoutChangeDisallowed(usize),

    #[error("widget {0} has no layout")]
    NoLayout(usize),

    #[error("layout error: {0}")]
    Layout(String),
}

impl From<taffy::TaffyError> for WidgetError {
    fn from(err: taffy::TaffyError) -> Self {
        Self::Layout(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WidgetError>;
