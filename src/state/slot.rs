// Shared cell holding a pane's live instance
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A pane installs its instance here on mount and releases it on unmount.
/// Other parts of the app only ever borrow the instance through [`InstanceSlot::with`].
pub struct InstanceSlot<T> {
    cell: Rc<RefCell<Option<T>>>,
    generation: Rc<Cell<u32>>,
}

impl<T> InstanceSlot<T> {
    pub fn new() -> Self {
        Self {
            cell: Rc::new(RefCell::new(None)),
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Stores `value`, dropping any previous instance, and returns the new
    /// generation. Generations only grow, so a changed number means a replaced instance.
    pub fn install(&self, value: T) -> u32 {
        let previous = self.cell.borrow_mut().replace(value);
        drop(previous);
        let next = self.generation.get().wrapping_add(1);
        self.generation.set(next);
        next
    }

    /// Drops the live instance. Returns whether there was one.
    pub fn release(&self) -> bool {
        let previous = self.cell.borrow_mut().take();
        previous.is_some()
    }

    pub fn is_live(&self) -> bool {
        self.cell.borrow().is_some()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.cell.borrow().as_ref().map(f)
    }
}

impl<T> Default for InstanceSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for InstanceSlot<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            generation: self.generation.clone(),
        }
    }
}

// Props compare by identity: two handles are equal if they share the same slot.
impl<T> PartialEq for InstanceSlot<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}
