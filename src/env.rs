use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Error;
use crate::interner::{self, SymId};
use crate::value::Value;

/// A handle to one frame of the environment chain. Cloning the handle shares
/// the frame: closures created in the same scope all reference the one frame,
/// and a frame lives as long as the longest-lived closure or child frame that
/// points at it.
#[derive(Debug, Clone)]
pub struct Env {
    inner: Rc<RefCell<Frame>>,
}

#[derive(Debug)]
struct Frame {
    parent: Option<Env>,
    bindings: FxHashMap<SymId, Value>,
}

impl Env {
    /// Creates a root frame with no parent.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Frame {
                parent: None,
                bindings: FxHashMap::default(),
            })),
        }
    }

    /// Creates a fresh frame whose parent is this one.
    pub fn child(&self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Frame {
                parent: Some(self.clone()),
                bindings: FxHashMap::default(),
            })),
        }
    }

    /// Searches this frame, then each ancestor in order.
    pub fn lookup(&self, key: SymId) -> Result<Value, Error> {
        let mut frame = self.clone();
        loop {
            if let Some(value) = frame.lookup_local(key) {
                return Ok(value);
            }
            let parent = frame.inner.borrow().parent.clone();
            match parent {
                Some(parent) => frame = parent,
                None => return Err(Error::NameError(interner::sym_to_str(key))),
            }
        }
    }

    /// Searches only this frame; absence is not an error.
    pub fn lookup_local(&self, key: SymId) -> Option<Value> {
        self.inner.borrow().bindings.get(&key).cloned()
    }

    /// Binds or rebinds in this frame, shadowing any ancestor binding.
    pub fn insert(&self, key: SymId, value: Value) {
        self.inner.borrow_mut().bindings.insert(key, value);
    }

    /// Mutates the nearest enclosing frame that already binds `key`. Never
    /// creates a binding.
    pub fn set(&self, key: SymId, value: Value) -> Result<(), Error> {
        let mut frame = self.clone();
        loop {
            {
                let mut inner = frame.inner.borrow_mut();
                if inner.bindings.contains_key(&key) {
                    inner.bindings.insert(key, value);
                    return Ok(());
                }
            }
            let parent = frame.inner.borrow().parent.clone();
            match parent {
                Some(parent) => frame = parent,
                None => return Err(Error::NameError(interner::sym_to_str(key))),
            }
        }
    }

    /// Bulk-clears this frame's bindings. Used at interpreter teardown to
    /// break the reference cycle between the global frame and the closures
    /// stored in it.
    pub fn clear(&self) {
        self.inner.borrow_mut().bindings.clear();
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
