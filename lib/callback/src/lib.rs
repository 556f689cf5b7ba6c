//! Callback registries. Registering a callback returns a `Handle`; the callback stays registered
//! for as long as the handle is alive and is removed when the handle is dropped.
//!
//! Dispatch works on a snapshot of the registered callbacks, so callbacks are free to register new
//! callbacks or drop handles (including their own) while being run. Callbacks registered during a
//! dispatch are not run by it; callbacks removed during a dispatch are skipped if not yet run.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::cell::Cell;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::rc::Weak;



// ==============
// === Handle ===
// ==============

/// Keeps a callback registered. Dropping the handle unregisters the callback.
#[must_use = "Dropping the handle unregisters the callback immediately."]
pub struct Handle {
    unregister : Option<Box<dyn FnOnce()>>,
}

impl Handle {
    fn new(unregister:impl FnOnce() + 'static) -> Self {
        let unregister = Some(Box::new(unregister) as Box<dyn FnOnce()>);
        Self {unregister}
    }

    /// Unregisters the callback now. Equivalent to dropping the handle.
    pub fn remove(self) {}
}

impl Drop for Handle {
    fn drop(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister()
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"callback::Handle")
    }
}



// =================
// === Registry1 ===
// =================

struct Entry<T,R> {
    id       : usize,
    alive    : Cell<bool>,
    callback : Box<dyn Fn(&T) -> R>,
}

struct Model<T,R> {
    next_id : usize,
    entries : Vec<Rc<Entry<T,R>>>,
}

impl<T,R> Default for Model<T,R> {
    fn default() -> Self {
        Self {next_id:0, entries:Vec::new()}
    }
}

/// A registry of callbacks taking a single argument by reference and returning `R`.
pub struct Registry1<T,R=()> {
    model : Rc<RefCell<Model<T,R>>>,
}

impl<T,R> Clone for Registry1<T,R> {
    fn clone(&self) -> Self {
        Self {model:self.model.clone()}
    }
}

impl<T,R> Default for Registry1<T,R> {
    fn default() -> Self {
        Self {model:Rc::new(RefCell::new(Model::default()))}
    }
}

impl<T,R> fmt::Debug for Registry1<T,R> {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"Registry1({} callbacks)",self.len())
    }
}

impl<T:'static,R:'static> Registry1<T,R> {
    /// Constructor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new callback. It stays registered until the returned handle is dropped.
    pub fn add<F:Fn(&T) -> R + 'static>(&self, callback:F) -> Handle {
        let entry = {
            let mut model = self.model.borrow_mut();
            let id        = model.next_id;
            let alive     = Cell::new(true);
            let callback  = Box::new(callback) as Box<dyn Fn(&T) -> R>;
            let entry     = Rc::new(Entry {id,alive,callback});
            model.next_id += 1;
            model.entries.push(entry.clone());
            entry
        };
        let model : Weak<RefCell<Model<T,R>>> = Rc::downgrade(&self.model);
        Handle::new(move || {
            entry.alive.set(false);
            if let Some(model) = model.upgrade() {
                model.borrow_mut().entries.retain(|e| e.id != entry.id);
            }
        })
    }

    /// Runs all callbacks registered at the moment of the call and collects their results.
    pub fn run_all(&self, arg:&T) -> Vec<R> {
        self.snapshot().iter().filter(|e| e.alive.get()).map(|e| (e.callback)(arg)).collect()
    }

    fn snapshot(&self) -> Vec<Rc<Entry<T,R>>> {
        self.model.borrow().entries.clone()
    }
}

impl<T,R> Registry1<T,R> {
    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.model.borrow().entries.len()
    }

    /// Checks whether no callback is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T:'static,E:'static> Registry1<T,Result<(),E>> {
    /// Runs the callbacks in registration order, stopping at and returning the first error.
    pub fn try_run_all(&self, arg:&T) -> Result<(),E> {
        for entry in self.snapshot() {
            if entry.alive.get() {
                (entry.callback)(arg)?;
            }
        }
        Ok(())
    }
}



// =============
// === Tests ===
// =============

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_unregister_on_drop() {
        let registry = Registry1::<usize>::new();
        let sum      = Rc::new(Cell::new(0));
        let handle1  = registry.add({let sum = sum.clone(); move |x| sum.set(sum.get() + x)});
        let handle2  = registry.add({let sum = sum.clone(); move |x| sum.set(sum.get() + 10*x)});
        registry.run_all(&1);
        assert_eq!(sum.get(), 11);
        drop(handle1);
        registry.run_all(&1);
        assert_eq!(sum.get(), 21);
        handle2.remove();
        assert!(registry.is_empty());
    }

    #[test]
    fn callbacks_may_drop_their_own_handle() {
        let registry = Registry1::<()>::new();
        let slot     = Rc::new(RefCell::new(None::<Handle>));
        let calls    = Rc::new(Cell::new(0));
        let handle   = registry.add({
            let slot  = slot.clone();
            let calls = calls.clone();
            move |_| { calls.set(calls.get() + 1); slot.borrow_mut().take(); }
        });
        *slot.borrow_mut() = Some(handle);
        registry.run_all(&());
        registry.run_all(&());
        assert_eq!(calls.get(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn callbacks_added_during_dispatch_run_next_time() {
        let registry = Registry1::<()>::new();
        let handles  = Rc::new(RefCell::new(Vec::new()));
        let calls    = Rc::new(Cell::new(0));
        let _handle  = registry.add({
            let registry = registry.clone();
            let handles  = handles.clone();
            let calls    = calls.clone();
            move |_| {
                let calls = calls.clone();
                handles.borrow_mut().push(registry.add(move |_| calls.set(calls.get() + 1)));
            }
        });
        registry.run_all(&());
        assert_eq!(calls.get(), 0);
        registry.run_all(&());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn try_run_all_stops_at_first_error() {
        let registry = Registry1::<i32,Result<(),String>>::new();
        let reached  = Rc::new(Cell::new(false));
        let _h1      = registry.add(|x| if *x < 0 { Err("negative".into()) } else { Ok(()) });
        let _h2      = registry.add({let reached = reached.clone(); move |_| {
            reached.set(true);
            Ok(())
        }});
        assert_eq!(registry.try_run_all(&-1), Err("negative".to_string()));
        assert!(!reached.get());
        assert_eq!(registry.try_run_all(&1), Ok(()));
        assert!(reached.get());
    }
}
