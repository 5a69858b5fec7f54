#![forbid(unsafe_code)]

//! Shared value with change notification.
//!
//! The controller publishes its [`Overlay`](crate::controller::Overlay)
//! through an [`Observable`] so the host UI can redraw the position
//! indicator and the sound affordance without polling.
//!
//! # Invariants
//!
//! 1. Clones are handles to the same value.
//! 2. Setting an equal value notifies nobody.
//! 3. Listeners run in subscription order, after every internal borrow is
//!    released, so a listener may read or set the observable itself.
//! 4. A listener is dropped with its [`Subscription`]; dead entries are
//!    pruned on the next change.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = dyn Fn(&T);

struct Shared<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<Weak<Listener<T>>>>,
}

/// A single-threaded value that tells its subscribers when it changes.
pub struct Observable<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.shared.value.borrow())
            .field("listeners", &self.shared.listeners.borrow().len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                value: RefCell::new(value),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.value.borrow().clone()
    }

    /// Store `value` and notify listeners. Returns `false` (and notifies
    /// nobody) when it equals the current value.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.shared.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }

        let live: Vec<Rc<Listener<T>>> = {
            let mut listeners = self.shared.listeners.borrow_mut();
            let mut live = Vec::with_capacity(listeners.len());
            listeners.retain(|weak| match weak.upgrade() {
                Some(listener) => {
                    live.push(listener);
                    true
                }
                None => false,
            });
            live
        };
        if live.is_empty() {
            return true;
        }

        let snapshot = self.get();
        tracing::trace!(target: "reel.reactive", listeners = live.len(), "value published");
        for listener in &live {
            listener(&snapshot);
        }
        true
    }

    /// Call `listener` after every change until the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Listener<T>> = Rc::new(listener);
        self.shared.listeners.borrow_mut().push(Rc::downgrade(&strong));
        Subscription {
            _listener: Box::new(strong),
        }
    }
}

/// Keeps a listener registered while alive.
pub struct Subscription {
    _listener: Box<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
