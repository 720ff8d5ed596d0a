use crate::object::Object;
use gc::{custom_trace, Finalize, Gc, GcCell, Trace};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct EnvironmentCore {
    store: HashMap<Rc<str>, Gc<Object>>,
    outer: Option<Environment>,
}

impl Finalize for EnvironmentCore {}

unsafe impl Trace for EnvironmentCore {
    custom_trace!(this, {
        for value in this.store.values() {
            mark(value);
        }
        if let Some(outer) = &this.outer {
            mark(outer);
        }
    });
}

/// A scope in the chain of lexical scopes. Cloning shares the scope; closures
/// keep their defining scope alive through such a clone, and cycles between a
/// scope and the functions stored in it are left to the collector.
#[derive(Clone, Trace, Finalize)]
pub struct Environment {
    pub(crate) environment: Gc<GcCell<EnvironmentCore>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            environment: Gc::new(GcCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: None,
            })),
        }
    }

    pub fn new_enclosed(outer: &Environment) -> Environment {
        Environment {
            environment: Gc::new(GcCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: Some(outer.clone()),
            })),
        }
    }

    /// Looks `key` up here, then outward through the enclosing scopes.
    pub fn get(&self, key: &str) -> Option<Gc<Object>> {
        let env = self.environment.borrow();
        env.store
            .get(key)
            .cloned()
            .or_else(|| env.outer.as_ref().and_then(|outer| outer.get(key)))
    }

    /// Binds `key` in this scope, shadowing any outer binding.
    pub fn set(&mut self, key: Rc<str>, value: Gc<Object>) {
        self.environment.borrow_mut().store.insert(key, value);
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Gc::ptr_eq(&self.environment, &other.environment)
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let env = self.environment.borrow();
        let mut names = env.store.keys().map(|name| name.as_ref()).collect::<Vec<_>>();
        names.sort_unstable();
        f.debug_struct("Environment")
            .field("names", &names)
            .field("outer", &env.outer.is_some())
            .finish()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
