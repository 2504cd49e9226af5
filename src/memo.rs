use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    hash::Hash,
    rc::Rc,
};

/// Single-threaded cache of pure computations keyed by their inputs.
///
/// A failed computation is not stored, so asking again recomputes it.
pub struct Memo<K, V> {
    entries: RefCell<HashMap<K, Rc<V>>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_try_insert_with<E, F>(&self, key: K, compute: F) -> Result<Rc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(found) = self.entries.borrow().get(&key).cloned() {
            self.hits.set(self.hits.get() + 1);
            return Ok(found);
        }
        self.misses.set(self.misses.get() + 1);
        let value = Rc::new(compute()?);
        self.entries.borrow_mut().insert(key, Rc::clone(&value));
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    pub fn misses(&self) -> usize {
        self.misses.get()
    }
}
