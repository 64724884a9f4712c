//! Generic entity collection with loading/error flags.

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::{Mutex as FlightLock, MutexGuard};

use crate::models::Entity;

/// Observable state of one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionState<T> {
    /// Server order, newest creations first.
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: Entity> CollectionState<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id()).collect()
    }

    pub(crate) fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub(crate) fn prepend(&mut self, item: T) {
        self.items.insert(0, item);
    }

    /// Swaps in `item` where `id` sits. Returns false if `id` is absent.
    pub(crate) fn replace(&mut self, id: &str, item: T) -> bool {
        match self.position(id) {
            Some(index) => {
                self.items[index] = item;
                true
            }
            None => false,
        }
    }

    /// Drops the entity with `id`. Returns false if `id` is absent.
    pub(crate) fn remove(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Shared, single-flight holder of a [`CollectionState`].
///
/// Actions hold the flight lock for their whole duration, so a second action
/// waits for the first to settle and `loading` is only ever set by one call.
#[derive(Debug)]
pub struct Collection<T> {
    state: Mutex<CollectionState<T>>,
    flight: FlightLock<()>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(CollectionState::default()),
            flight: FlightLock::new(()),
        }
    }
}

impl<T: Entity + Clone> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> CollectionState<T> {
        self.state.lock().clone()
    }

    /// Waits for any in-flight action, then marks the collection loading and
    /// clears the previous error. Hold the guard until the action settles.
    pub(crate) async fn begin(&self) -> MutexGuard<'_, ()> {
        let guard = self.flight.lock().await;
        let mut state = self.state.lock();
        state.loading = true;
        state.error = None;
        guard
    }

    /// Applies a successful result and clears `loading`.
    pub(crate) fn settle<R>(&self, apply: impl FnOnce(&mut CollectionState<T>) -> R) -> R {
        let mut state = self.state.lock();
        let result = apply(&mut state);
        state.loading = false;
        result
    }

    pub(crate) fn fail(&self, message: impl Into<String>) {
        let mut state = self.state.lock();
        state.loading = false;
        state.error = Some(message.into());
    }
}
