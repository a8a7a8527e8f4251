//! State updaters: how a node's output is merged into the running state.
//!
//! The default [`ReplaceUpdater`] swaps the state for the node's output. A
//! [`FieldBasedUpdater`] wraps a closure for per-field strategies, e.g. appending
//! messages while keeping the request untouched.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;

/// Merges a node's update into the current state.
pub trait StateUpdater<S>: Send + Sync + Debug
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn apply_update(&self, current: &mut S, update: &S);
}

pub type BoxedStateUpdater<S> = Arc<dyn StateUpdater<S>>;

/// Replaces the whole state with the node's output.
#[derive(Debug, Clone, Default)]
pub struct ReplaceUpdater;

impl<S> StateUpdater<S> for ReplaceUpdater
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn apply_update(&self, current: &mut S, update: &S) {
        *current = update.clone();
    }
}

/// Updater backed by a closure `(current, update)`.
pub struct FieldBasedUpdater<S, F>
where
    F: Fn(&mut S, &S) + Send + Sync + 'static,
{
    updater_fn: F,
    _marker: PhantomData<fn(S)>,
}

impl<S, F> Debug for FieldBasedUpdater<S, F>
where
    F: Fn(&mut S, &S) + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBasedUpdater")
            .field("updater_fn", &"<function>")
            .finish()
    }
}

impl<S, F> FieldBasedUpdater<S, F>
where
    F: Fn(&mut S, &S) + Send + Sync + 'static,
{
    pub fn new(updater_fn: F) -> Self {
        Self {
            updater_fn,
            _marker: PhantomData,
        }
    }
}

impl<S, F> StateUpdater<S> for FieldBasedUpdater<S, F>
where
    S: Clone + Send + Sync + Debug + 'static,
    F: Fn(&mut S, &S) + Send + Sync + 'static,
{
    fn apply_update(&self, current: &mut S, update: &S) {
        (self.updater_fn)(current, update);
    }
}
