//! Publish/subscribe value cells.
//!
//! A [`Reactive`] holds a value and notifies subscribers on every `set`,
//! tagging the change with where it came from. Group collections use it to
//! tell a leaf's own operation apart from a change propagated up from a
//! descendant.

use std::fmt;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    pub struct SubscriptionKey;
}

/// Origin of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    /// The owner changed its own value.
    Own,
    /// A descendant's change was propagated into the owner.
    Propagated,
}

type Subscriber<T> = Box<dyn FnMut(&T, ChangeSource)>;

pub struct Reactive<T> {
    value: T,
    subscribers: SlotMap<SubscriptionKey, Subscriber<T>>,
}

impl<T: fmt::Debug> fmt::Debug for Reactive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactive")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T: Default> Default for Reactive<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Reactive<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: SlotMap::with_key(),
        }
    }

    #[inline]
    #[must_use]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replaces the value and notifies every subscriber.
    pub fn set(&mut self, value: T, source: ChangeSource) {
        self.value = value;
        for subscriber in self.subscribers.values_mut() {
            subscriber(&self.value, source);
        }
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&T, ChangeSource) + 'static,
    ) -> SubscriptionKey {
        self.subscribers.insert(Box::new(subscriber))
    }

    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.subscribers.remove(key).is_some()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
