//! Shared selection state with change notification
//!
//! [`SelectionState`] is a cheap-to-clone handle to one record of
//! `(selected, mode_index)`. Views and the gizmo binding subscribe to it and
//! are told about every change synchronously, in subscription order.
//! Subscriptions unregister themselves when dropped.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use slotmap::{new_key_type, SlotMap};
use serde::{Serialize, Deserialize};

new_key_type! {
    /// Key identifying one registered selection observer
    pub struct ObserverKey;
}

/// How the gizmo manipulates the selected object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    Translate,
    Rotate,
    Scale,
}

impl TransformMode {
    /// All modes in cycling order
    pub const ALL: [TransformMode; 3] = [Self::Translate, Self::Rotate, Self::Scale];

    /// Mode for a `mode_index`
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Lowercase name, as shown to the user
    pub fn name(self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Rotate => "rotate",
            Self::Scale => "scale",
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable copy of the selection at one point in time
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    /// Name of the selected object
    pub selected: Option<String>,
    /// Always in `0..TransformMode::ALL.len()`
    pub mode_index: usize,
}

impl SelectionSnapshot {
    pub fn mode(&self) -> TransformMode {
        TransformMode::from_index(self.mode_index)
    }

    /// Whether `name` is the selected object
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.as_deref() == Some(name)
    }
}

type Observer = Rc<dyn Fn(&SelectionSnapshot)>;

#[derive(Default)]
struct Inner {
    current: RefCell<SelectionSnapshot>,
    observers: RefCell<SlotMap<ObserverKey, Observer>>,
    order: RefCell<Vec<ObserverKey>>,
}

impl Inner {
    fn unsubscribe(&self, key: ObserverKey) {
        if self.observers.borrow_mut().remove(key).is_some() {
            self.order.borrow_mut().retain(|k| *k != key);
        }
    }
}

/// Handle to the application's single selection record
///
/// Clones share the same record.
#[derive(Clone, Default)]
pub struct SelectionState {
    inner: Rc<Inner>,
}

impl fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("current", &*self.inner.current.borrow())
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl SelectionState {
    /// Create a selection with nothing selected and mode index 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current selection
    pub fn snapshot(&self) -> SelectionSnapshot {
        self.inner.current.borrow().clone()
    }

    pub fn selected(&self) -> Option<String> {
        self.inner.current.borrow().selected.clone()
    }

    pub fn mode(&self) -> TransformMode {
        self.inner.current.borrow().mode()
    }

    /// Select an object by name; `mode_index` is left alone
    pub fn select(&self, name: impl Into<String>) {
        let name = name.into();
        self.update(|s| s.selected = Some(name));
    }

    /// Clear the selection; `mode_index` is left alone
    pub fn deselect(&self) {
        self.update(|s| s.selected = None);
    }

    /// Advance to the next transform mode, wrapping after the last
    pub fn cycle_mode(&self) {
        self.update(|s| s.mode_index = (s.mode_index + 1) % TransformMode::ALL.len());
    }

    /// Register an observer, called after every change until the returned
    /// [`Subscription`] is dropped
    #[must_use = "the observer is removed as soon as the subscription is dropped"]
    pub fn subscribe(&self, observer: impl Fn(&SelectionSnapshot) + 'static) -> Subscription {
        let key = self.inner.observers.borrow_mut().insert(Rc::new(observer));
        self.inner.order.borrow_mut().push(key);
        Subscription {
            state: Rc::downgrade(&self.inner),
            key,
        }
    }

    /// Number of live observers
    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    fn update(&self, mutate: impl FnOnce(&mut SelectionSnapshot)) {
        {
            let mut current = self.inner.current.borrow_mut();
            let before = current.clone();
            mutate(&mut current);
            if *current == before {
                return;
            }
            log::debug!(
                "Selection changed: {:?} ({}) -> {:?} ({})",
                before.selected,
                before.mode(),
                current.selected,
                current.mode()
            );
        }
        self.notify();
    }

    fn notify(&self) {
        let order = self.inner.order.borrow().clone();
        for key in order {
            // Observers may unsubscribe or change the selection while we iterate,
            // so look each one up again and hand it the latest snapshot.
            let observer = self.inner.observers.borrow().get(key).cloned();
            if let Some(observer) = observer {
                let snapshot = self.snapshot();
                observer(&snapshot);
            }
        }
    }
}

/// Keeps an observer registered; dropping it unsubscribes
pub struct Subscription {
    state: Weak<Inner>,
    key: ObserverKey,
}

impl Subscription {
    pub fn key(&self) -> ObserverKey {
        self.key
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscription").field(&self.key).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.state.upgrade() {
            inner.unsubscribe(self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder(state: &SelectionState) -> (Rc<RefCell<Vec<SelectionSnapshot>>>, Subscription) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let sub = state.subscribe(move |s| sink.borrow_mut().push(s.clone()));
        (log, sub)
    }

    #[test]
    fn test_initial_state() {
        let state = SelectionState::new();
        let snap = state.snapshot();
        assert_eq!(snap.selected, None);
        assert_eq!(snap.mode_index, 0);
        assert_eq!(snap.mode(), TransformMode::Translate);
    }

    #[test]
    fn test_select_keeps_mode() {
        let state = SelectionState::new();
        state.select("Table");
        state.cycle_mode();
        state.select("Notebook");
        assert_eq!(state.selected().as_deref(), Some("Notebook"));
        assert_eq!(state.mode(), TransformMode::Rotate);
    }

    #[test]
    fn test_cycle_mode_wraps() {
        let state = SelectionState::new();
        let modes: Vec<_> = (0..4)
            .map(|_| {
                state.cycle_mode();
                state.mode()
            })
            .collect();
        assert_eq!(
            modes,
            vec![TransformMode::Rotate, TransformMode::Scale, TransformMode::Translate, TransformMode::Rotate]
        );
    }

    #[test]
    fn test_mode_survives_deselect() {
        let state = SelectionState::new();
        state.select("Table");
        state.cycle_mode();
        state.cycle_mode();
        state.deselect();
        assert_eq!(state.snapshot().mode_index, 2);
        state.select("Notebook");
        assert_eq!(state.mode(), TransformMode::Scale);
    }

    #[test]
    fn test_observers_see_each_change() {
        let state = SelectionState::new();
        let (log, _sub) = recorder(&state);

        state.select("Table");
        state.cycle_mode();
        state.deselect();

        let log = log.borrow();
        assert_eq!(log.len(), 3);
        assert!(log[0].is_selected("Table"));
        assert_eq!(log[1].mode_index, 1);
        assert_eq!(log[2].selected, None);
    }

    #[test]
    fn test_unchanged_value_does_not_notify() {
        let state = SelectionState::new();
        state.select("Table");
        let (log, _sub) = recorder(&state);

        state.select("Table");
        assert!(log.borrow().is_empty());

        state.deselect();
        state.deselect();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_dropping_subscription_unsubscribes() {
        let state = SelectionState::new();
        let (log, sub) = recorder(&state);
        assert_eq!(state.observer_count(), 1);

        drop(sub);
        assert_eq!(state.observer_count(), 0);

        state.select("Table");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_subscription_outliving_state() {
        let state = SelectionState::new();
        let sub = state.subscribe(|_| {});
        drop(state);
        drop(sub);
    }

    #[test]
    fn test_notification_order_is_subscription_order() {
        let state = SelectionState::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        let subs: Vec<Subscription> = (0..3)
            .map(|i| {
                let order = Rc::clone(&order);
                state.subscribe(move |_| order.borrow_mut().push(i))
            })
            .collect();

        state.select("Table");
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
        drop(subs);
    }

    #[test]
    fn test_reentrant_change_delivers_latest_snapshot() {
        let state = SelectionState::new();
        let handle = state.clone();
        let _cycler = state.subscribe(move |s| {
            if s.is_selected("Table") && s.mode_index == 0 {
                handle.cycle_mode();
            }
        });
        let (log, _sub) = recorder(&state);

        state.select("Table");

        let last = log.borrow().last().cloned().unwrap();
        assert_eq!(last.mode_index, 1);
        assert_eq!(state.snapshot(), last);
    }

    #[test]
    fn test_observer_may_drop_other_subscription() {
        let state = SelectionState::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(Cell::new(0));

        let dropper = {
            let slot = Rc::clone(&slot);
            state.subscribe(move |_| {
                slot.borrow_mut().take();
            })
        };
        let counted = {
            let calls = Rc::clone(&calls);
            state.subscribe(move |_| calls.set(calls.get() + 1))
        };
        *slot.borrow_mut() = Some(counted);

        state.select("Table");
        assert_eq!(calls.get(), 0);
        assert_eq!(state.observer_count(), 1);
        drop(dropper);
    }
}
