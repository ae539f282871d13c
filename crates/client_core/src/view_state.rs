//! Toggle state of the search screen: which collection type is shown and
//! which sort/filter panel is open.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::domain::{CollectionKind, SortTab};
use tracing::debug;

use crate::pointer::{ListenerGuard, PointerEvents, ScreenRegion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub active_collection: CollectionKind,
    pub active_sort_tab: Option<SortTab>,
}

impl ViewState {
    /// Radio behaviour: always sets, re-selecting is a no-op in effect.
    pub fn select_collection_type(&mut self, kind: CollectionKind) {
        self.active_collection = kind;
    }

    /// Toggle behaviour: selecting the open tab closes it, selecting another
    /// replaces it.
    pub fn select_sort_tab(&mut self, tab: SortTab) {
        self.active_sort_tab = if self.active_sort_tab == Some(tab) {
            None
        } else {
            Some(tab)
        };
    }

    pub fn dismiss_sort_tab(&mut self) {
        self.active_sort_tab = None;
    }
}

fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sole owner of the screen's [`ViewState`]. Holds the outside-click
/// listener for as long as it is mounted.
pub struct ViewStateController {
    state: Arc<Mutex<ViewState>>,
    dismissal: Option<ListenerGuard>,
}

impl ViewStateController {
    pub fn mount(pointer: &PointerEvents) -> Self {
        let state = Arc::new(Mutex::new(ViewState::default()));
        let shared = Arc::clone(&state);
        let dismissal = pointer.subscribe(move |event| {
            if !event.is_inside(ScreenRegion::SortFilterPanel) {
                lock(&shared).dismiss_sort_tab();
            }
        });
        Self {
            state,
            dismissal: Some(dismissal),
        }
    }

    pub fn state(&self) -> ViewState {
        *lock(&self.state)
    }

    pub fn select_collection_type(&self, kind: CollectionKind) {
        lock(&self.state).select_collection_type(kind);
        debug!(%kind, "collection type selected");
    }

    pub fn select_sort_tab(&self, tab: SortTab) {
        let mut state = lock(&self.state);
        state.select_sort_tab(tab);
        debug!(?tab, active = ?state.active_sort_tab, "sort tab toggled");
    }

    pub fn dismiss_sort_tab(&self) {
        lock(&self.state).dismiss_sort_tab();
    }

    pub fn is_listening(&self) -> bool {
        self.dismissal.is_some()
    }

    /// Removes the outside-click listener. Dropping the controller does the
    /// same.
    pub fn teardown(mut self) {
        self.dismissal.take();
    }
}

#[cfg(test)]
#[path = "tests/view_state_tests.rs"]
mod tests;
