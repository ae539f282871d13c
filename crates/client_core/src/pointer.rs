//! Document-level pointer event hub. Listeners are scoped: dropping the
//! returned guard unregisters them.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenRegion {
    SearchBar,
    CollectionTabs,
    SortFilterPanel,
    ItemList,
}

/// A pointer press, described by the regions containing its target,
/// innermost first. An empty path is a press on bare background.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointerEvent {
    path: Vec<ScreenRegion>,
}

impl PointerEvent {
    pub fn within(path: impl IntoIterator<Item = ScreenRegion>) -> Self {
        Self {
            path: path.into_iter().collect(),
        }
    }

    pub fn background() -> Self {
        Self::default()
    }

    pub fn is_inside(&self, region: ScreenRegion) -> bool {
        self.path.contains(&region)
    }
}

type Listener = Arc<dyn Fn(&PointerEvent) + Send + Sync>;

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

fn lock(table: &Mutex<ListenerTable>) -> MutexGuard<'_, ListenerTable> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Default)]
pub struct PointerEvents {
    table: Arc<Mutex<ListenerTable>>,
}

impl PointerEvents {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "the listener is removed as soon as the guard is dropped"]
    pub fn subscribe(
        &self,
        listener: impl Fn(&PointerEvent) + Send + Sync + 'static,
    ) -> ListenerGuard {
        let listener: Listener = Arc::new(listener);
        let mut table = lock(&self.table);
        let id = table.next_id;
        table.next_id += 1;
        table.listeners.push((id, listener));
        ListenerGuard {
            table: Arc::downgrade(&self.table),
            id,
        }
    }

    pub fn dispatch(&self, event: &PointerEvent) {
        // Snapshot first so listeners may subscribe or unsubscribe re-entrantly.
        let listeners: Vec<Listener> = lock(&self.table)
            .listeners
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.table).listeners.len()
    }
}

pub struct ListenerGuard {
    table: Weak<Mutex<ListenerTable>>,
    id: u64,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            lock(&table).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
