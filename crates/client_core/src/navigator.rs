use std::sync::{Mutex, PoisonError};

use shared::domain::{CollectionKind, Identifier};
use tracing::info;

/// Side-effecting view transition to an application path.
pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str);
}

pub fn detail_path(kind: CollectionKind, id: &Identifier) -> String {
    format!("/{}/{}", kind.namespace(), path_segment(id))
}

/// Encodes `id` as exactly one path segment. Dot-only ids are escaped so
/// they cannot climb the path.
pub fn path_segment(id: &Identifier) -> String {
    let raw = id.to_string();
    match raw.as_str() {
        "." | ".." => raw.replace('.', "%2E"),
        _ => urlencoding::encode(&raw).into_owned(),
    }
}

/// Keeps every visited path in order.
#[derive(Default)]
pub struct HistoryNavigator {
    visited: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn current(&self) -> Option<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for HistoryNavigator {
    fn go_to(&self, path: &str) {
        info!(path, "navigate");
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}
