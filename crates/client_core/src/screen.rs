//! Composition root of the search screen: two independent fetch cycles feeding
//! two merged lists, gated by the view state.

use std::sync::Arc;

use anyhow::Result;
use shared::domain::{CollectionKind, Identifier, SortTab};
use tracing::{error, info, warn};

use crate::{
    aggregator::{DetailAggregator, MergedList},
    config::{CollectionEndpoints, ScreenSettings},
    error::FetchError,
    index::IndexResolver,
    navigator::{detail_path, Navigator},
    pointer::PointerEvents,
    transport::Transport,
    view_state::{ViewState, ViewStateController},
};

#[derive(Debug, Default)]
struct CollectionSlot {
    records: MergedList,
    last_error: Option<String>,
}

pub struct SearchScreen {
    resolver: IndexResolver,
    aggregator: DetailAggregator,
    routes_endpoints: CollectionEndpoints,
    collections_endpoints: CollectionEndpoints,
    view: ViewStateController,
    navigator: Arc<dyn Navigator>,
    routes: CollectionSlot,
    collections: CollectionSlot,
}

impl SearchScreen {
    pub fn mount(
        settings: &ScreenSettings,
        transport: Arc<dyn Transport>,
        navigator: Arc<dyn Navigator>,
        pointer: &PointerEvents,
    ) -> Result<Self> {
        let routes_endpoints = settings.endpoints(CollectionKind::Routes)?;
        let collections_endpoints = settings.endpoints(CollectionKind::Collections)?;

        let aggregator = match settings.max_concurrent_details {
            Some(limit) => DetailAggregator::with_concurrency_limit(Arc::clone(&transport), limit),
            None => DetailAggregator::new(Arc::clone(&transport)),
        };

        Ok(Self {
            resolver: IndexResolver::new(transport),
            aggregator,
            routes_endpoints,
            collections_endpoints,
            view: ViewStateController::mount(pointer),
            navigator,
            routes: CollectionSlot::default(),
            collections: CollectionSlot::default(),
        })
    }

    /// Runs both fetch cycles concurrently and stores each outcome on its own.
    pub async fn load(&mut self) {
        let (routes, collections) = tokio::join!(
            self.fetch_collection(CollectionKind::Routes),
            self.fetch_collection(CollectionKind::Collections)
        );
        self.apply_fetch(CollectionKind::Routes, routes);
        self.apply_fetch(CollectionKind::Collections, collections);
    }

    /// Runs one fetch cycle and stores its outcome.
    pub async fn reload(&mut self, kind: CollectionKind) {
        let outcome = self.fetch_collection(kind).await;
        self.apply_fetch(kind, outcome);
    }

    pub async fn fetch_collection(&self, kind: CollectionKind) -> Result<MergedList, FetchError> {
        let endpoints = self.endpoints(kind);
        let ids = self
            .resolver
            .resolve_index(&endpoints.index_url, kind.ids_field())
            .await?;
        Ok(self.aggregator.resolve_details(&ids, &endpoints.detail).await?)
    }

    fn apply_fetch(&mut self, kind: CollectionKind, outcome: Result<MergedList, FetchError>) {
        let slot = self.slot_mut(kind);
        match outcome {
            Ok(records) => {
                info!(%kind, count = records.len(), "collection loaded");
                slot.records = records;
                slot.last_error = None;
            }
            Err(err) => {
                match &err {
                    FetchError::Index(_) => {
                        error!(%kind, error = %err, "failed to load collection index")
                    }
                    FetchError::Aggregation(_) => {
                        warn!(%kind, error = %err, "keeping previous list after failed refresh")
                    }
                }
                slot.last_error = Some(err.to_string());
            }
        }
    }

    fn endpoints(&self, kind: CollectionKind) -> &CollectionEndpoints {
        match kind {
            CollectionKind::Routes => &self.routes_endpoints,
            CollectionKind::Collections => &self.collections_endpoints,
        }
    }

    fn slot(&self, kind: CollectionKind) -> &CollectionSlot {
        match kind {
            CollectionKind::Routes => &self.routes,
            CollectionKind::Collections => &self.collections,
        }
    }

    fn slot_mut(&mut self, kind: CollectionKind) -> &mut CollectionSlot {
        match kind {
            CollectionKind::Routes => &mut self.routes,
            CollectionKind::Collections => &mut self.collections,
        }
    }

    pub fn records(&self, kind: CollectionKind) -> &MergedList {
        &self.slot(kind).records
    }

    /// The list of the active collection type.
    pub fn visible_records(&self) -> &MergedList {
        self.records(self.view.state().active_collection)
    }

    pub fn last_error(&self, kind: CollectionKind) -> Option<&str> {
        self.slot(kind).last_error.as_deref()
    }

    pub fn view_state(&self) -> ViewState {
        self.view.state()
    }

    pub fn select_collection_type(&self, kind: CollectionKind) {
        self.view.select_collection_type(kind);
    }

    pub fn select_sort_tab(&self, tab: SortTab) {
        self.view.select_sort_tab(tab);
    }

    pub fn dismiss_sort_tab(&self) {
        self.view.dismiss_sort_tab();
    }

    /// Opens the detail view of `id` under the active collection type.
    pub fn select_item(&self, id: &Identifier) {
        let kind = self.view.state().active_collection;
        self.navigator.go_to(&detail_path(kind, id));
    }

    pub fn teardown(self) {
        self.view.teardown();
    }
}

#[cfg(test)]
#[path = "tests/screen_tests.rs"]
mod tests;
