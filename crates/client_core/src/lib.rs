//! Data aggregation and view state for the routes/collections search screen.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod index;
pub mod navigator;
pub mod pointer;
pub mod screen;
pub mod transport;
pub mod view_state;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use aggregator::{DetailAggregator, DetailEndpoint, MergedList};
pub use config::{load_settings, load_settings_from, CollectionEndpoints, ScreenSettings};
pub use error::{AggregationError, DetailError, DetailFailure, FetchError, TransportError};
pub use index::{IndexList, IndexResolver};
pub use navigator::{detail_path, HistoryNavigator, Navigator};
pub use pointer::{ListenerGuard, PointerEvent, PointerEvents, ScreenRegion};
pub use screen::SearchScreen;
pub use transport::{HttpTransport, Transport};
pub use view_state::{ViewState, ViewStateController};
