//! Parallel resolution of an index into full records with an all-or-nothing
//! fan-in.

use std::sync::Arc;

use futures::future::join_all;
use shared::{
    domain::{Identifier, Record},
    protocol::{project_record, DetailShape},
};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::{
    error::{AggregationError, DetailError, DetailFailure},
    index::IndexList,
    navigator::path_segment,
    transport::Transport,
};

const ID_PLACEHOLDER: &str = "{id}";

/// Detail URL template (containing `{id}`) plus the response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailEndpoint {
    pub template: String,
    pub shape: DetailShape,
}

impl DetailEndpoint {
    pub fn new(template: impl Into<String>, shape: DetailShape) -> Self {
        Self {
            template: template.into(),
            shape,
        }
    }

    /// Substitutes `id` as a single percent-encoded path segment. Empty and
    /// dot-only identifiers would resolve to another resource and are refused.
    pub fn url_for(&self, id: &Identifier) -> Result<String, DetailError> {
        if matches!(id.to_string().as_str(), "" | "." | "..") {
            return Err(DetailError::Unaddressable(id.clone()));
        }
        Ok(self.template.replace(ID_PLACEHOLDER, &path_segment(id)))
    }
}

/// Render-ready records, ordered like the index they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedList(Vec<Record>);

impl MergedList {
    pub fn new(records: Vec<Record>) -> Self {
        Self(records)
    }

    pub fn records(&self) -> &[Record] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.0.iter()
    }

    pub fn find(&self, id: &Identifier) -> Option<&Record> {
        self.0.iter().find(|r| &r.id == id)
    }

    /// Maps user-typed text to an identifier, preferring a listed identifier
    /// with the same text (`"007"` stays a string if the index said so).
    pub fn resolve_identifier(&self, text: &str) -> Identifier {
        let text = text.trim();
        self.0
            .iter()
            .find(|r| r.id.to_string() == text)
            .map(|r| r.id.clone())
            .unwrap_or_else(|| match text.parse() {
                Ok(id) => id,
                Err(never) => match never {},
            })
    }
}

pub struct DetailAggregator {
    transport: Arc<dyn Transport>,
    limiter: Option<Arc<Semaphore>>,
}

impl DetailAggregator {
    /// Every detail request of a fan-out is in flight at once.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            limiter: None,
        }
    }

    /// At most `limit` detail requests are in flight at once.
    pub fn with_concurrency_limit(transport: Arc<dyn Transport>, limit: usize) -> Self {
        Self {
            transport,
            limiter: Some(Arc::new(Semaphore::new(limit.max(1)))),
        }
    }

    pub async fn resolve_details(
        &self,
        ids: &IndexList,
        endpoint: &DetailEndpoint,
    ) -> Result<MergedList, AggregationError> {
        let settled = join_all(ids.iter().map(|id| self.resolve_one(id, endpoint))).await;

        let mut records = Vec::with_capacity(ids.len());
        let mut failures = Vec::new();
        for (id, outcome) in ids.iter().zip(settled) {
            match outcome {
                Ok(record) => records.push(record),
                Err(error) => failures.push(DetailFailure {
                    id: id.clone(),
                    error,
                }),
            }
        }

        if !failures.is_empty() {
            let err = AggregationError {
                requested: ids.len(),
                failures,
            };
            warn!(template = %endpoint.template, error = %err, "detail aggregation failed");
            return Err(err);
        }

        debug!(template = %endpoint.template, count = records.len(), "resolved details");
        Ok(MergedList::new(records))
    }

    async fn resolve_one(
        &self,
        id: &Identifier,
        endpoint: &DetailEndpoint,
    ) -> Result<Record, DetailError> {
        // The limiter is never closed, so acquire cannot fail.
        let _permit = match &self.limiter {
            Some(limiter) => limiter.acquire().await.ok(),
            None => None,
        };
        let url = endpoint.url_for(id)?;
        let body = self.transport.fetch_json(&url).await?;
        Ok(project_record(&body, &endpoint.shape, id)?)
    }
}

#[cfg(test)]
#[path = "tests/aggregator_tests.rs"]
mod tests;
