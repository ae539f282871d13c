use std::sync::Arc;

use shared::{
    domain::Identifier,
    protocol::{validate_index, IndexPayload},
};
use tracing::{debug, warn};

use crate::{error::TransportError, transport::Transport};

/// Identifiers of one collection type, in the order the service listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexList(Vec<Identifier>);

impl IndexList {
    pub fn new(ids: Vec<Identifier>) -> Self {
        Self(ids)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Identifier> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Identifier] {
        &self.0
    }
}

impl FromIterator<Identifier> for IndexList {
    fn from_iter<T: IntoIterator<Item = Identifier>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub struct IndexResolver {
    transport: Arc<dyn Transport>,
}

impl IndexResolver {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetches the identifiers listed under `ids_field`. An unusable body
    /// degrades to an empty list; only transport failures are errors.
    pub async fn resolve_index(
        &self,
        url: &str,
        ids_field: &str,
    ) -> Result<IndexList, TransportError> {
        let body = self.transport.fetch_json(url).await?;
        match validate_index(&body, ids_field) {
            IndexPayload::Valid(ids) => {
                debug!(url, count = ids.len(), "resolved index");
                Ok(IndexList::new(ids))
            }
            IndexPayload::Defaulted(err) => {
                warn!(url, error = %err, "index response unusable; treating as empty");
                Ok(IndexList::default())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/index_tests.rs"]
mod tests;
