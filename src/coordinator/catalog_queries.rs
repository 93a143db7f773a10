use std::collections::{BTreeSet, HashMap};

use tokio::sync::oneshot;

use crate::{domain::entities::product::Catalog, errors::IapError};

pub(crate) type QueryId = u64;
pub(crate) type CatalogReply = oneshot::Sender<Result<Catalog, IapError>>;

/// One outstanding catalog query. Created when a fetch starts, destroyed
/// the instant its outcome arrives. Concurrent identical queries are never
/// merged.
pub(crate) struct ProductQuery {
    pub requested_ids: BTreeSet<String>,
    reply: CatalogReply,
}

impl ProductQuery {
    pub fn resolve(self, outcome: Result<Catalog, IapError>) {
        // The caller may have dropped its future; nothing left to notify.
        let _ = self.reply.send(outcome);
    }
}

/// Tracks outstanding catalog queries, keyed by query identity.
#[derive(Default)]
pub(crate) struct ProductQueryRegistry {
    next_id: QueryId,
    queries: HashMap<QueryId, ProductQuery>,
}

impl ProductQueryRegistry {
    pub fn register(&mut self, requested_ids: BTreeSet<String>, reply: CatalogReply) -> QueryId {
        let id = self.next_id;
        self.next_id += 1;
        self.queries.insert(
            id,
            ProductQuery {
                requested_ids,
                reply,
            },
        );
        id
    }

    pub fn remove(&mut self, id: QueryId) -> Option<ProductQuery> {
        self.queries.remove(&id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.queries.len()
    }
}
