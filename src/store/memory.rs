//! # In-Memory Document Store
//!
//! [`StoreActor`] owns the documents and processes [`StoreRequest`]s one at a
//! time, so the map needs no lock. [`MemoryStore`] is the cloneable handle that
//! turns [`DocumentStore`] calls into messages and waits for the answer on a
//! oneshot channel.
//!
//! Enumeration follows insertion order.

use crate::model::BlogItem;
use crate::store::oid::{ObjectId, ObjectIdGenerator};
use crate::store::{Cursor, DeleteResult, DocumentStore, StoreError, UpdateResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Messages understood by the [`StoreActor`].
#[derive(Debug)]
pub enum StoreRequest {
    Insert {
        item: BlogItem,
        respond_to: Response<ObjectId>,
    },
    FindOne {
        id: ObjectId,
        respond_to: Response<Option<BlogItem>>,
    },
    UpdateOne {
        id: ObjectId,
        item: BlogItem,
        respond_to: Response<UpdateResult>,
    },
    DeleteOne {
        id: ObjectId,
        respond_to: Response<DeleteResult>,
    },
    FindAll {
        respond_to: Response<Vec<BlogItem>>,
    },
}

/// Owner of the stored documents.
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    documents: HashMap<ObjectId, BlogItem>,
    order: Vec<ObjectId>,
    ids: ObjectIdGenerator,
}

impl StoreActor {
    /// Creates the actor and its handle. The actor does nothing until [`run`](Self::run).
    pub fn new(buffer_size: usize) -> (Self, MemoryStore) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let actor = Self {
            receiver,
            documents: HashMap::new(),
            order: Vec::new(),
            ids: ObjectIdGenerator::new(),
        };
        (actor, MemoryStore { sender })
    }

    /// Processes requests until every handle has been dropped.
    pub async fn run(mut self) {
        info!("Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Insert {
                    mut item,
                    respond_to,
                } => {
                    let id = self.ids.generate();
                    item.id = Some(id);
                    self.documents.insert(id, item);
                    self.order.push(id);
                    debug!(%id, size = self.documents.len(), "Inserted");
                    let _ = respond_to.send(Ok(id));
                }
                StoreRequest::FindOne { id, respond_to } => {
                    let item = self.documents.get(&id).cloned();
                    debug!(%id, found = item.is_some(), "FindOne");
                    let _ = respond_to.send(Ok(item));
                }
                StoreRequest::UpdateOne {
                    id,
                    item,
                    respond_to,
                } => {
                    let result = match self.documents.get_mut(&id) {
                        Some(stored) => {
                            let modified = stored.author_id != item.author_id
                                || stored.title != item.title
                                || stored.content != item.content;
                            stored.author_id = item.author_id;
                            stored.title = item.title;
                            stored.content = item.content;
                            UpdateResult {
                                matched_count: 1,
                                modified_count: u64::from(modified),
                            }
                        }
                        None => UpdateResult::default(),
                    };
                    debug!(%id, matched = result.matched_count, "UpdateOne");
                    let _ = respond_to.send(Ok(result));
                }
                StoreRequest::DeleteOne { id, respond_to } => {
                    let removed = self.documents.remove(&id).is_some();
                    if removed {
                        self.order.retain(|stored| *stored != id);
                    }
                    debug!(%id, removed, size = self.documents.len(), "DeleteOne");
                    let _ = respond_to.send(Ok(DeleteResult {
                        deleted_count: u64::from(removed),
                    }));
                }
                StoreRequest::FindAll { respond_to } => {
                    let items = self
                        .order
                        .iter()
                        .filter_map(|id| self.documents.get(id).cloned())
                        .collect::<Vec<_>>();
                    debug!(count = items.len(), "FindAll");
                    let _ = respond_to.send(Ok(items));
                }
            }
        }

        info!(size = self.documents.len(), "Store shutdown");
    }
}

/// Cloneable handle to a running [`StoreActor`].
#[derive(Clone)]
pub struct MemoryStore {
    sender: mpsc::Sender<StoreRequest>,
}

impl MemoryStore {
    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Unavailable)?;
        response.await.map_err(|_| StoreError::Unavailable)?
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, item: BlogItem) -> Result<ObjectId, StoreError> {
        self.request(|respond_to| StoreRequest::Insert { item, respond_to })
            .await
    }

    async fn find_one(&self, id: ObjectId) -> Result<Option<BlogItem>, StoreError> {
        self.request(|respond_to| StoreRequest::FindOne { id, respond_to })
            .await
    }

    async fn update_one(&self, id: ObjectId, item: BlogItem) -> Result<UpdateResult, StoreError> {
        self.request(|respond_to| StoreRequest::UpdateOne {
            id,
            item,
            respond_to,
        })
        .await
    }

    async fn delete_one(&self, id: ObjectId) -> Result<DeleteResult, StoreError> {
        self.request(|respond_to| StoreRequest::DeleteOne { id, respond_to })
            .await
    }

    async fn find_all(&self) -> Result<Cursor, StoreError> {
        let items = self
            .request(|respond_to| StoreRequest::FindAll { respond_to })
            .await?;
        Ok(Cursor::from_items(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> BlogItem {
        BlogItem {
            id: None,
            author_id: "John".into(),
            title: title.into(),
            content: "Content".into(),
        }
    }

    #[tokio::test]
    async fn test_store_crud_and_insertion_order() {
        let (actor, store) = StoreActor::new(8);
        tokio::spawn(actor.run());

        let first = store.insert_one(item("first")).await.unwrap();
        let second = store.insert_one(item("second")).await.unwrap();

        let found = store.find_one(first).await.unwrap().unwrap();
        assert_eq!(found.id, Some(first));
        assert_eq!(found.title, "first");

        let updated = store.update_one(second, item("changed")).await.unwrap();
        assert_eq!(updated.matched_count, 1);
        assert_eq!(updated.modified_count, 1);

        let mut cursor = store.find_all().await.unwrap();
        let mut titles = Vec::new();
        while let Some(next) = cursor.next().await {
            titles.push(next.unwrap().title);
        }
        assert_eq!(titles, vec!["first", "changed"]);

        assert_eq!(store.delete_one(first).await.unwrap().deleted_count, 1);
        assert_eq!(store.delete_one(first).await.unwrap().deleted_count, 0);
        assert!(store.find_one(first).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_matches_nothing() {
        let (actor, store) = StoreActor::new(8);
        tokio::spawn(actor.run());

        let unknown = ObjectIdGenerator::new().generate();
        let result = store.update_one(unknown, item("x")).await.unwrap();
        assert_eq!(result, UpdateResult::default());
    }

    #[tokio::test]
    async fn test_handle_reports_unavailable_after_shutdown() {
        let (actor, store) = StoreActor::new(8);
        drop(actor);

        let err = store.find_all().await.unwrap_err();
        assert_eq!(err, StoreError::Unavailable);
    }
}
