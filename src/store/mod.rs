//! # Document Store
//!
//! The persistence engine behind the blog service. The service only ever talks
//! to the [`DocumentStore`] trait through a shared `Arc<dyn DocumentStore>`
//! handle injected at construction; nothing in the crate holds a global store.
//!
//! ## Implementations
//!
//! - [`MemoryStore`]: an actor that owns its documents, keeps insertion order
//!   and answers over channels. Cloning the handle is cheap and no locks are
//!   involved.
//! - [`mock::MockStore`]: expectation-driven store for tests, including
//!   cursors that stall or fail part way through.

pub mod memory;
pub mod mock;
pub mod oid;

pub use memory::{MemoryStore, StoreActor};
pub use oid::{ObjectId, ObjectIdError, ObjectIdGenerator};

use crate::model::BlogItem;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Errors reported by a document store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store stopped answering (its task ended or dropped the request).
    #[error("store unavailable")]
    Unavailable,
    /// A stored document could not be decoded.
    #[error("cannot decode document: {0}")]
    Decode(String),
    /// Any other backend failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Outcome of [`DocumentStore::update_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Outcome of [`DocumentStore::delete_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Async cursor over the documents of a [`DocumentStore::find_all`] query.
#[derive(Debug)]
pub struct Cursor {
    receiver: mpsc::Receiver<Result<BlogItem, StoreError>>,
}

impl Cursor {
    /// Cursor fed by a producer on the other end of `receiver`.
    pub fn new(receiver: mpsc::Receiver<Result<BlogItem, StoreError>>) -> Self {
        Self { receiver }
    }

    /// Cursor over an already materialized result set.
    pub fn from_items(items: Vec<BlogItem>) -> Self {
        let (sender, receiver) = mpsc::channel(items.len().max(1));
        for item in items {
            // Capacity matches the item count.
            let _ = sender.try_send(Ok(item));
        }
        Self { receiver }
    }

    /// Next document, `None` once the result set is exhausted.
    pub async fn next(&mut self) -> Option<Result<BlogItem, StoreError>> {
        self.receiver.recv().await
    }
}

/// Persistence operations the blog service relies on.
///
/// Identifiers are assigned by the store on insert. Callers validate the
/// textual form before building an [`ObjectId`], so every method here
/// receives a well-formed id.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    async fn insert_one(&self, item: BlogItem) -> Result<ObjectId, StoreError>;

    async fn find_one(&self, id: ObjectId) -> Result<Option<BlogItem>, StoreError>;

    /// Overwrites the writable fields of the document with `id`.
    async fn update_one(&self, id: ObjectId, item: BlogItem) -> Result<UpdateResult, StoreError>;

    async fn delete_one(&self, id: ObjectId) -> Result<DeleteResult, StoreError>;

    /// Every document in store order.
    async fn find_all(&self) -> Result<Cursor, StoreError>;
}
