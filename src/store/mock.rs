//! # Mock Store & Testing Guide
//!
//! [`MockStore`] implements [`DocumentStore`] from a queue of expectations. It
//! lets service tests inject store failures, missing documents and slow or
//! broken cursors deterministically, without a running store actor.
//!
//! ## When to use the mock vs the real store
//!
//! | Feature | MockStore | MemoryStore |
//! |---------|-----------|-------------|
//! | **State** | None (scripted answers) | Real documents |
//! | **Error injection** | Easy (`return_err`) | Not possible |
//! | **Cursor timing** | Scripted delays and failures | Instant |
//! | **Use case** | Error mapping, timeouts | End-to-end flows |
//!
//! ## Example
//!
//! ```rust
//! use blog_rpc::store::mock::MockStore;
//! use blog_rpc::store::{DocumentStore, ObjectId, StoreError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MockStore::new();
//!     store.expect_find_one().return_err(StoreError::Backend("down".into()));
//!
//!     let id = ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap();
//!     assert!(store.find_one(id).await.is_err());
//!     store.verify();
//! }
//! ```
//!
//! Expectations are consumed in order; a call that does not match the next
//! expectation panics, which fails the test.

use crate::model::BlogItem;
use crate::store::oid::ObjectId;
use crate::store::{Cursor, DeleteResult, DocumentStore, StoreError, UpdateResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Scripted answer to one store call.
enum Expectation {
    Insert {
        response: Result<ObjectId, StoreError>,
    },
    FindOne {
        response: Result<Option<BlogItem>, StoreError>,
    },
    UpdateOne {
        response: Result<UpdateResult, StoreError>,
    },
    DeleteOne {
        response: Result<DeleteResult, StoreError>,
    },
    FindAll {
        response: Result<CursorScript, StoreError>,
    },
}

impl Expectation {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Insert { .. } => "insert_one",
            Expectation::FindOne { .. } => "find_one",
            Expectation::UpdateOne { .. } => "update_one",
            Expectation::DeleteOne { .. } => "delete_one",
            Expectation::FindAll { .. } => "find_all",
        }
    }
}

/// How a scripted cursor yields its documents.
#[derive(Debug, Clone, Default)]
pub struct CursorScript {
    items: Vec<BlogItem>,
    delay: Duration,
    failure: Option<StoreError>,
}

impl CursorScript {
    pub fn new(items: Vec<BlogItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Waits `delay` before yielding each document.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fails with `error` after the last document.
    pub fn then_fail(mut self, error: StoreError) -> Self {
        self.failure = Some(error);
        self
    }

    fn into_cursor(self) -> Cursor {
        let (sender, receiver) = mpsc::channel(1);
        tokio::spawn(async move {
            for item in self.items {
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
                if sender.send(Ok(item)).await.is_err() {
                    return;
                }
            }
            if let Some(error) = self.failure {
                let _ = sender.send(Err(error)).await;
            }
        });
        Cursor::new(receiver)
    }
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A document store answering from scripted expectations.
#[derive(Clone, Default)]
pub struct MockStore {
    expectations: Expectations,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_insert(&self) -> ExpectationBuilder<ObjectId> {
        self.builder(|response| Expectation::Insert { response })
    }

    pub fn expect_find_one(&self) -> ExpectationBuilder<Option<BlogItem>> {
        self.builder(|response| Expectation::FindOne { response })
    }

    pub fn expect_update_one(&self) -> ExpectationBuilder<UpdateResult> {
        self.builder(|response| Expectation::UpdateOne { response })
    }

    pub fn expect_delete_one(&self) -> ExpectationBuilder<DeleteResult> {
        self.builder(|response| Expectation::DeleteOne { response })
    }

    pub fn expect_find_all(&self) -> ExpectationBuilder<CursorScript> {
        self.builder(|response| Expectation::FindAll { response })
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn builder<T>(
        &self,
        wrap: fn(Result<T, StoreError>) -> Expectation,
    ) -> ExpectationBuilder<T> {
        ExpectationBuilder {
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    fn next(&self, called: &str) -> Expectation {
        let mut exps = self.expectations.lock().unwrap();
        match exps.pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected store call: {called}"),
        }
    }
}

/// Builder completing one expectation.
pub struct ExpectationBuilder<T> {
    wrap: fn(Result<T, StoreError>) -> Expectation,
    expectations: Expectations,
}

impl<T> ExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, StoreError>) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back((self.wrap)(response));
    }
}

fn mismatch(called: &str, expected: Expectation) -> ! {
    panic!(
        "Unexpected store call: {called}, expected {}",
        expected.name()
    )
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn insert_one(&self, _item: BlogItem) -> Result<ObjectId, StoreError> {
        match self.next("insert_one") {
            Expectation::Insert { response } => response,
            other => mismatch("insert_one", other),
        }
    }

    async fn find_one(&self, _id: ObjectId) -> Result<Option<BlogItem>, StoreError> {
        match self.next("find_one") {
            Expectation::FindOne { response } => response,
            other => mismatch("find_one", other),
        }
    }

    async fn update_one(&self, _id: ObjectId, _item: BlogItem) -> Result<UpdateResult, StoreError> {
        match self.next("update_one") {
            Expectation::UpdateOne { response } => response,
            other => mismatch("update_one", other),
        }
    }

    async fn delete_one(&self, _id: ObjectId) -> Result<DeleteResult, StoreError> {
        match self.next("delete_one") {
            Expectation::DeleteOne { response } => response,
            other => mismatch("delete_one", other),
        }
    }

    async fn find_all(&self) -> Result<Cursor, StoreError> {
        match self.next("find_all") {
            Expectation::FindAll { response } => response.map(CursorScript::into_cursor),
            other => mismatch("find_all", other),
        }
    }
}
