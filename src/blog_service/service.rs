//! Request handling for the blog service.
//!
//! Every operation validates the identifier before touching the store, and
//! every store round trip is a suspension point raced against the call
//! context, so an expired or cancelled call stops waiting on the store.

use crate::blog_service::error::BlogError;
use crate::blog_service::message::BlogCall;
use crate::framework::{handler, CallContext, Code, Service, Status, StreamSender};
use crate::model::{Blog, BlogId, BlogItem, Empty};
use crate::store::{DocumentStore, ObjectId};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Blog CRUD over a shared [`DocumentStore`] handle.
pub struct BlogService {
    store: Arc<dyn DocumentStore>,
    list_timeout: Duration,
}

impl BlogService {
    pub fn new(store: Arc<dyn DocumentStore>, list_timeout: Duration) -> Self {
        Self {
            store,
            list_timeout,
        }
    }

    pub async fn create_blog(&self, ctx: &CallContext, blog: Blog) -> Result<BlogId, Status> {
        debug!(?blog, "CreateBlog");
        let id = ctx
            .run(self.store.insert_one(BlogItem::from_blog(blog)))
            .await?
            .map_err(BlogError::from)?;
        info!(%id, "Created");
        Ok(BlogId::new(id.to_hex()))
    }

    pub async fn read_blog(&self, ctx: &CallContext, request: BlogId) -> Result<Blog, Status> {
        let oid = parse_id(&request.id)?;
        let found = ctx
            .run(self.store.find_one(oid))
            .await?
            .map_err(BlogError::from)?;
        let item = found.ok_or_else(|| BlogError::NotFound(request.id))?;
        Ok(item.to_blog())
    }

    pub async fn update_blog(&self, ctx: &CallContext, blog: Blog) -> Result<Empty, Status> {
        debug!(?blog, "UpdateBlog");
        let oid = parse_id(&blog.id)?;
        let id = blog.id.clone();
        let result = ctx
            .run(self.store.update_one(oid, BlogItem::from_blog(blog)))
            .await?
            .map_err(BlogError::from)?;
        if result.matched_count == 0 {
            return Err(BlogError::NotFound(id).into());
        }
        info!(%oid, modified = result.modified_count, "Updated");
        Ok(Empty)
    }

    /// Deleting an id that matches nothing is a success: delete is idempotent.
    pub async fn delete_blog(&self, ctx: &CallContext, request: BlogId) -> Result<Empty, Status> {
        let oid = parse_id(&request.id)?;
        let result = ctx
            .run(self.store.delete_one(oid))
            .await?
            .map_err(BlogError::from)?;
        info!(%oid, deleted = result.deleted_count, "Deleted");
        Ok(Empty)
    }

    /// Streams every stored post. The whole enumeration is bounded by the list
    /// timeout on top of the caller's own deadline.
    pub async fn list_blogs(
        &self,
        ctx: &CallContext,
        responses: &StreamSender<Blog>,
    ) -> Result<(), Status> {
        let bounded = ctx.with_timeout(self.list_timeout);
        match self.stream_blogs(&bounded, responses).await {
            // Only the caller's deadline is a deadline expiry; the store
            // running past the list bound is a store failure.
            Err(status) if status.code() == Code::DeadlineExceeded && !ctx.is_expired() => {
                warn!(timeout = ?self.list_timeout, "Store did not finish listing in time");
                Err(Status::internal("Unknown internal error"))
            }
            outcome => outcome,
        }
    }

    async fn stream_blogs(
        &self,
        ctx: &CallContext,
        responses: &StreamSender<Blog>,
    ) -> Result<(), Status> {
        let mut cursor = ctx
            .run(self.store.find_all())
            .await?
            .map_err(BlogError::from)?;
        let mut sent = 0usize;
        while let Some(next) = ctx.run(cursor.next()).await? {
            let item = next.map_err(|e| {
                warn!(error = %e, sent, "Cursor failed");
                Status::internal("Error while decoding data from database")
            })?;
            responses.send(item.to_blog()).await?;
            sent += 1;
        }
        info!(sent, "Listed");
        Ok(())
    }
}

fn parse_id(id: &str) -> Result<ObjectId, BlogError> {
    ObjectId::parse_str(id).map_err(|e| {
        debug!(id, error = %e, "Rejected id");
        BlogError::InvalidId(e)
    })
}

#[async_trait]
impl Service for BlogService {
    type Request = BlogCall;
    const NAME: &'static str = "BlogService";

    async fn call(&self, request: BlogCall) {
        match request {
            BlogCall::Create {
                ctx,
                blog,
                respond_to,
            } => handler::unary(&ctx, respond_to, self.create_blog(&ctx, blog)).await,
            BlogCall::Read {
                ctx,
                id,
                respond_to,
            } => handler::unary(&ctx, respond_to, self.read_blog(&ctx, id)).await,
            BlogCall::Update {
                ctx,
                blog,
                respond_to,
            } => handler::unary(&ctx, respond_to, self.update_blog(&ctx, blog)).await,
            BlogCall::Delete {
                ctx,
                id,
                respond_to,
            } => handler::unary(&ctx, respond_to, self.delete_blog(&ctx, id)).await,
            BlogCall::List { ctx, responses } => {
                let list_ctx = ctx.clone();
                handler::server_streaming(&ctx, responses, |sink| async move {
                    self.list_blogs(&list_ctx, &sink).await
                })
                .await
            }
        }
    }
}
