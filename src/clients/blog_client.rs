use crate::blog_service::message::{
    BlogCall, CREATE_BLOG, DELETE_BLOG, LIST_BLOGS, READ_BLOG, UPDATE_BLOG,
};
use crate::framework::{CallOptions, Channel, Status, Streaming};
use crate::model::{Blog, BlogId, Empty};
use tracing::{debug, instrument};

/// Client for interacting with the blog server.
#[derive(Clone)]
pub struct BlogClient {
    channel: Channel<BlogCall>,
}

impl BlogClient {
    pub fn new(channel: Channel<BlogCall>) -> Self {
        Self { channel }
    }

    #[instrument(skip(self, options))]
    pub async fn create_blog(&self, options: &CallOptions, blog: Blog) -> Result<BlogId, Status> {
        debug!("Sending request");
        self.channel
            .unary(CREATE_BLOG, options, |ctx, respond_to| BlogCall::Create {
                ctx,
                blog,
                respond_to,
            })
            .await
    }

    #[instrument(skip(self, options))]
    pub async fn read_blog(&self, options: &CallOptions, id: BlogId) -> Result<Blog, Status> {
        debug!("Sending request");
        self.channel
            .unary(READ_BLOG, options, |ctx, respond_to| BlogCall::Read {
                ctx,
                id,
                respond_to,
            })
            .await
    }

    #[instrument(skip(self, options))]
    pub async fn update_blog(&self, options: &CallOptions, blog: Blog) -> Result<Empty, Status> {
        debug!("Sending request");
        self.channel
            .unary(UPDATE_BLOG, options, |ctx, respond_to| BlogCall::Update {
                ctx,
                blog,
                respond_to,
            })
            .await
    }

    #[instrument(skip(self, options))]
    pub async fn delete_blog(&self, options: &CallOptions, id: BlogId) -> Result<Empty, Status> {
        debug!("Sending request");
        self.channel
            .unary(DELETE_BLOG, options, |ctx, respond_to| BlogCall::Delete {
                ctx,
                id,
                respond_to,
            })
            .await
    }

    /// Opens the listing stream. Items arrive in store order.
    #[instrument(skip(self, options))]
    pub async fn list_blogs(&self, options: &CallOptions) -> Result<Streaming<Blog>, Status> {
        debug!("Sending request");
        self.channel
            .server_streaming(LIST_BLOGS, options, |ctx, responses| BlogCall::List {
                ctx,
                responses,
            })
            .await
    }
}
