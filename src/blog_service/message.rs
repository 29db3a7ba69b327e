//! Call messages accepted by the blog server.

use crate::framework::{CallContext, CallRequest, Reply, StreamSender};
use crate::model::{Blog, BlogId, Empty};

pub const CREATE_BLOG: &str = "CreateBlog";
pub const READ_BLOG: &str = "ReadBlog";
pub const UPDATE_BLOG: &str = "UpdateBlog";
pub const DELETE_BLOG: &str = "DeleteBlog";
pub const LIST_BLOGS: &str = "ListBlogs";

/// One blog call, as delivered to the [`BlogService`](super::BlogService).
pub enum BlogCall {
    Create {
        ctx: CallContext,
        blog: Blog,
        respond_to: Reply<BlogId>,
    },
    Read {
        ctx: CallContext,
        id: BlogId,
        respond_to: Reply<Blog>,
    },
    Update {
        ctx: CallContext,
        blog: Blog,
        respond_to: Reply<Empty>,
    },
    Delete {
        ctx: CallContext,
        id: BlogId,
        respond_to: Reply<Empty>,
    },
    List {
        ctx: CallContext,
        responses: StreamSender<Blog>,
    },
}

impl CallRequest for BlogCall {
    fn context(&self) -> &CallContext {
        match self {
            BlogCall::Create { ctx, .. }
            | BlogCall::Read { ctx, .. }
            | BlogCall::Update { ctx, .. }
            | BlogCall::Delete { ctx, .. }
            | BlogCall::List { ctx, .. } => ctx,
        }
    }
}
