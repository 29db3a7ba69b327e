use blog_rpc::framework::{CallOptions, Code};
use blog_rpc::lifecycle::RpcSystem;
use blog_rpc::model::{Blog, BlogId, Empty, GreetRequest};

async fn list_all(system: &RpcSystem) -> Vec<Blog> {
    system
        .blog_client
        .list_blogs(&CallOptions::new())
        .await
        .expect("Failed to open list")
        .try_collect()
        .await
        .expect("List ended with an error")
}

/// Full end-to-end walk through the blog service with the in-memory store.
#[tokio::test]
async fn test_full_blog_lifecycle() {
    let system = RpcSystem::new();
    let options = CallOptions::new();
    let client = &system.blog_client;

    let blog = Blog::new("John", "My first blog", "Content of first blog");
    let created = client
        .create_blog(&options, blog.clone())
        .await
        .expect("Failed to create blog");
    assert_eq!(created.id.len(), 24);

    // Read returns the stored fields under the assigned id
    let read = client
        .read_blog(&options, created.clone())
        .await
        .expect("Failed to read blog");
    assert_eq!(
        read,
        Blog {
            id: created.id.clone(),
            ..blog.clone()
        }
    );

    // Update the title only; author and content go over unchanged
    let updated = Blog {
        title: "Updated title".into(),
        ..read.clone()
    };
    let reply = client
        .update_blog(&options, updated.clone())
        .await
        .expect("Failed to update blog");
    assert_eq!(reply, Empty);
    let reread = client.read_blog(&options, created.clone()).await.unwrap();
    assert_eq!(reread.title, "Updated title");
    assert_eq!(reread.author_id, "John");
    assert_eq!(reread.content, "Content of first blog");

    // Listing sees exactly the one post
    assert_eq!(list_all(&system).await, vec![updated]);

    // Delete, then the post is gone everywhere
    client
        .delete_blog(&options, created.clone())
        .await
        .expect("Failed to delete blog");
    let err = client.read_blog(&options, created.clone()).await.unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
    assert_eq!(err.message(), "Cannot find blog with the provided id");
    assert!(list_all(&system).await.is_empty());

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_create_ignores_supplied_id_and_assigns_distinct_ids() {
    let system = RpcSystem::new();
    let options = CallOptions::new();

    let mut blog = Blog::new("John", "First", "a");
    blog.id = "64b7f0c2a1b2c3d4e5f60718".into();
    let first = system.blog_client.create_blog(&options, blog).await.unwrap();
    let second = system
        .blog_client
        .create_blog(&options, Blog::new("Jane", "Second", "b"))
        .await
        .unwrap();

    assert_ne!(first.id, "64b7f0c2a1b2c3d4e5f60718");
    assert_ne!(first.id, second.id);

    // Listing follows insertion order
    let titles: Vec<_> = list_all(&system)
        .await
        .into_iter()
        .map(|blog| blog.title)
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_malformed_ids_are_invalid_argument() {
    let system = RpcSystem::new();
    let options = CallOptions::new();
    let client = &system.blog_client;

    for bad in ["", "00-000000-000", "64b7f0c2a1b2c3d4e5f6071", "zzb7f0c2a1b2c3d4e5f60718"] {
        let err = client.read_blog(&options, BlogId::new(bad)).await.unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument, "read {bad:?}");
        assert_eq!(err.message(), "Cannot parse id");

        let mut blog = Blog::new("John", "t", "c");
        blog.id = bad.into();
        let err = client.update_blog(&options, blog).await.unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument, "update {bad:?}");

        let err = client.delete_blog(&options, BlogId::new(bad)).await.unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument, "delete {bad:?}");
    }

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unassigned_id_is_not_found_and_delete_is_idempotent() {
    let system = RpcSystem::new();
    let options = CallOptions::new();
    let client = &system.blog_client;
    let unknown = "64b7f0c2a1b2c3d4e5f60718";

    let err = client.read_blog(&options, BlogId::new(unknown)).await.unwrap_err();
    assert_eq!(err.code(), Code::NotFound);

    let mut blog = Blog::new("John", "t", "c");
    blog.id = unknown.into();
    let err = client.update_blog(&options, blog).await.unwrap_err();
    assert_eq!(err.code(), Code::NotFound);

    // Deleting something that is not there succeeds
    assert_eq!(
        client.delete_blog(&options, BlogId::new(unknown)).await.unwrap(),
        Empty
    );

    let created = client
        .create_blog(&options, Blog::new("John", "t", "c"))
        .await
        .unwrap();
    client.delete_blog(&options, created.clone()).await.unwrap();
    client.delete_blog(&options, created).await.unwrap();

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_both_servers_share_one_system() {
    let system = RpcSystem::new();
    let options = CallOptions::new();

    let reply = system
        .greet_client
        .greet(&options, GreetRequest::new("Clement"))
        .await
        .unwrap();
    assert_eq!(reply.result, "Hello Clement");

    system
        .blog_client
        .create_blog(&options, Blog::new("John", "t", "c"))
        .await
        .unwrap();
    assert_eq!(list_all(&system).await.len(), 1);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_calls_fail_unavailable_once_server_is_gone() {
    let system = RpcSystem::new();
    let client = system.blog_client.clone();
    let greet = system.greet_client.clone();
    drop(system);

    // The servers keep running while any client clone is alive.
    let created = client
        .create_blog(&CallOptions::new(), Blog::new("John", "t", "c"))
        .await;
    assert!(created.is_ok());
    drop(greet);

    let (server, orphan) = blog_rpc::greet_service::new(&Default::default());
    drop(server);
    let err = orphan
        .greet(&CallOptions::new(), GreetRequest::new("x"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Unavailable);
}
