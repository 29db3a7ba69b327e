//! Demo client run: one call of every greet shape, then the blog CRUD walk
//! through create, read, update, list and delete.

use blog_rpc::framework::{CallOptions, Status};
use blog_rpc::lifecycle::{setup_tracing, RpcSystem};
use blog_rpc::model::{Blog, BlogId, GreetRequest};
use std::time::Duration;
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting blog and greet servers");
    let system = RpcSystem::new();

    greet_demo(&system)
        .instrument(tracing::info_span!("greet_demo"))
        .await
        .map_err(|e| e.to_string())?;

    blog_demo(&system)
        .instrument(tracing::info_span!("blog_demo"))
        .await
        .map_err(|e| e.to_string())?;

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}

async fn greet_demo(system: &RpcSystem) -> Result<(), Status> {
    let client = &system.greet_client;
    let options = CallOptions::new();

    let reply = client.greet(&options, GreetRequest::new("Clement")).await?;
    info!(result = %reply.result, "Greet");

    let mut stream = client
        .greet_many_times(&options, GreetRequest::new("Clement"))
        .await?;
    while let Some(reply) = stream.message().await? {
        info!(result = %reply.result, "GreetManyTimes");
    }

    let call = client.long_greet(&options).await?;
    for name in ["Clement", "Marie", "Paul"] {
        call.send(GreetRequest::new(name)).await?;
    }
    let reply = call.close_and_recv().await?;
    info!(result = ?reply.result, "LongGreet");

    let (requests, mut responses) = client.greet_everyone(&options).await?;
    let feeder = tokio::spawn(async move {
        for name in ["Clement", "Marie", "Paul"] {
            requests.send(GreetRequest::new(name)).await?;
        }
        requests.close().await
    });
    while let Some(reply) = responses.message().await? {
        info!(result = %reply.result, "GreetEveryone");
    }
    feeder
        .await
        .map_err(|e| Status::internal(e.to_string()))??;

    for timeout in [Duration::from_secs(5), Duration::from_secs(1)] {
        let options = CallOptions::new().with_timeout(timeout);
        match client
            .greet_with_deadline(&options, GreetRequest::new("Clement"))
            .await
        {
            Ok(reply) => info!(?timeout, result = %reply.result, "GreetWithDeadline"),
            Err(status) => warn!(?timeout, %status, "GreetWithDeadline"),
        }
    }
    Ok(())
}

async fn blog_demo(system: &RpcSystem) -> Result<(), Status> {
    let client = &system.blog_client;
    let options = CallOptions::new();

    let blog = Blog::new("John", "My first blog", "Content of first blog");
    let created = client.create_blog(&options, blog).await?;
    info!(id = %created.id, "Blog has been created");

    match client
        .read_blog(&options, BlogId::new("00-000000-000"))
        .await
    {
        Ok(blog) => error!(?blog, "Read an unparseable id"),
        Err(status) => info!(%status, "Error happened while reading"),
    }

    let read = client.read_blog(&options, created.clone()).await?;
    info!(?read, "Blog was read");

    let updated = Blog {
        title: "Updated title".into(),
        ..read
    };
    client.update_blog(&options, updated).await?;
    info!("Blog was updated");

    list(system).await?;

    client.delete_blog(&options, created).await?;
    info!("Blog was deleted");

    list(system).await
}

async fn list(system: &RpcSystem) -> Result<(), Status> {
    let mut stream = system.blog_client.list_blogs(&CallOptions::new()).await?;
    let mut count = 0usize;
    while let Some(blog) = stream.message().await? {
        count += 1;
        info!(?blog, "Listed");
    }
    info!(count, "Listing done");
    Ok(())
}
