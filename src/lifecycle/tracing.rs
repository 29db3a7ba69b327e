//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing` subscriber filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); the span
//! hierarchy carries the context instead.
//!
//! ## What Gets Traced
//!
//! - **Server lifecycle**: `Server started` and `Shutdown` per service
//! - **Calls**: one `call` span per call with `service`, `method` and `shape`
//!   fields, closed by `Call ok` or `Call failed` with the status code
//! - **Store**: inserts, lookups, updates and deletes at `debug`
//!
//! ## Example Output
//!
//! With `RUST_LOG=info`:
//!
//! ```text
//! INFO Server started service="BlogService"
//! INFO call: Created id=64b7f0c2a1b2c3d4e5f60718 service="BlogService" method="CreateBlog" shape=unary
//! INFO call: Call ok service="BlogService" method="CreateBlog" shape=unary
//! WARN call: Call failed code=not_found service="BlogService" method="ReadBlog" shape=unary
//! ```
//!
//! With `RUST_LOG=debug`, requests are logged once with their full payload:
//!
//! ```text
//! DEBUG call: CreateBlog blog=Blog { id: "", author_id: "John", title: "My first blog", .. }
//! ```

/// Initializes the global subscriber. Call once, at process start.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
