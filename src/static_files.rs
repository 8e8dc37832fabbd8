//! Static asset resolution.
//!
//! The dispatcher asks an [`AssetResolver`] only after the router came up
//! empty. [`StaticFiles`] is the stock resolver: it maps the request path onto
//! a directory and serves whatever regular file is there.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture as BoxedFuture;

use crate::error::HandlerError;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;

/// What [`AssetResolver::resolve`] returns.
pub type ResolveFuture<'a> = BoxedFuture<'a, Option<BoxedHandler>>;

/// Maps a request to a handler serving filesystem content, if there is any.
///
/// Implementations are shared by every concurrent dispatch and must only
/// need `&self`. Resolution runs on the async runtime, so any filesystem
/// access belongs in the returned future.
pub trait AssetResolver: Send + Sync + 'static {
    fn resolve<'a>(&'a self, req: &'a Request) -> ResolveFuture<'a>;
}

/// Serves files below a root directory.
///
/// Only `GET` is resolved (HEAD reaches the resolver as GET). A path that is a
/// directory resolves to its `index.html`. Paths escaping the root, through
/// `..` or symlinks, never resolve.
#[derive(Clone, Debug)]
pub struct StaticFiles {
    root: PathBuf,
    index: String,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), index: "index.html".to_owned() }
    }

    /// File served for directory paths. Defaults to `index.html`.
    pub fn index_file(mut self, name: impl Into<String>) -> Self {
        self.index = name.into();
        self
    }

    async fn locate(&self, path: &str) -> Option<PathBuf> {
        let root = tokio::fs::canonicalize(&self.root).await.ok()?;
        let relative = path.trim_start_matches('/');
        let mut candidate = root.join(relative);
        if is_dir(&candidate).await {
            candidate = candidate.join(&self.index);
        }
        // Missing files are the common case; not worth a log line.
        let candidate = tokio::fs::canonicalize(&candidate).await.ok()?;
        if !candidate.starts_with(&root) {
            return None;
        }
        let meta = tokio::fs::metadata(&candidate).await.ok()?;
        meta.is_file().then_some(candidate)
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

impl AssetResolver for StaticFiles {
    fn resolve<'a>(&'a self, req: &'a Request) -> ResolveFuture<'a> {
        async move {
            if *req.method() != Method::Get {
                return None;
            }
            let path = self.locate(req.path()).await?;
            Some(Arc::new(StaticFile { path }) as BoxedHandler)
        }
        .boxed()
    }
}

struct StaticFile {
    path: PathBuf,
}

impl ErasedHandler for StaticFile {
    fn call(&self, _req: Request) -> BoxFuture {
        let path = self.path.clone();
        Box::pin(async move {
            let content = tokio::fs::read(&path).await?;
            Ok::<_, HandlerError>(Response::builder().body(content_type(&path), content))
        })
    }
}

/// Content-Type for a file, by extension.
fn content_type(path: &Path) -> &'static str {
    let ext = path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm")  => "text/html; charset=utf-8",
        Some("css")           => "text/css",
        Some("txt" | "md")    => "text/plain; charset=utf-8",
        Some("csv")           => "text/csv",
        Some("xml")           => "application/xml",
        Some("js" | "mjs")    => "application/javascript",
        Some("json")          => "application/json",
        Some("wasm")          => "application/wasm",
        Some("png")           => "image/png",
        Some("jpg" | "jpeg")  => "image/jpeg",
        Some("gif")           => "image/gif",
        Some("svg")           => "image/svg+xml",
        Some("ico")           => "image/x-icon",
        Some("webp")          => "image/webp",
        Some("woff")          => "font/woff",
        Some("woff2")         => "font/woff2",
        Some("pdf")           => "application/pdf",
        Some("zip")           => "application/zip",
        _                     => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    // hello.txt and docs/index.html under a fresh directory.
    fn site() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("hello.txt"), "hi there").unwrap();
        fs::write(dir.path().join("docs/index.html"), "<h1>docs</h1>").unwrap();
        dir
    }

    fn get(path: &str) -> Request {
        Request::builder(Method::Get, path).build()
    }

    #[tokio::test]
    async fn serves_files_with_content_type() {
        let dir = site();
        let files = StaticFiles::new(dir.path());

        let handler = files.resolve(&get("/hello.txt")).await.unwrap();
        let res = handler.call(get("/hello.txt")).await.unwrap();
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"hi there");
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
    }

    #[tokio::test]
    async fn directories_serve_their_index() {
        let dir = site();
        let files = StaticFiles::new(dir.path());

        let res = files.resolve(&get("/docs")).await.unwrap().call(get("/docs")).await.unwrap();
        assert_eq!(res.body(), b"<h1>docs</h1>");
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
    }

    #[tokio::test]
    async fn custom_index_file() {
        let dir = site();
        fs::write(dir.path().join("docs/home.md"), "# home").unwrap();
        let files = StaticFiles::new(dir.path()).index_file("home.md");

        let res = files.resolve(&get("/docs/")).await.unwrap().call(get("/docs/")).await.unwrap();
        assert_eq!(res.body(), b"# home");
    }

    #[tokio::test]
    async fn misses_and_escapes_do_not_resolve() {
        let dir = site();
        let files = StaticFiles::new(dir.path().join("docs"));

        assert!(files.resolve(&get("/missing.txt")).await.is_none());
        assert!(files.resolve(&get("/../hello.txt")).await.is_none());
        assert!(StaticFiles::new(dir.path().join("nope")).resolve(&get("/")).await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_out_of_the_root_do_not_resolve() {
        let dir = site();
        std::os::unix::fs::symlink(dir.path().join("hello.txt"), dir.path().join("docs/leak.txt"))
            .unwrap();
        let files = StaticFiles::new(dir.path().join("docs"));
        assert!(files.resolve(&get("/leak.txt")).await.is_none());
    }

    #[tokio::test]
    async fn only_get_resolves() {
        let dir = site();
        let files = StaticFiles::new(dir.path());
        let post = Request::builder(Method::Post, "/hello.txt").build();
        assert!(files.resolve(&post).await.is_none());
    }

    #[tokio::test]
    async fn resolves_concurrently() {
        let dir = site();
        let files = Arc::new(StaticFiles::new(dir.path()));

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..8 {
            let files = Arc::clone(&files);
            tasks.spawn(async move {
                let path = if i % 2 == 0 { "/hello.txt" } else { "/missing.txt" };
                files.resolve(&get(path)).await.is_some()
            });
        }
        let mut hits = 0;
        while let Some(hit) = tasks.join_next().await {
            hits += usize::from(hit.unwrap());
        }
        assert_eq!(hits, 4);
    }

    #[test]
    fn unknown_extensions_are_octet_streams() {
        assert_eq!(content_type(Path::new("a.bin")), "application/octet-stream");
        assert_eq!(content_type(Path::new("A.PNG")), "image/png");
        assert_eq!(content_type(Path::new("Makefile")), "application/octet-stream");
    }
}
