//! Minimal halyard example: JSON endpoints, static files, and middleware.
//!
//! Run from the repository root with:
//!   RUST_LOG=info HALYARD_ENV=development cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/users/42
//!   curl -I http://localhost:3000/users/42          # HEAD: headers only
//!   curl -i -X OPTIONS http://localhost:3000/nowhere # 200, allow: OPTIONS
//!   curl -i -X BREW http://localhost:3000/pot        # 501
//!   curl -i http://localhost:3000/users/abc         # 500, detail hidden in production
//!   curl -i http://localhost:3000/                  # demos/public/index.html

use halyard::middleware::{self, MiddlewareChain, Next, Trace};
use halyard::{
    Config, Dispatcher, HandlerError, Request, Response, Router, Server, StaticFiles, Status,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let router = Router::new()
        .get("/users/{id}",    get_user)
        .post("/users",        create_user)
        .delete("/users/{id}", delete_user);

    let chain = MiddlewareChain::new()
        .with(Trace)
        .with(middleware::from_fn(request_id));

    let config = Config::from_env().expect("invalid configuration");

    let app = Dispatcher::new(router, config)
        .with_assets(StaticFiles::new("demos/public"))
        .with_middleware(chain);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// Echo the caller's x-request-id back, if there is one.
async fn request_id(req: Request, next: Next) -> Result<Response, HandlerError> {
    let id = req.header("x-request-id").map(str::to_owned);
    let mut res = next.run(req).await?;
    if let Some(id) = id {
        res.set_header("x-request-id", &id);
    }
    Ok(res)
}

// GET /users/{id}: a non-numeric id is an internal error on purpose, to show
// the production redaction.
async fn get_user(req: Request) -> Result<Response, HandlerError> {
    let id: u64 = req.param("id").unwrap_or_default().parse()?;
    if id == 0 {
        return Err(HandlerError::not_found());
    }
    Ok(Response::json(format!(r#"{{"id":{id},"name":"alice"}}"#).into_bytes()))
}

// POST /users
async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(Status::BadRequest);
    }
    Response::builder()
        .status(Status::Created)
        .header("location", "/users/99")
        .json(br#"{"id":99,"name":"new_user"}"#.to_vec())
}

// DELETE /users/{id} → 204 No Content
async fn delete_user(_req: Request) -> Status {
    Status::NoContent
}
