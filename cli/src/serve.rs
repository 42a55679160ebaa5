#![deny(missing_docs)]

//! # Serve Command
//!
//! Hosts the two read-only endpoints over actix-web:
//!
//! - `GET {mount}` returns the llms.txt markdown.
//! - `GET {mount}/paths/{method}/{path...}` returns one resolved operation as JSON.
//!
//! The document is loaded from the source on every request.

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{web, App, HttpResponse, HttpServer};
use llms_txt_core::{
    generate_llms_txt, get_operation_spec, ApiDocument, AppError, DocumentSource,
    DEFAULT_MOUNT_PATH,
};
use serde_json::json;

use crate::error::CliResult;
use crate::source::open_source;

/// Arguments for the serve command.
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Path or `http(s)://` URL of the OpenAPI document (JSON or YAML).
    #[clap(long, env = "LLMS_TXT_SPEC")]
    pub spec: String,

    /// URL path the summary is served under.
    #[clap(long, env = "LLMS_TXT_MOUNT_PATH", default_value = DEFAULT_MOUNT_PATH)]
    pub mount_path: String,

    /// Socket address to listen on.
    #[clap(long, env = "LLMS_TXT_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,
}

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct ServerState {
    source: Arc<dyn DocumentSource>,
    mount_path: String,
}

impl ServerState {
    /// Creates the state; `mount_path` is normalised to a leading `/` and no trailing `/`.
    pub fn new(source: Arc<dyn DocumentSource>, mount_path: &str) -> Self {
        let trimmed = mount_path.trim().trim_matches('/');
        Self {
            source,
            mount_path: format!("/{}", trimmed),
        }
    }

    /// The normalised mount path.
    pub fn mount_path(&self) -> &str {
        &self.mount_path
    }

    fn detail_prefix(&self) -> &str {
        self.mount_path.trim_end_matches('/')
    }
}

/// Registers the routes for `state` on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<ServerState>) {
    let detail = format!("{}/paths/{{method}}/{{tail:.*}}", state.detail_prefix());
    let index = state.mount_path.clone();
    cfg.app_data(state)
        .route(&index, web::get().to(llms_txt))
        .route(&detail, web::get().to(operation_detail));
}

/// Builds the HTTP server on an already bound listener.
pub fn build_server(listener: TcpListener, state: ServerState) -> std::io::Result<Server> {
    let state = web::Data::new(state);
    Ok(HttpServer::new(move || {
        let state = state.clone();
        App::new().configure(move |cfg| configure(cfg, state))
    })
    .listen(listener)?
    .run())
}

/// Executes the serve command; blocks until the server stops.
pub fn execute(args: &ServeArgs) -> CliResult<()> {
    let source = open_source(&args.spec)?;
    let state = ServerState::new(source, &args.mount_path);
    let listener = TcpListener::bind(&args.bind)?;
    tracing::info!(
        "Serving {} at http://{}{}",
        state.source.describe(),
        listener.local_addr()?,
        state.mount_path()
    );

    actix_rt::System::new().block_on(async move {
        let server = build_server(listener, state)?;
        server.await
    })?;
    Ok(())
}

async fn load(state: &ServerState) -> Result<ApiDocument, HttpResponse> {
    let source = Arc::clone(&state.source);
    let loaded = web::block(move || source.load()).await;
    match loaded {
        Ok(Ok(document)) => Ok(document),
        Ok(Err(e)) => {
            tracing::error!("Failed to load {}: {}", state.source.describe(), e);
            Err(HttpResponse::InternalServerError().json(json!({"detail": e.to_string()})))
        }
        Err(e) => {
            tracing::error!("Document loader panicked: {}", e);
            Err(HttpResponse::InternalServerError().json(json!({"detail": e.to_string()})))
        }
    }
}

async fn llms_txt(state: web::Data<ServerState>) -> HttpResponse {
    let document = match load(&state).await {
        Ok(document) => document,
        Err(response) => return response,
    };
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(generate_llms_txt(&document, &state.mount_path))
}

async fn operation_detail(
    state: web::Data<ServerState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (method, tail) = path.into_inner();
    let api_path = format!("/{}", tail);

    let document = match load(&state).await {
        Ok(document) => document,
        Err(response) => return response,
    };
    match get_operation_spec(&document, &method, &api_path) {
        Ok(spec) => HttpResponse::Ok().json(spec),
        Err(e @ AppError::OperationNotFound { .. }) => {
            tracing::debug!("{}", e);
            HttpResponse::NotFound().json(json!({"detail": e.to_string()}))
        }
        Err(e) => {
            tracing::error!("Failed to extract {} {}: {}", method, api_path, e);
            HttpResponse::InternalServerError().json(json!({"detail": e.to_string()}))
        }
    }
}
