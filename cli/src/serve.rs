#![deny(missing_docs)]

//! # Serve Command
//!
//! Compiles a document and serves the UI schema next to a mock CRUD API
//! seeded from it, so a renderer can be pointed at something live.
//!
//! Routes:
//! - `GET /ui-schema`
//! - `GET|POST /mock/{entity}`
//! - `GET|PATCH|DELETE /mock/{entity}/{id}`

use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Mutex;

use actix_web::http::StatusCode;
use actix_web::{delete, get, patch, post, web, App, HttpResponse, HttpServer, Responder};
use serde_json::{json, Value};
use uigen_core::mock::MockStore;
use uigen_core::{compile_ui_schema, AppError, AppResult, CrudAction, MockBackend, Record, UiSchema};

use crate::error::CliResult;
use crate::source::Source;

/// Arguments for the serve command.
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Path to the OpenAPI document.
    #[clap(long, env = "UIGEN_INPUT")]
    pub input: PathBuf,

    /// Address to listen on.
    #[clap(long, env = "UIGEN_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Number of synthesized rows per entity.
    #[clap(long, default_value_t = 5)]
    pub seed: usize,
}

/// Shared server state.
pub struct ServeState {
    ui: UiSchema,
    backend: Mutex<MockBackend>,
}

impl ServeState {
    /// Seeds a backend for every entity of `ui`.
    pub fn new(ui: UiSchema, rows: usize) -> Self {
        let backend = MockBackend::seeded(&ui, rows);
        Self {
            ui,
            backend: Mutex::new(backend),
        }
    }
}

/// Executes the server until it is stopped.
pub fn execute(args: &ServeArgs) -> CliResult<()> {
    let document = Source::File(args.input.clone()).load()?;
    let ui = compile_ui_schema(&document)?;
    let entities = ui.entities.len();
    let state = web::Data::new(ServeState::new(ui, args.seed));

    let listener = TcpListener::bind(&args.bind)?;
    tracing::info!(bind = %args.bind, entities, "serving UI schema");
    println!("Serving {} entities on http://{}", entities, args.bind);

    actix_rt::System::new().block_on(async move { build_server(listener, state)?.await })?;
    Ok(())
}

fn build_server(
    listener: TcpListener,
    state: web::Data<ServeState>,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(
        HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
            .listen(listener)?
            .run(),
    )
}

/// Registers every route on an app.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(ui_schema)
        .service(list_rows)
        .service(create_row)
        .service(read_row)
        .service(update_row)
        .service(delete_row);
}

#[get("/ui-schema")]
async fn ui_schema(state: web::Data<ServeState>) -> impl Responder {
    HttpResponse::Ok().json(&state.ui)
}

#[get("/mock/{entity}")]
async fn list_rows(state: web::Data<ServeState>, path: web::Path<String>) -> HttpResponse {
    dispatch(&state, &path, CrudAction::List, StatusCode::OK, |store| {
        Ok(Value::Array(
            store.list().iter().cloned().map(Value::Object).collect(),
        ))
    })
}

#[post("/mock/{entity}")]
async fn create_row(
    state: web::Data<ServeState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    let record = match into_record(body.into_inner()) {
        Ok(record) => record,
        Err(response) => return response,
    };
    dispatch(&state, &path, CrudAction::Create, StatusCode::CREATED, |store| {
        store.create(record).map(Value::Object)
    })
}

#[get("/mock/{entity}/{id}")]
async fn read_row(state: web::Data<ServeState>, path: web::Path<(String, String)>) -> HttpResponse {
    let (entity, id) = path.into_inner();
    dispatch(&state, &entity, CrudAction::Read, StatusCode::OK, |store| {
        store.read(&id).map(|row| Value::Object(row.clone()))
    })
}

#[patch("/mock/{entity}/{id}")]
async fn update_row(
    state: web::Data<ServeState>,
    path: web::Path<(String, String)>,
    body: web::Json<Value>,
) -> HttpResponse {
    let (entity, id) = path.into_inner();
    let record = match into_record(body.into_inner()) {
        Ok(record) => record,
        Err(response) => return response,
    };
    dispatch(&state, &entity, CrudAction::Update, StatusCode::OK, |store| {
        store.update(&id, record).map(Value::Object)
    })
}

#[delete("/mock/{entity}/{id}")]
async fn delete_row(state: web::Data<ServeState>, path: web::Path<(String, String)>) -> HttpResponse {
    let (entity, id) = path.into_inner();
    dispatch(&state, &entity, CrudAction::Delete, StatusCode::OK, |store| {
        store.delete(&id).map(Value::Object)
    })
}

/// Runs `op` against an entity's store if the entity exposes `action`.
fn dispatch<F>(
    state: &ServeState,
    entity: &str,
    action: CrudAction,
    success: StatusCode,
    op: F,
) -> HttpResponse
where
    F: FnOnce(&mut MockStore) -> AppResult<Value>,
{
    let Ok(mut backend) = state.backend.lock() else {
        tracing::error!("mock backend lock poisoned");
        return HttpResponse::InternalServerError().finish();
    };
    let store = match backend.store_mut(entity) {
        Ok(store) => store,
        Err(e) => return error_response(&e),
    };
    if !store.entity().supports(action) {
        return HttpResponse::MethodNotAllowed()
            .json(json!({ "error": format!("{} does not support {}", entity, action) }));
    }

    match op(store) {
        Ok(body) => HttpResponse::build(success).json(body),
        Err(e) => error_response(&e),
    }
}

fn into_record(value: Value) -> Result<Record, HttpResponse> {
    match value {
        Value::Object(record) => Ok(record),
        _ => Err(HttpResponse::BadRequest()
            .json(json!({ "error": "request body must be a JSON object" }))),
    }
}

fn error_response(err: &AppError) -> HttpResponse {
    let status = match err {
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::debug!(%status, error = %err, "mock request rejected");
    HttpResponse::build(status).json(json!({ "error": err.to_string() }))
}
