use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{json, Value};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};
use tracing::{debug, error, info, warn};

use crate::chat::{ChatBridge, LanguageModel};
use crate::dates::{self, Clock};
use crate::error::StoreError;
use crate::store::TaskStore;

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

#[derive(Debug, Deserialize)]
struct TaskPayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatPayload {
    #[serde(default)]
    message: Option<String>,
}

/// Everything a request handler can reach. Built once at startup.
pub struct App {
    pub store: TaskStore,
    pub model: Box<dyn LanguageModel>,
    pub clock: Box<dyn Clock>,
    pub web_root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl ApiResponse {
    fn json(status: u16, value: &Value) -> Self {
        ApiResponse {
            status,
            content_type: "application/json",
            body: value.to_string().into_bytes(),
        }
    }

    fn message(status: u16, message: &str) -> Self {
        Self::json(status, &json!({ "message": message }))
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, &json!({ "error": message }))
    }

    fn text(status: u16, body: &str) -> Self {
        ApiResponse {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.as_bytes().to_vec(),
        }
    }

    fn empty(status: u16) -> Self {
        ApiResponse {
            status,
            content_type: "text/plain; charset=utf-8",
            body: Vec::new(),
        }
    }
}

fn store_error(err: StoreError) -> ApiResponse {
    match err {
        StoreError::Validation(msg) => ApiResponse::error(400, &msg),
        StoreError::NotFound(_) => ApiResponse::error(404, "Task not found"),
        StoreError::Storage(err) => {
            error!(error = %err, "storage failure");
            ApiResponse::error(500, &err.to_string())
        }
    }
}

fn content_type_for(path: &str) -> &'static str {
    if path.ends_with(".css") {
        "text/css"
    } else if path.ends_with(".js") {
        "application/javascript"
    } else if path.ends_with(".svg") {
        "image/svg+xml"
    } else if path.ends_with(".png") {
        "image/png"
    } else {
        "text/html; charset=utf-8"
    }
}

fn serve_static(web_root: &Path, path: &str) -> ApiResponse {
    let file_path = if path == "/" { "/index.html" } else { path };
    let relative = file_path.trim_start_matches('/');
    if relative.split('/').any(|part| part == ".." || part.is_empty()) {
        return ApiResponse::text(404, "Not Found");
    }
    let local_path = web_root.join(relative);
    if !local_path.is_file() {
        return ApiResponse::text(404, "Not Found");
    }
    match fs::read(&local_path) {
        Ok(data) => ApiResponse {
            status: 200,
            content_type: content_type_for(file_path),
            body: data,
        },
        Err(err) => {
            error!(path = %local_path.display(), error = %err, "failed to read static file");
            ApiResponse::text(500, &err.to_string())
        }
    }
}

fn parse_task_payload(body: &str) -> Result<TaskPayload, ApiResponse> {
    serde_json::from_str(body).map_err(|err| ApiResponse::error(400, &format!("Invalid request body: {err}")))
}

fn list_tasks(app: &App) -> ApiResponse {
    match app.store.list() {
        Ok(tasks) => ApiResponse::json(200, &json!(tasks)),
        Err(err) => store_error(err),
    }
}

fn create_task(app: &App, body: &str) -> ApiResponse {
    let payload = match parse_task_payload(body) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let name = payload.name.unwrap_or_default();
    match app.store.create(&name, payload.date.as_deref()) {
        Ok(id) => {
            info!(id, "task added");
            ApiResponse::message(201, "Task added successfully!")
        }
        Err(err) => store_error(err),
    }
}

fn update_task(app: &App, id: i64, body: &str) -> ApiResponse {
    let payload = match parse_task_payload(body) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let name = payload.name.unwrap_or_default();
    match app.store.update(id, &name, payload.date.as_deref()) {
        Ok(()) => ApiResponse::message(200, "Task updated successfully!"),
        Err(err) => store_error(err),
    }
}

fn complete_task(app: &App, id: i64) -> ApiResponse {
    match app.store.complete(id) {
        Ok(()) => ApiResponse::message(200, "Task marked as completed!"),
        Err(err) => store_error(err),
    }
}

fn delete_task(app: &App, id: i64) -> ApiResponse {
    match app.store.delete(id) {
        Ok(()) => ApiResponse::message(200, "Task deleted!"),
        Err(err) => store_error(err),
    }
}

fn chat(app: &App, body: &str) -> ApiResponse {
    // A body that is not a chat payload counts as an empty message.
    let message = serde_json::from_str::<ChatPayload>(body)
        .ok()
        .and_then(|p| p.message)
        .unwrap_or_default();
    let bridge = ChatBridge::new(&app.store, app.model.as_ref(), app.clock.as_ref());
    ApiResponse::json(200, &json!({ "reply": bridge.reply(&message) }))
}

/// Maps one request to one response without touching the network.
pub fn handle(app: &App, method: &Method, url: &str, body: &str) -> ApiResponse {
    let path = url.split(['?', '#']).next().unwrap_or("/");
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        (Method::Options, _) => ApiResponse::empty(204),
        (Method::Get, ["tasks"]) | (Method::Get, ["refresh"]) => list_tasks(app),
        (Method::Post, ["tasks"]) => create_task(app, body),
        (Method::Put, ["tasks", id]) => match id.parse() {
            Ok(id) => update_task(app, id, body),
            Err(_) => ApiResponse::error(404, "not found"),
        },
        (Method::Put, ["tasks", id, "complete"]) => match id.parse() {
            Ok(id) => complete_task(app, id),
            Err(_) => ApiResponse::error(404, "not found"),
        },
        (Method::Delete, ["tasks", id]) => match id.parse() {
            Ok(id) => delete_task(app, id),
            Err(_) => ApiResponse::error(404, "not found"),
        },
        (Method::Get, ["today"]) => {
            ApiResponse::json(200, &json!({ "today": dates::today_iso(app.clock.as_ref()) }))
        }
        (Method::Post, ["chat"]) => chat(app, body),
        (Method::Get, _) => serve_static(&app.web_root, path),
        _ => ApiResponse::error(404, "not found"),
    }
}

fn into_http(resp: ApiResponse) -> Response<io::Cursor<Vec<u8>>> {
    let mut response = Response::from_data(resp.body).with_status_code(StatusCode(resp.status));
    let headers = std::iter::once(("Content-Type", resp.content_type)).chain(CORS_HEADERS);
    for (name, value) in headers {
        if let Ok(header) = Header::from_bytes(name, value) {
            response.add_header(header);
        }
    }
    response
}

fn respond(app: &App, mut request: Request) {
    let method = request.method().clone();
    let url = request.url().to_string();

    let mut body = String::new();
    if let Err(err) = request.as_reader().read_to_string(&mut body) {
        warn!(%url, error = %err, "could not read request body");
    }

    let response = handle(app, &method, &url, &body);
    debug!(%method, %url, status = response.status, "handled request");
    if let Err(err) = request.respond(into_http(response)) {
        warn!(%url, error = %err, "failed to send response");
    }
}

pub fn serve(app: &App, host: &str, port: u16) -> io::Result<()> {
    let server = Server::http((host, port)).map_err(io::Error::other)?;
    info!("todo server running on http://{}:{}", host, port);

    for request in server.incoming_requests() {
        respond(app, request);
    }
    Ok(())
}
