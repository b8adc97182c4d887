mod state;

pub use state::{AppState, SessionStore};

use crate::domain::error::AppError;
use actix_cors::Cors;
use actix_web::{delete, dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use validator::Validate;

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

/// `question` stays loose on the wire: null, numbers or a missing field are
/// handed to the session as a blank question and get its warning.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<Value>,
}

#[derive(Debug, Validate)]
pub struct Question {
    #[validate(length(max = 4096))]
    pub text: String,
}

impl AskRequest {
    pub fn into_question(self) -> Question {
        let text = match self.question {
            Some(Value::String(text)) => text,
            _ => String::new(),
        };
        Question { text }
    }
}

#[derive(Serialize)]
pub struct SessionCreated {
    pub id: Uuid,
}

#[get("/health")]
async fn health(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "variant": data.config.variant,
        "records": data.service.dataset().len(),
        "sessions": data.sessions.len(),
    }))
}

#[get("/overview")]
async fn overview(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(&data.overview)
}

#[get("/routing")]
async fn routing(data: web::Data<AppState>) -> impl Responder {
    let router = data.service.router();
    HttpResponse::Ok().json(json!({
        "variant": data.config.variant,
        "rules": router.rules(),
        "default_template": router.default_template(),
        "master_template": router.master_template(),
    }))
}

#[get("/visualizations")]
async fn visualizations(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(&data.dashboard)
}

#[post("/sessions")]
async fn create_session(data: web::Data<AppState>) -> impl Responder {
    let id = data.sessions.create();
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Session {} opened", id),
    );
    HttpResponse::Created().json(SessionCreated { id })
}

#[get("/sessions/{id}/messages")]
async fn get_messages(data: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session = match data.sessions.get(&path) {
        Ok(session) => session,
        Err(e) => return error_response(&e),
    };
    let session = session.lock().await;
    HttpResponse::Ok().json(session.history())
}

#[post("/sessions/{id}/messages")]
async fn post_message(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<AskRequest>,
) -> impl Responder {
    let question = req.into_inner().into_question();
    if let Err(e) = question.validate() {
        add_log(
            &data.logs,
            "WARN",
            "HttpApi",
            &format!("Rejected question for session {}: {}", path, e),
        );
        return error_response(&AppError::ValidationError(e.to_string()));
    }

    let session = match data.sessions.get(&path) {
        Ok(session) => session,
        Err(e) => return error_response(&e),
    };

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!(
            "Question received (session={} chars={})",
            path,
            question.text.chars().count()
        ),
    );

    let mut session = session.lock().await;
    let outcome = session.handle_turn(&data.service, &question.text).await;
    HttpResponse::Ok().json(outcome)
}

#[delete("/sessions/{id}")]
async fn delete_session(data: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match data.sessions.remove(&path) {
        Ok(()) => {
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!("Session {} closed", path),
            );
            HttpResponse::NoContent().finish()
        }
        Err(e) => error_response(&e),
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<AppState>) -> impl Responder {
    let logs = data
        .logs
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    HttpResponse::Ok().json(&*logs)
}

fn error_response(err: &AppError) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::ValidationError(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Every route, mounted under `/api`.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .service(health)
        .service(overview)
        .service(routing)
        .service(visualizations)
        .service(create_session)
        .service(get_messages)
        .service(post_message)
        .service(delete_session)
        .service(get_logs)
}

pub fn start_server(state: Arc<AppState>) -> std::io::Result<Server> {
    let bind = (state.config.host.clone(), state.config.port);
    let state = web::Data::from(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .service(api_scope())
    })
    .bind(bind)?
    .run();

    Ok(server)
}
