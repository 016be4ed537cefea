//! # Handlers de la API de usuarios
//! src/users/handlers.rs
//!
//! | Método | Ruta               | Auth            |
//! |--------|--------------------|-----------------|
//! | GET    | `/users/{id}`      | key o token     |
//! | POST   | `/users`           | key             |
//! | POST   | `/login`           | -               |
//! | POST   | `/upload`          | key             |
//! | POST   | `/users/encrypted` | key             |
//! | GET    | `/metrics`         | -               |
//! | GET    | `/health`          | -               |
//!
//! Todas las respuestas de usuarios usan el envelope `ApiResponse`.

use super::auth::{unix_now, AuthConfig};
use super::model::{ApiResponse, EncryptedPayload, NewUser, UploadReceipt};
use super::store::UserStore;
use crate::client::crypto::decrypt_json;
use crate::config::ServerConfig;
use crate::http::{Method, Request, Response, StatusCode};
use crate::metrics::MetricsCollector;
use crate::router::{Params, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Estado compartido por todos los handlers
pub struct UserApi {
    pub store: UserStore,
    pub auth: AuthConfig,
    encryption_key: Vec<u8>,
    pub metrics: MetricsCollector,
}

fn ok<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    Response::json_value(status, &ApiResponse::ok(message, data))
}

fn fail(status: StatusCode, message: &str) -> Response {
    Response::json_value(status, &ApiResponse::<()>::fail(message))
}

fn unauthorized() -> Response {
    fail(StatusCode::Unauthorized, "Invalid API key")
}

type Endpoint = fn(&UserApi, &Request, &Params) -> Response;

/// Adapta un método de `UserApi` a la firma de handler del router
fn handle(
    api: &Arc<UserApi>,
    endpoint: Endpoint,
) -> impl Fn(&Request, &Params) -> Response + Send + Sync + 'static {
    let api = Arc::clone(api);
    move |req: &Request, params: &Params| endpoint(&api, req, params)
}

impl UserApi {
    pub fn new(config: &ServerConfig, metrics: MetricsCollector) -> Self {
        Self {
            store: if config.no_seed {
                UserStore::new()
            } else {
                UserStore::seeded()
            },
            auth: AuthConfig {
                api_key: config.api_key.clone(),
                token_secret: config.token_secret.clone(),
                skew_secs: config.token_skew_secs,
            },
            encryption_key: config.encryption_key.as_bytes().to_vec(),
            metrics,
        }
    }

    /// Construye el router con todas las rutas de la API
    pub fn into_router(self) -> Router {
        let api = Arc::new(self);
        let mut router = Router::new();

        router.register(Method::GET, "/users/{id}", handle(&api, UserApi::get_user));
        router.register(Method::POST, "/users", handle(&api, UserApi::create_user));
        router.register(Method::POST, "/users/", handle(&api, UserApi::create_user));
        router.register(Method::POST, "/login", handle(&api, UserApi::login));
        router.register(Method::POST, "/upload", handle(&api, UserApi::upload));
        router.register(
            Method::POST,
            "/users/encrypted",
            handle(&api, UserApi::create_encrypted_user),
        );
        router.register(Method::GET, "/metrics", handle(&api, UserApi::metrics));
        router.register(Method::GET, "/health", handle(&api, UserApi::health));

        router
    }

    fn get_user(&self, req: &Request, params: &Params) -> Response {
        let Some(id) = params.get("id").and_then(|raw| raw.parse::<u64>().ok()) else {
            return fail(StatusCode::BadRequest, "Invalid user id");
        };
        if !self.auth.authorizes_user(req, id) {
            return unauthorized();
        }
        match self.store.get(id) {
            Some(user) => ok(StatusCode::Ok, "User fetched", user),
            None => fail(StatusCode::NotFound, "User not found"),
        }
    }

    fn create_user(&self, req: &Request, _params: &Params) -> Response {
        if !self.auth.has_api_key(req) {
            return unauthorized();
        }
        let new_user: NewUser = match serde_json::from_slice(req.body()) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "rejected user payload");
                return fail(StatusCode::BadRequest, "Invalid request body");
            }
        };
        self.insert(new_user, "User created")
    }

    fn insert(&self, new_user: NewUser, message: &str) -> Response {
        if new_user.name.trim().is_empty() {
            return fail(StatusCode::BadRequest, "Name must not be empty");
        }
        let user = self.store.insert(new_user);
        info!(id = user.id, "user created");
        ok(StatusCode::Created, message, user)
    }

    fn login(&self, req: &Request, _params: &Params) -> Response {
        let form = req.form_params();
        let username = form.get("username").map(String::as_str).unwrap_or("");
        let password = form.get("password").map(String::as_str).unwrap_or("");

        if username.is_empty() || password.is_empty() {
            return fail(StatusCode::BadRequest, "Username and password are required");
        }

        match self.store.authenticate(username, password) {
            Some(user) => {
                info!(id = user.id, "login succeeded");
                let token = format!("token_{}_{}", username, unix_now());
                ok(StatusCode::Ok, "Login succeeded", token)
            }
            None => fail(StatusCode::Unauthorized, "Invalid username or password"),
        }
    }

    fn upload(&self, req: &Request, _params: &Params) -> Response {
        if !self.auth.has_api_key(req) {
            return unauthorized();
        }
        let Some(filename) = req.header("X-Filename").filter(|name| !name.is_empty()) else {
            return fail(StatusCode::BadRequest, "Missing X-Filename header");
        };

        info!(filename, size = req.body().len(), "file uploaded");
        let receipt = UploadReceipt {
            filename: filename.to_string(),
            size: req.body().len(),
        };
        ok(StatusCode::Ok, "File uploaded", receipt)
    }

    fn create_encrypted_user(&self, req: &Request, _params: &Params) -> Response {
        if !self.auth.has_api_key(req) {
            return unauthorized();
        }
        let payload: EncryptedPayload = match serde_json::from_slice(req.body()) {
            Ok(payload) => payload,
            Err(_) => return fail(StatusCode::BadRequest, "Invalid request body"),
        };
        match decrypt_json::<NewUser>(&payload.encrypted_data, &self.encryption_key) {
            Ok(new_user) => self.insert(new_user, "Encrypted user created"),
            Err(e) => {
                warn!(error = %e, "rejected encrypted payload");
                fail(StatusCode::BadRequest, &format!("Invalid encrypted data: {}", e))
            }
        }
    }

    fn metrics(&self, _req: &Request, _params: &Params) -> Response {
        Response::json(&self.metrics.to_json())
    }

    fn health(&self, _req: &Request, _params: &Params) -> Response {
        Response::json_value(
            StatusCode::Ok,
            &serde_json::json!({ "status": "ok", "users": self.store.len() }),
        )
    }
}
