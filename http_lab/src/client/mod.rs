//! # Cliente de la API de usuarios
//! src/client/mod.rs
//!
//! Cliente bloqueante sobre el transporte HTTP/1.0 propio. Cada operación
//! devuelve `Result<_, ClientError>` y desempaqueta el envelope
//! `ApiResponse` del servidor.
//!
//! ```no_run
//! use http_lab::client::ApiClient;
//!
//! let client = ApiClient::new("http://127.0.0.1:8080", "your-api-key-here").unwrap();
//! let user = client.get_user(1).unwrap();
//! println!("{} <{}>", user.name, user.email);
//! ```

pub mod crypto;
pub mod transport;

use crate::error::ClientError;
use crate::http::{url_encode, Method, Request, Response, StatusCode};
use crate::users::auth::unix_now;
use crate::users::model::{ApiResponse, EncryptedPayload, NewUser, UploadReceipt, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Espera entre reintentos: `base_delay * 2^intento`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Resultado de `get_users_batch`, en el orden de los ids pedidos
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub users: Vec<User>,
    pub failures: Vec<(u64, ClientError)>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    api_key: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn request(&self, method: Method, path: &str) -> Result<(Url, Request), ClientError> {
        let url = self.base_url.join(path)?;
        let request = Request::new(method, &transport::request_target(&url))
            .with_header("Authorization", &format!("Bearer {}", self.api_key));
        Ok((url, request))
    }

    fn send(&self, url: &Url, request: Request) -> Result<Response, ClientError> {
        debug!(method = %request.method(), %url, "sending request");
        transport::send(url, request, self.timeout)
    }

    fn send_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Response, ClientError> {
        let (url, request) = self.request(Method::POST, path)?;
        let request = request
            .with_header("Content-Type", "application/json")
            .with_body(serde_json::to_vec(body)?);
        self.send(&url, request)
    }

    /// Obtiene un usuario por id (espera 200)
    pub fn get_user(&self, id: u64) -> Result<User, ClientError> {
        let (url, request) = self.request(Method::GET, &format!("/users/{}", id))?;
        unwrap_envelope(self.send(&url, request)?, StatusCode::Ok)
    }

    /// Crea un usuario con un body JSON (espera 201)
    pub fn create_user(&self, user: &NewUser) -> Result<User, ClientError> {
        unwrap_envelope(self.send_json("/users", user)?, StatusCode::Created)
    }

    /// Login con formulario url-encoded; devuelve el token
    pub fn login_with_form(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let form = format!(
            "username={}&password={}",
            url_encode(username),
            url_encode(password)
        );
        let (url, request) = self.request(Method::POST, "/login")?;
        let request = request
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(form.into_bytes());
        unwrap_envelope(self.send(&url, request)?, StatusCode::Ok)
    }

    /// Sube un archivo como `application/octet-stream`
    pub fn upload_file(&self, filename: &str, contents: &[u8]) -> Result<UploadReceipt, ClientError> {
        let (url, request) = self.request(Method::POST, "/upload")?;
        let request = request
            .with_header("Content-Type", "application/octet-stream")
            .with_header("X-Filename", filename)
            .with_body(contents.to_vec());
        unwrap_envelope(self.send(&url, request)?, StatusCode::Ok)
    }

    /// Cifra el usuario con AES-256-GCM y lo manda a `/users/encrypted`
    pub fn create_user_with_encryption(&self, user: &NewUser, key: &[u8]) -> Result<User, ClientError> {
        let payload = EncryptedPayload {
            encrypted_data: crypto::encrypt_json(user, key)?,
        };
        let body = serde_json::to_vec(&payload)?;
        let (url, request) = self.request(Method::POST, "/users/encrypted")?;
        let request = request
            .with_header("Content-Type", "application/json")
            .with_header("X-Encryption", "AES-256-GCM")
            .with_body(body);
        unwrap_envelope(self.send(&url, request)?, StatusCode::Created)
    }

    /// `GET /users/{id}` autenticado con un token firmado en vez de la API key
    pub fn get_user_with_custom_token(&self, id: u64, secret: &str) -> Result<User, ClientError> {
        let token = crypto::user_token(id, unix_now(), secret);
        let (url, request) = self.request(Method::GET, &format!("/users/{}", id))?;
        let request = request.with_header("Authorization", &format!("Bearer {}", token));
        unwrap_envelope(self.send(&url, request)?, StatusCode::Ok)
    }

    /// Hasta `max_retries + 1` intentos con backoff exponencial
    pub fn get_user_with_retry(&self, id: u64, max_retries: u32) -> Result<User, ClientError> {
        let mut attempt = 0;
        loop {
            match self.get_user(id) {
                Ok(user) => return Ok(user),
                Err(e) if attempt >= max_retries => {
                    return Err(ClientError::RetriesExhausted {
                        attempts: attempt + 1,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(id, attempt = attempt + 1, error = %e, ?delay, "request failed, retrying");
                    thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }

    /// Un thread por id; el resultado respeta el orden de entrada
    pub fn get_users_batch(&self, ids: &[u64]) -> BatchOutcome {
        let results: Vec<(u64, Result<User, ClientError>)> = thread::scope(|scope| {
            let handles: Vec<_> = ids
                .iter()
                .map(|&id| (id, scope.spawn(move || self.get_user(id))))
                .collect();

            handles
                .into_iter()
                .map(|(id, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(ClientError::Api(format!("worker for user {} panicked", id)))
                    });
                    (id, result)
                })
                .collect()
        });

        let mut outcome = BatchOutcome::default();
        for (id, result) in results {
            match result {
                Ok(user) => outcome.users.push(user),
                Err(e) => outcome.failures.push((id, e)),
            }
        }
        outcome
    }
}

/// Verifica el status y desempaqueta `data` del envelope
fn unwrap_envelope<T: DeserializeOwned>(response: Response, expected: StatusCode) -> Result<T, ClientError> {
    let envelope: Option<ApiResponse<T>> = serde_json::from_slice(response.body()).ok();

    if response.status() != expected {
        let body = match envelope {
            Some(envelope) => envelope.message,
            None => String::from_utf8_lossy(response.body()).into_owned(),
        };
        return Err(ClientError::UnexpectedStatus {
            status: response.status(),
            body,
        });
    }

    let envelope: ApiResponse<T> = match envelope {
        Some(envelope) => envelope,
        None => serde_json::from_slice(response.body())?,
    };
    if !envelope.success {
        return Err(ClientError::Api(envelope.message));
    }
    envelope
        .data
        .ok_or_else(|| ClientError::Api(format!("{}: response has no data", envelope.message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delays_double() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(800));
        // No hace overflow con intentos absurdos
        assert!(policy.delay_for(64) >= Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(ApiClient::new("not a url", "k"), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_request_joins_base_url() {
        let client = ApiClient::new("http://127.0.0.1:8080", "k").unwrap();
        let (url, request) = client.request(Method::GET, "/users/3").unwrap();

        assert_eq!(url.as_str(), "http://127.0.0.1:8080/users/3");
        assert_eq!(request.path(), "/users/3");
        assert_eq!(request.header("authorization"), Some("Bearer k"));
    }

    #[test]
    fn test_unwrap_envelope() {
        let ok = Response::json_value(StatusCode::Ok, &ApiResponse::ok("fine", 5u32));
        assert_eq!(unwrap_envelope::<u32>(ok, StatusCode::Ok).unwrap(), 5);

        let missing = Response::json_value(StatusCode::NotFound, &ApiResponse::<()>::fail("User not found"));
        match unwrap_envelope::<u32>(missing, StatusCode::Ok) {
            Err(ClientError::UnexpectedStatus { status, body }) => {
                assert_eq!(status, StatusCode::NotFound);
                assert_eq!(body, "User not found");
            }
            other => panic!("unexpected: {:?}", other),
        }

        let failed = Response::json_value(StatusCode::Ok, &ApiResponse::<u32>::fail("nope"));
        assert!(matches!(
            unwrap_envelope::<u32>(failed, StatusCode::Ok),
            Err(ClientError::Api(_))
        ));

        let garbage = Response::json("not json");
        assert!(matches!(
            unwrap_envelope::<u32>(garbage, StatusCode::Ok),
            Err(ClientError::Json(_))
        ));
    }
}
