//! # Autenticación
//! src/users/auth.rs
//!
//! Dos formas de autorizar un request:
//!
//! 1. `Authorization: Bearer <api_key>` (se compara como prefijo)
//! 2. Sólo para `GET /users/{id}`: `Authorization: Bearer <token>` donde
//!    `token = sha256_hex("user_{id}_{unix}_{secret}")` y `unix` está a lo
//!    sumo `skew` segundos del reloj del servidor.

use crate::client::crypto::user_token;
use crate::http::Request;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub api_key: String,
    pub token_secret: String,
    pub skew_secs: u64,
}

/// Segundos desde epoch según el reloj local
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Extrae el valor después de `Bearer `
pub fn bearer(request: &Request) -> Option<&str> {
    request
        .header("Authorization")?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

impl AuthConfig {
    pub fn has_api_key(&self, request: &Request) -> bool {
        request
            .header("Authorization")
            .is_some_and(|value| value.starts_with(&format!("Bearer {}", self.api_key)))
    }

    /// Verifica un token firmado para el usuario `id` en el instante `now`
    pub fn valid_user_token(&self, token: &str, id: u64, now: u64) -> bool {
        let from = now.saturating_sub(self.skew_secs);
        let to = now.saturating_add(self.skew_secs);
        (from..=to).any(|unix| user_token(id, unix, &self.token_secret) == token)
    }

    /// API key o token firmado del mismo usuario
    pub fn authorizes_user(&self, request: &Request, id: u64) -> bool {
        if self.has_api_key(request) {
            return true;
        }
        bearer(request).is_some_and(|token| self.valid_user_token(token, id, unix_now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;

    fn auth() -> AuthConfig {
        AuthConfig {
            api_key: "your-api-key-here".to_string(),
            token_secret: "your-secret-key".to_string(),
            skew_secs: 30,
        }
    }

    fn with_auth(value: &str) -> Request {
        Request::new(Method::GET, "/users/1").with_header("Authorization", value)
    }

    #[test]
    fn test_api_key() {
        assert!(auth().has_api_key(&with_auth("Bearer your-api-key-here")));
        assert!(!auth().has_api_key(&with_auth("Bearer nope")));
        assert!(!auth().has_api_key(&Request::new(Method::GET, "/users/1")));
    }

    #[test]
    fn test_bearer() {
        assert_eq!(bearer(&with_auth("Bearer abc")), Some("abc"));
        assert_eq!(bearer(&with_auth("Basic abc")), None);
    }

    #[test]
    fn test_token_within_skew() {
        let auth = auth();
        let token = user_token(1, 1_000, &auth.token_secret);

        assert!(auth.valid_user_token(&token, 1, 1_000));
        assert!(auth.valid_user_token(&token, 1, 1_030));
        assert!(auth.valid_user_token(&token, 1, 970));
        assert!(!auth.valid_user_token(&token, 1, 1_031));
        // Token de otro usuario
        assert!(!auth.valid_user_token(&token, 2, 1_000));
    }

    #[test]
    fn test_authorizes_user_with_fresh_token() {
        let auth = auth();
        let token = user_token(5, unix_now(), &auth.token_secret);
        let request = with_auth(&format!("Bearer {}", token));

        assert!(auth.authorizes_user(&request, 5));
        assert!(!auth.authorizes_user(&request, 6));
    }
}
