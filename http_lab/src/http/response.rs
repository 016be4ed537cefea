//! # Respuestas HTTP
//!
//! API para construir respuestas HTTP/1.0, convertirlas a bytes y, del lado
//! del cliente, parsear lo que devuelve el servidor.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use http_lab::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Created)
//!     .with_header("Content-Type", "application/json")
//!     .with_body(r#"{"success": true}"#);
//!
//! let parsed = Response::parse(&response.to_bytes()).unwrap();
//! assert_eq!(parsed.status(), StatusCode::Created);
//! ```

use super::request::{head_complete, parse_headers, ParseError};
use super::StatusCode;
use serde::Serialize;
use std::collections::HashMap;

/// Representa una respuesta HTTP/1.0 completa
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,

    /// Usamos HashMap para evitar duplicados
    headers: HashMap<String, String>,

    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta (se sobrescribe si ya existe)
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de `with_header`
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    /// Establece el cuerpo desde un string y calcula `Content-Length`
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo desde bytes y calcula `Content-Length`
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self.headers
            .insert("Content-Length".to_string(), self.body.len().to_string());
        self
    }

    /// Respuesta JSON 200 OK desde un string ya serializado
    pub fn json(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    /// Respuesta JSON con cualquier valor serializable
    ///
    /// Si la serialización falla se devuelve un 500.
    pub fn json_value<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status)
                .with_header("Content-Type", "application/json")
                .with_body_bytes(body),
            Err(e) => Self::error(
                StatusCode::InternalServerError,
                &format!("Failed to serialize response: {}", e),
            ),
        }
    }

    /// Respuesta de error con cuerpo `{"error": "mensaje"}`
    ///
    /// # Ejemplo
    /// ```
    /// use http_lab::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::BadRequest, "quote \" inside");
    /// let body = String::from_utf8(response.body().to_vec()).unwrap();
    /// assert_eq!(body, r#"{"error":"quote \" inside"}"#);
    /// ```
    pub fn error(status: StatusCode, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(&body)
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = format!("HTTP/1.0 {}\r\n", self.status).into_bytes();

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);
        result
    }

    /// Parsea una respuesta completa recibida por un cliente
    ///
    /// Formato esperado: `HTTP/1.x CODE Reason\r\nHeaders\r\n\r\nBody`.
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let end = head_complete(buffer).ok_or(ParseError::Incomplete)?;
        let head = std::str::from_utf8(&buffer[..end - 4])
            .map_err(|_| ParseError::InvalidStatusLine("non UTF-8 head".to_string()))?;
        let mut lines = head.split("\r\n");

        let status_line = lines.next().ok_or(ParseError::Incomplete)?;
        let mut parts = status_line.splitn(3, ' ');
        let version = parts.next().unwrap_or_default();
        if !version.starts_with("HTTP/1.") {
            return Err(ParseError::InvalidHttpVersion(version.to_string()));
        }
        let status = parts
            .next()
            .and_then(|code| code.parse::<u16>().ok())
            .and_then(StatusCode::from_u16)
            .ok_or_else(|| ParseError::InvalidStatusLine(status_line.to_string()))?;

        let headers: HashMap<String, String> = parse_headers(lines)?.into_iter().collect();
        let body = buffer[end..].to_vec();

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header sin distinguir mayúsculas/minúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
