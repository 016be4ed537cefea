//! # Requests HTTP/1.0
//! src/http/request.rs
//!
//! Parser y builder de requests HTTP/1.0. El servidor usa `Request::parse`
//! sobre los bytes recibidos; el cliente construye requests con
//! `Request::new(..).with_header(..).with_body(..)` y las serializa con
//! `to_bytes`.
//!
//! ## Formato de un Request HTTP/1.0
//!
//! ```text
//! POST /login HTTP/1.0\r\n
//! Content-Type: application/x-www-form-urlencoded\r\n
//! Content-Length: 47\r\n
//! \r\n
//! username=zhangsan%40example.com&password=secret
//! ```

use std::collections::HashMap;
use thiserror::Error;

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
}

impl Method {
    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        }
    }
}

impl std::str::FromStr for Method {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errores que pueden ocurrir durante el parsing (requests y responses)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Incomplete HTTP message")]
    Incomplete,

    #[error("Invalid request line format")]
    InvalidRequestLine,

    #[error("Invalid status line: {0}")]
    InvalidStatusLine(String),

    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("Invalid HTTP version: {0}")]
    InvalidHttpVersion(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Empty request")]
    EmptyRequest,
}

/// Representa un request HTTP/1.0
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,

    /// Path sin query string (ej: "/users/1")
    path: String,

    /// Query parameters ya decodificados
    query_params: HashMap<String, String>,

    /// Headers en el orden en que llegaron
    headers: Vec<(String, String)>,

    version: String,

    body: Vec<u8>,
}

impl Request {
    /// Crea un request vacío para enviarlo desde un cliente
    ///
    /// `target` puede incluir query string.
    ///
    /// # Ejemplo
    /// ```
    /// use http_lab::http::{Method, Request};
    ///
    /// let request = Request::new(Method::GET, "/users/1?verbose=1")
    ///     .with_header("Authorization", "Bearer key");
    /// assert_eq!(request.path(), "/users/1");
    /// assert_eq!(request.query_param("verbose"), Some("1"));
    /// ```
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query_params) = parse_path_and_query(target);
        Self {
            method,
            path,
            query_params,
            headers: Vec::new(),
            version: "HTTP/1.0".to_string(),
            body: Vec::new(),
        }
    }

    /// Agrega un header (reemplaza uno existente con el mismo nombre)
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    /// Establece el body y su `Content-Length`
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        let length = body.len().to_string();
        self.body = body;
        self.set_header("Content-Length", &length);
        self
    }

    fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Parsea un request HTTP/1.0 desde bytes
    ///
    /// El body son los bytes posteriores a la línea vacía, truncados a
    /// `Content-Length` cuando el header está presente.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use http_lab::http::Request;
    ///
    /// let raw = b"GET /users/7?fields=name HTTP/1.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/users/7");
    /// assert_eq!(request.query_param("fields"), Some("name"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        if buffer.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(ParseError::EmptyRequest);
        }

        // Separar head y body en bytes para no romper bodies binarios
        let (head_bytes, body_bytes) = match head_complete(buffer) {
            Some(end) => (&buffer[..end - 4], &buffer[end..]),
            None => (buffer, &[][..]),
        };

        let head = std::str::from_utf8(head_bytes).map_err(|_| ParseError::InvalidRequestLine)?;
        let mut lines = head.split("\r\n");

        // 1. Request line
        let request_line = lines.next().ok_or(ParseError::Incomplete)?;
        let (method, path, query_params, version) = parse_request_line(request_line)?;

        // 2. Headers
        let headers = parse_headers(lines)?;

        // 3. Body
        let declared = content_length_of(&headers);
        let body = match declared {
            Some(length) if length <= body_bytes.len() => body_bytes[..length].to_vec(),
            _ => body_bytes.to_vec(),
        };

        Ok(Request {
            method,
            path,
            query_params,
            headers,
            version,
            body,
        })
    }

    /// Serializa el request para enviarlo por el socket
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut target = self.path.clone();
        if !self.query_params.is_empty() {
            let mut pairs: Vec<_> = self.query_params.iter().collect();
            pairs.sort();
            let query = pairs
                .iter()
                .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            target.push('?');
            target.push_str(&query);
        }

        let mut result = format!("{} {} {}\r\n", self.method, target, self.version).into_bytes();
        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }
        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);
        result
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(|s| s.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene un header sin distinguir mayúsculas/minúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Obtiene el body como String (None si no es UTF-8)
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Decodifica un body `application/x-www-form-urlencoded`
    ///
    /// # Ejemplo
    /// ```
    /// use http_lab::http::Request;
    ///
    /// let raw = b"POST /login HTTP/1.0\r\nContent-Length: 27\r\n\r\nusername=a%40b.c&password=x";
    /// let request = Request::parse(raw).unwrap();
    /// let form = request.form_params();
    /// assert_eq!(form.get("username").map(String::as_str), Some("a@b.c"));
    /// ```
    pub fn form_params(&self) -> HashMap<String, String> {
        match std::str::from_utf8(&self.body) {
            Ok(body) => parse_query_string(body),
            Err(_) => HashMap::new(),
        }
    }
}

/// Devuelve el índice justo después de `\r\n\r\n` si el head está completo
pub fn head_complete(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

/// Extrae `Content-Length` de un head ya recibido (0 si no está)
pub fn content_length(head: &[u8]) -> usize {
    let Ok(text) = std::str::from_utf8(head) else {
        return 0;
    };
    text.split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn content_length_of(headers: &[(String, String)]) -> Option<usize> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// Formato: `GET /path?query HTTP/1.0`
fn parse_request_line(
    line: &str,
) -> Result<(Method, String, HashMap<String, String>, String), ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    // Debe tener exactamente 3 partes: METHOD PATH VERSION
    if parts.len() != 3 {
        return Err(ParseError::InvalidRequestLine);
    }

    let method: Method = parts[0].parse()?;
    let (path, query_params) = parse_path_and_query(parts[1]);

    let version = parts[2].to_string();
    if version != "HTTP/1.0" && version != "HTTP/1.1" {
        return Err(ParseError::InvalidHttpVersion(version));
    }

    Ok((method, path, query_params, version))
}

fn parse_path_and_query(target: &str) -> (String, HashMap<String, String>) {
    match target.split_once('?') {
        Some((path, query)) => (path.to_string(), parse_query_string(query)),
        None => (target.to_string(), HashMap::new()),
    }
}

/// Parsea `a=1&b=hola%20mundo` en un HashMap
pub(crate) fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|param| !param.is_empty())
        .map(|param| match param.split_once('=') {
            Some((key, value)) => (url_decode(key), url_decode(value)),
            // Parámetro sin valor (ej: "?debug")
            None => (url_decode(param), String::new()),
        })
        .collect()
}

/// Parsea los headers HTTP. Cada header tiene formato: "Name: Value"
pub(crate) fn parse_headers<'a>(
    lines: impl Iterator<Item = &'a str>,
) -> Result<Vec<(String, String)>, ParseError> {
    let mut headers = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            break;
        }
        match line.split_once(':') {
            Some((name, value)) => headers.push((name.trim().to_string(), value.trim().to_string())),
            None => return Err(ParseError::InvalidHeader(line.to_string())),
        }
    }

    Ok(headers)
}

/// Decodifica percent-encoding y `+` como espacio
///
/// Secuencias `%` inválidas se dejan tal cual.
pub fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                decoded.push((hex_value(bytes[i + 1]) << 4) | hex_value(bytes[i + 2]));
                i += 3;
            }
            other => {
                decoded.push(other);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

/// Codifica un valor para query strings / formularios
pub fn url_encode(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
