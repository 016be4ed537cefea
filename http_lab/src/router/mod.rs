//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea (método, path) a handlers.
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Los patrones pueden ser exactos (`/login`) o terminar en un segmento
//! variable (`/users/{id}`). Un patrón exacto siempre gana sobre uno con
//! variable, así `/users/encrypted` no se confunde con `/users/{id}`.
//!
//! - Path sin ningún patrón que coincida → 404
//! - Path que coincide pero con otro método → 405

use crate::http::{Method, Request, Response, StatusCode};
use std::collections::HashMap;

/// Parámetros extraídos del path (`{id}` → "42")
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|s| s.as_str())
    }
}

/// Un handler recibe el Request y los parámetros del path
pub type Handler = Box<dyn Fn(&Request, &Params) -> Response + Send + Sync>;

enum Pattern {
    Exact(String),
    /// Prefijo y nombre del parámetro: `/users/{id}` → ("/users/", "id")
    Param(String, String),
}

impl Pattern {
    fn parse(pattern: &str) -> Self {
        match pattern.rsplit_once('/') {
            Some((prefix, last)) if last.starts_with('{') && last.ends_with('}') => {
                Pattern::Param(format!("{}/", prefix), last[1..last.len() - 1].to_string())
            }
            _ => Pattern::Exact(pattern.to_string()),
        }
    }

    fn matches(&self, path: &str) -> Option<Params> {
        match self {
            Pattern::Exact(exact) => (exact == path).then(Params::default),
            Pattern::Param(prefix, name) => {
                let rest = path.strip_prefix(prefix.as_str())?;
                if rest.is_empty() || rest.contains('/') {
                    return None;
                }
                let mut params = HashMap::new();
                params.insert(name.clone(), rest.to_string());
                Some(Params(params))
            }
        }
    }

    fn is_exact(&self) -> bool {
        matches!(self, Pattern::Exact(_))
    }
}

struct Route {
    method: Method,
    pattern: Pattern,
    handler: Handler,
}

/// Router que mapea (método, path) a handlers
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra una ruta con su handler
    ///
    /// # Ejemplo
    /// ```
    /// use http_lab::http::{Method, Request, Response};
    /// use http_lab::router::Router;
    ///
    /// let mut router = Router::new();
    /// router.register(Method::GET, "/hello/{name}", |_req, params| {
    ///     Response::json(&format!(r#"{{"hello": "{}"}}"#, params.get("name").unwrap_or("")))
    /// });
    ///
    /// let request = Request::parse(b"GET /hello/ana HTTP/1.0\r\n\r\n").unwrap();
    /// assert_eq!(router.route(&request).body(), br#"{"hello": "ana"}"#);
    /// ```
    pub fn register<F>(&mut self, method: Method, pattern: &str, handler: F)
    where
        F: Fn(&Request, &Params) -> Response + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            pattern: Pattern::parse(pattern),
            handler: Box::new(handler),
        });
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    pub fn route(&self, request: &Request) -> Response {
        let path = request.path();

        // Primero patrones exactos, luego los que tienen variable
        let candidates = self
            .routes
            .iter()
            .filter(|route| route.pattern.is_exact())
            .chain(self.routes.iter().filter(|route| !route.pattern.is_exact()));

        let mut path_known = false;
        let mut matched: Option<(&Route, Params)> = None;
        let mut exact_hit = false;

        for route in candidates {
            let Some(params) = route.pattern.matches(path) else {
                continue;
            };
            // Un match exacto oculta los patrones con variable
            if exact_hit && !route.pattern.is_exact() {
                break;
            }
            path_known = true;
            exact_hit |= route.pattern.is_exact();
            if route.method == request.method() {
                matched = Some((route, params));
                break;
            }
        }

        let mut response = match matched {
            Some((route, params)) => (route.handler)(request, &params),
            None if path_known => Response::error(
                StatusCode::MethodNotAllowed,
                &format!("Method {} not allowed for {}", request.method(), path),
            ),
            None => Response::error(StatusCode::NotFound, &format!("Route not found: {}", path)),
        };

        self.add_common_headers(&mut response);
        response
    }

    /// Headers comunes a todas las respuestas
    fn add_common_headers(&self, response: &mut Response) {
        response.add_header("Server", "http-lab/0.1");
        response.add_header("Connection", "close");
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(_req: &Request, _params: &Params) -> Response {
        Response::json(r#"{"test": "ok"}"#)
    }

    fn request(raw: &[u8]) -> Request {
        Request::parse(raw).unwrap()
    }

    #[test]
    fn test_route_found() {
        let mut router = Router::new();
        router.register(Method::GET, "/test", ok);

        let response = router.route(&request(b"GET /test HTTP/1.0\r\n\r\n"));
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Connection"), Some("close"));
        assert_eq!(response.header("Server"), Some("http-lab/0.1"));
    }

    #[test]
    fn test_route_not_found() {
        let router = Router::new();

        let response = router.route(&request(b"GET /nonexistent HTTP/1.0\r\n\r\n"));
        assert_eq!(response.status(), StatusCode::NotFound);
        // Los errores del router también llevan los headers comunes
        assert_eq!(response.header("server"), Some("http-lab/0.1"));
    }

    #[test]
    fn test_method_not_allowed() {
        let mut router = Router::new();
        router.register(Method::POST, "/login", ok);

        let response = router.route(&request(b"GET /login HTTP/1.0\r\n\r\n"));
        assert_eq!(response.status(), StatusCode::MethodNotAllowed);
    }

    #[test]
    fn test_path_parameter() {
        let mut router = Router::new();
        router.register(Method::GET, "/users/{id}", |_req, params| {
            Response::json(&format!(r#"{{"id": "{}"}}"#, params.get("id").unwrap()))
        });

        let response = router.route(&request(b"GET /users/42 HTTP/1.0\r\n\r\n"));
        assert_eq!(response.body(), br#"{"id": "42"}"#);

        let nested = router.route(&request(b"GET /users/42/extra HTTP/1.0\r\n\r\n"));
        assert_eq!(nested.status(), StatusCode::NotFound);

        let empty = router.route(&request(b"GET /users/ HTTP/1.0\r\n\r\n"));
        assert_eq!(empty.status(), StatusCode::NotFound);
    }

    #[test]
    fn test_exact_route_wins_over_parameter() {
        let mut router = Router::new();
        router.register(Method::GET, "/users/{id}", ok);
        router.register(Method::POST, "/users/encrypted", |_req, _params| {
            Response::new(StatusCode::Created)
        });

        let created = router.route(&request(b"POST /users/encrypted HTTP/1.0\r\n\r\n"));
        assert_eq!(created.status(), StatusCode::Created);

        // GET sobre la ruta exacta no cae en /users/{id}
        let wrong_method = router.route(&request(b"GET /users/encrypted HTTP/1.0\r\n\r\n"));
        assert_eq!(wrong_method.status(), StatusCode::MethodNotAllowed);
    }

    #[test]
    fn test_same_path_different_methods() {
        let mut router = Router::new();
        router.register(Method::GET, "/items", ok);
        router.register(Method::POST, "/items", |_req, _params| {
            Response::new(StatusCode::Created)
        });

        let get = router.route(&request(b"GET /items HTTP/1.0\r\n\r\n"));
        let post = router.route(&request(b"POST /items HTTP/1.0\r\n\r\n"));
        assert_eq!(get.status(), StatusCode::Ok);
        assert_eq!(post.status(), StatusCode::Created);
    }
}
