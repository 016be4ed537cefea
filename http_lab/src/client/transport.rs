//! # Transporte HTTP/1.0
//! src/client/transport.rs
//!
//! Una conexión TCP por request: conectar, escribir el request, leer hasta
//! que el servidor cierre y parsear la respuesta. Lo usan `ApiClient` y el
//! probe HTTP del benchmark.

use crate::error::ClientError;
use crate::http::{Request, Response};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;
use url::Url;

/// Target del request (`/path?query`) a partir de una URL completa
pub fn request_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Envía `request` al host de `url` y espera la respuesta completa
///
/// `timeout` se aplica a connect, lectura y escritura por separado.
pub fn send(url: &Url, request: Request, timeout: Duration) -> Result<Response, ClientError> {
    let host = url
        .host_str()
        .ok_or_else(|| ClientError::InvalidUrl(format!("{} has no host", url)))?;
    let addr = url
        .socket_addrs(|| None)?
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::InvalidUrl(format!("{} does not resolve", url)))?;

    let mut stream = TcpStream::connect_timeout(&addr, timeout)?;
    stream.set_read_timeout(Some(timeout))?;
    stream.set_write_timeout(Some(timeout))?;

    let host_header = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    let request = request.with_header("Host", &host_header);
    stream.write_all(&request.to_bytes())?;
    stream.flush()?;

    let mut buffer = Vec::new();
    stream.read_to_end(&mut buffer)?;
    Ok(Response::parse(&buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, StatusCode};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_request_target() {
        let url = Url::parse("http://localhost:8080/users/1?verbose=1").unwrap();
        assert_eq!(request_target(&url), "/users/1?verbose=1");

        let bare = Url::parse("http://localhost:8080").unwrap();
        assert_eq!(request_target(&bare), "/");
    }

    #[test]
    fn test_send_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let n = stream.read(&mut buf).unwrap();
            let request = Request::parse(&buf[..n]).unwrap();
            assert_eq!(request.header("host"), Some(addr.to_string().as_str()));

            let response = Response::json(r#"{"pong": true}"#);
            stream.write_all(&response.to_bytes()).unwrap();
        });

        let url = Url::parse(&format!("http://{}/ping", addr)).unwrap();
        let request = Request::new(Method::GET, &request_target(&url));
        let response = send(&url, request, Duration::from_secs(5)).unwrap();

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), br#"{"pong": true}"#);
        server.join().unwrap();
    }

    #[test]
    fn test_send_connection_refused() {
        // Bind y drop: el puerto queda libre y nadie escucha
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let url = Url::parse(&format!("http://{}/", addr)).unwrap();

        let result = send(&url, Request::new(Method::GET, "/"), Duration::from_secs(1));
        assert!(matches!(result, Err(ClientError::Io(_))));
    }
}
