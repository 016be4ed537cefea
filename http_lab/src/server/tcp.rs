//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP que maneja múltiples conexiones
//! simultáneas usando threads. Cada conexión se procesa en su propio thread
//! y atiende exactamente un request (HTTP/1.0).

use crate::config::ServerConfig;
use crate::http::{content_length, head_complete, Request, Response, StatusCode};
use crate::metrics::MetricsCollector;
use crate::router::Router;
use crate::users::UserApi;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Límite del head de un request (request line + headers)
const MAX_HEAD_BYTES: usize = 16 * 1024;

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(0);

/// Servidor HTTP/1.0 concurrente con métricas
pub struct Server {
    listener: TcpListener,
    shared: Arc<Shared>,
}

/// Lo que comparten todos los threads de conexión
struct Shared {
    router: Router,
    metrics: MetricsCollector,
    max_body_bytes: usize,
    read_timeout: Duration,
}

impl Server {
    /// Hace bind en `config.address()` y arma el router de la API
    ///
    /// Con `port = 0` el sistema operativo elige un puerto libre; usar
    /// `local_addr` para conocerlo.
    pub fn bind(config: ServerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(config.address())?;
        let metrics = MetricsCollector::new();
        let router = UserApi::new(&config, metrics.clone()).into_router();

        Ok(Self {
            listener,
            shared: Arc::new(Shared {
                router,
                metrics,
                max_body_bytes: config.max_body_bytes,
                read_timeout: config.read_timeout(),
            }),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.shared.metrics
    }

    /// Acepta conexiones para siempre, un thread por conexión
    pub fn run(&self) -> io::Result<()> {
        info!(address = %self.local_addr()?, "server listening (one thread per connection)");

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let shared = Arc::clone(&self.shared);
                    let peer = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());
                    debug!(%peer, "connection accepted");

                    shared.metrics.connection_opened();
                    thread::spawn(move || {
                        if let Err(e) = handle_connection(stream, &shared) {
                            warn!(%peer, error = %e, "connection failed");
                        }
                        shared.metrics.connection_closed();
                    });
                }
                Err(e) => error!(error = %e, "accept failed"),
            }
        }

        Ok(())
    }
}

/// Resultado de leer un request del socket
#[derive(Debug, PartialEq)]
enum Incoming {
    /// El peer cerró sin mandar nada
    Closed,
    /// Bytes del request (posiblemente incompletos si el peer cerró antes)
    Data(Vec<u8>),
    /// `Content-Length` supera el máximo; se incluye sólo el head
    TooLarge(Vec<u8>),
}

/// Lee el head completo y luego tantos bytes de body como indique
/// `Content-Length`
fn read_request(stream: &mut impl Read, max_body_bytes: usize) -> io::Result<Incoming> {
    let mut buffer = Vec::with_capacity(8192);
    let mut chunk = [0u8; 8192];
    let mut expected_total: Option<usize> = None;

    loop {
        if let Some(total) = expected_total {
            if buffer.len() >= total {
                buffer.truncate(total);
                return Ok(Incoming::Data(buffer));
            }
        }

        let n = stream.read(&mut chunk)?;
        if n == 0 {
            return Ok(if buffer.is_empty() {
                Incoming::Closed
            } else {
                Incoming::Data(buffer)
            });
        }
        buffer.extend_from_slice(&chunk[..n]);

        if expected_total.is_none() {
            match head_complete(&buffer) {
                Some(head_end) => {
                    let body_len = content_length(&buffer[..head_end]);
                    if body_len > max_body_bytes {
                        buffer.truncate(head_end);
                        return Ok(Incoming::TooLarge(buffer));
                    }
                    expected_total = Some(head_end + body_len);
                }
                // Sin terminador: el parser lo rechazará
                None if buffer.len() > MAX_HEAD_BYTES => return Ok(Incoming::Data(buffer)),
                None => {}
            }
        }
    }
}

/// Identificador corto para correlacionar logs y respuestas
fn request_id(start: Instant) -> String {
    let mut hasher = DefaultHasher::new();
    REQUEST_SEQ.fetch_add(1, Ordering::Relaxed).hash(&mut hasher);
    start.elapsed().as_nanos().hash(&mut hasher);
    thread::current().id().hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

fn handle_connection(mut stream: TcpStream, shared: &Shared) -> io::Result<()> {
    stream.set_read_timeout(Some(shared.read_timeout))?;
    let start = Instant::now();
    let request_id = request_id(start);
    let thread_id = format!("{:?}", thread::current().id());

    let (mut response, method, path) = match read_request(&mut stream, shared.max_body_bytes)? {
        Incoming::Closed => {
            debug!("peer closed without sending data");
            return Ok(());
        }
        Incoming::TooLarge(head) => {
            let path = Request::parse(&head)
                .map(|request| request.path().to_string())
                .unwrap_or_else(|_| "/error".to_string());
            let response = Response::error(
                StatusCode::PayloadTooLarge,
                &format!("Body exceeds {} bytes", shared.max_body_bytes),
            );
            (response, "-".to_string(), path)
        }
        Incoming::Data(bytes) => match Request::parse(&bytes) {
            Ok(request) => {
                let response = shared.router.route(&request);
                (response, request.method().to_string(), request.path().to_string())
            }
            Err(e) => {
                warn!(error = %e, "unparseable request");
                let response = Response::error(StatusCode::BadRequest, &format!("Invalid: {}", e));
                (response, "-".to_string(), "/error".to_string())
            }
        },
    };

    // Headers de observabilidad
    response.add_header("X-Request-Id", &request_id);
    response.add_header("X-Worker-Thread", &thread_id);

    stream.write_all(&response.to_bytes())?;
    stream.flush()?;

    let latency = start.elapsed();
    shared
        .metrics
        .record_request(&path, response.status().as_u16(), latency);

    info!(
        request_id = &request_id[..8],
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = latency.as_secs_f64() * 1000.0,
        "request served"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn shared() -> Shared {
        let metrics = MetricsCollector::new();
        Shared {
            router: UserApi::new(&ServerConfig::default(), metrics.clone()).into_router(),
            metrics,
            max_body_bytes: 64,
            read_timeout: Duration::from_secs(5),
        }
    }

    /// Atiende una sola conexión en un thread y devuelve lo que recibe el cliente
    fn exchange(shared: Shared, raw: &[u8]) -> (String, Shared) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_connection(stream, &shared).unwrap();
            shared
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(raw).unwrap();
        client.shutdown(std::net::Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        let shared = server.join().unwrap();
        (String::from_utf8_lossy(&buf).into_owned(), shared)
    }

    #[test]
    fn test_read_request_waits_for_body() {
        let raw = b"POST /users HTTP/1.0\r\nContent-Length: 5\r\n\r\nhelloEXTRA";
        let incoming = read_request(&mut Cursor::new(raw.to_vec()), 64).unwrap();

        let expected = b"POST /users HTTP/1.0\r\nContent-Length: 5\r\n\r\nhello".to_vec();
        assert_eq!(incoming, Incoming::Data(expected));
    }

    #[test]
    fn test_read_request_closed_and_too_large() {
        assert_eq!(read_request(&mut Cursor::new(Vec::new()), 64).unwrap(), Incoming::Closed);

        let raw = b"POST /upload HTTP/1.0\r\nContent-Length: 65\r\n\r\n".to_vec();
        assert!(matches!(
            read_request(&mut Cursor::new(raw), 64).unwrap(),
            Incoming::TooLarge(_)
        ));
    }

    #[test]
    fn test_handle_connection_health() {
        let (text, shared) = exchange(shared(), b"GET /health HTTP/1.0\r\n\r\n");

        assert!(text.starts_with("HTTP/1.0 200 OK"));
        assert!(text.contains("X-Request-Id:"));
        assert!(text.contains("X-Worker-Thread:"));
        assert!(text.contains("Connection: close"));
        assert_eq!(shared.metrics.snapshot().total_requests, 1);
    }

    #[test]
    fn test_handle_connection_parse_error() {
        let (text, shared) = exchange(shared(), b"\x00\x01\x02\x03garbage");

        assert!(text.contains("400 Bad Request"));
        assert!(text.contains("Invalid:"));
        assert_eq!(shared.metrics.snapshot().status_codes.get(&400), Some(&1));
    }

    #[test]
    fn test_handle_connection_payload_too_large() {
        let (text, _) = exchange(
            shared(),
            b"POST /upload HTTP/1.0\r\nAuthorization: Bearer your-api-key-here\r\nContent-Length: 1000\r\n\r\n",
        );

        assert!(text.contains("413 Payload Too Large"));
    }

    #[test]
    fn test_handle_connection_unknown_route() {
        let (text, _) = exchange(shared(), b"GET /nope HTTP/1.0\r\n\r\n");

        assert!(text.contains("404 Not Found"));
        assert!(text.contains("Route not found: /nope"));
    }

    #[test]
    fn test_handle_connection_peer_closed_immediately() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let shared = shared();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handle_connection(stream, &shared).unwrap();
            shared
        });

        drop(TcpStream::connect(addr).unwrap());

        let shared = server.join().unwrap();
        assert_eq!(shared.metrics.snapshot().total_requests, 0);
    }

    #[test]
    fn test_bind_ephemeral_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let server = Server::bind(config).unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
        assert_eq!(server.metrics().active_connections(), 0);
    }
}
