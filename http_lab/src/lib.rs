//! # HTTP Lab
//! src/lib.rs
//!
//! Servidor HTTP/1.0 concurrente con una API JSON de usuarios, su cliente y
//! una herramienta de benchmark, implementados sobre `std::net` y threads.
//!
//! ## Arquitectura
//!
//! - `http`: parsing y construcción de requests/responses HTTP/1.0
//! - `router`: enrutamiento por método y patrón de path
//! - `users`: modelo, store, autenticación y handlers de la API
//! - `server`: listener TCP con un thread por conexión
//! - `metrics`: recolección de métricas del servidor
//! - `stats`: percentiles y desviación estándar de latencias
//! - `client`: cliente de la API (transporte, cifrado, reintentos, lotes)
//! - `bench`: benchmark concurrente sobre HTTP o un store en memoria
//! - `config`, `error`, `telemetry`: configuración CLI, errores y logs
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use http_lab::config::ServerConfig;
//! use http_lab::server::Server;
//!
//! let server = Server::bind(ServerConfig::default()).expect("bind");
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod bench;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod router;
pub mod server;
pub mod stats;
pub mod telemetry;
pub mod users;
