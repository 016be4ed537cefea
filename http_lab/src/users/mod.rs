//! # API de Usuarios
//! src/users/mod.rs
//!
//! API JSON de juguete sobre el servidor HTTP/1.0:
//! - `model`: tipos serializables (usuario, envelope, recibos)
//! - `store`: usuarios en memoria con `RwLock`
//! - `auth`: API key y tokens firmados con SHA-256
//! - `handlers`: endpoints y construcción del router
//!
//! No hay persistencia ni TLS: es un servidor de práctica.

pub mod auth;
pub mod handlers;
pub mod model;
pub mod store;

pub use handlers::UserApi;
pub use model::{ApiResponse, NewUser, UploadReceipt, User};
pub use store::UserStore;
