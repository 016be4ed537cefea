//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes (un thread por conexión)
//! 3. Lee el request completo (head + body según `Content-Length`)
//! 4. Lo enruta a la API de usuarios y envía la respuesta

pub mod tcp;

pub use tcp::Server;
