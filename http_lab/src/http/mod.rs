//! # Módulo HTTP
//!
//! Implementación mínima del protocolo HTTP/1.0 usada tanto por el servidor
//! de usuarios como por el cliente y el benchmark:
//!
//! - Parsing y construcción de requests
//! - Construcción y parsing de responses
//! - Status codes
//! - Query strings y formularios url-encoded
//!
//! HTTP/1.0 no mantiene conexiones persistentes: cada request abre una
//! conexión TCP y la respuesta termina cuando el servidor cierra el socket.

pub mod request;
pub mod response;
pub mod status;

pub use request::{
    content_length, head_complete, url_decode, url_encode, Method, ParseError, Request,
};
pub use response::Response;
pub use status::StatusCode;
