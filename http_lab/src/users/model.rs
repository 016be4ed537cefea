//! Tipos que viajan como JSON entre el cliente y el servidor.

use serde::{Deserialize, Serialize};

/// Usuario almacenado
///
/// La contraseña nunca sale en una respuesta: se omite al serializar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
}

/// Body de `POST /users` y payload cifrado de `/users/encrypted`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl NewUser {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }
}

/// Envelope de todas las respuestas de la API de usuarios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Body de `POST /users/encrypted`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub encrypted_data: String,
}

/// Respuesta de `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    pub size: usize,
}
