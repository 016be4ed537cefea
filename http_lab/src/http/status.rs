//! # Códigos de Estado HTTP
//!
//! Este módulo define los códigos de estado HTTP/1.0 que usa la API de
//! usuarios. Los códigos que el servidor no genera pero que un cliente
//! puede recibir (por ejemplo un 302 de otro servidor durante un benchmark)
//! se representan con `StatusCode::Other`.
//!
//! - **2xx**: Éxito (200, 201, 204)
//! - **4xx**: Error del cliente (400, 401, 404, 405, 409, 413, 429)
//! - **5xx**: Error del servidor (500, 503)

/// Representa los códigos de estado HTTP que maneja el laboratorio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok,

    /// 201 Created - Recurso creado (POST /users)
    Created,

    /// 204 No Content - Petición exitosa sin contenido en el body
    NoContent,

    /// 400 Bad Request - Parámetros inválidos o malformados
    BadRequest,

    /// 401 Unauthorized - Falta la API key o el token es inválido
    Unauthorized,

    /// 404 Not Found - Ruta o recurso no encontrado
    NotFound,

    /// 405 Method Not Allowed - La ruta existe pero no con ese método
    MethodNotAllowed,

    /// 409 Conflict - Conflicto en el estado del recurso
    Conflict,

    /// 413 Payload Too Large - El body supera el límite configurado
    PayloadTooLarge,

    /// 429 Too Many Requests
    TooManyRequests,

    /// 500 Internal Server Error - Error interno del servidor
    InternalServerError,

    /// 503 Service Unavailable
    ServiceUnavailable,

    /// Cualquier otro código recibido de un servidor externo
    Other(u16),
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use http_lab::http::StatusCode;
    /// assert_eq!(StatusCode::Created.as_u16(), 201);
    /// assert_eq!(StatusCode::Other(302).as_u16(), 302);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NoContent => 204,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::Conflict => 409,
            StatusCode::PayloadTooLarge => 413,
            StatusCode::TooManyRequests => 429,
            StatusCode::InternalServerError => 500,
            StatusCode::ServiceUnavailable => 503,
            StatusCode::Other(code) => *code,
        }
    }

    /// Construye un código desde su valor numérico
    ///
    /// Los valores fuera de 100..=999 no son códigos HTTP válidos.
    pub fn from_u16(code: u16) -> Option<Self> {
        let status = match code {
            200 => StatusCode::Ok,
            201 => StatusCode::Created,
            204 => StatusCode::NoContent,
            400 => StatusCode::BadRequest,
            401 => StatusCode::Unauthorized,
            404 => StatusCode::NotFound,
            405 => StatusCode::MethodNotAllowed,
            409 => StatusCode::Conflict,
            413 => StatusCode::PayloadTooLarge,
            429 => StatusCode::TooManyRequests,
            500 => StatusCode::InternalServerError,
            503 => StatusCode::ServiceUnavailable,
            100..=999 => StatusCode::Other(code),
            _ => return None,
        };
        Some(status)
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use http_lab::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::Unauthorized.reason_phrase(), "Unauthorized");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::NoContent => "No Content",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::Conflict => "Conflict",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::TooManyRequests => "Too Many Requests",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
            StatusCode::Other(_) => "Unknown",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del cliente (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_values() {
        assert_eq!(StatusCode::Ok.as_u16(), 200);
        assert_eq!(StatusCode::Created.as_u16(), 201);
        assert_eq!(StatusCode::Unauthorized.as_u16(), 401);
        assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
        assert_eq!(StatusCode::PayloadTooLarge.as_u16(), 413);
    }

    #[test]
    fn test_from_u16_known_and_other() {
        assert_eq!(StatusCode::from_u16(201), Some(StatusCode::Created));
        assert_eq!(StatusCode::from_u16(302), Some(StatusCode::Other(302)));
        assert_eq!(StatusCode::from_u16(42), None);
    }

    #[test]
    fn test_is_success() {
        assert!(StatusCode::Ok.is_success());
        assert!(StatusCode::Created.is_success());
        assert!(!StatusCode::Other(302).is_success());
        assert!(!StatusCode::BadRequest.is_success());
    }

    #[test]
    fn test_error_classes() {
        assert!(StatusCode::Unauthorized.is_client_error());
        assert!(StatusCode::Other(418).is_client_error());
        assert!(StatusCode::ServiceUnavailable.is_server_error());
        assert!(!StatusCode::Ok.is_server_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(StatusCode::Created.to_string(), "201 Created");
        assert_eq!(StatusCode::NotFound.to_string(), "404 Not Found");
        assert_eq!(StatusCode::Other(302).to_string(), "302 Unknown");
    }
}
