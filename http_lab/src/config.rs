//! # Configuración
//! src/config.rs
//!
//! Configuración de los tres binarios con soporte para argumentos CLI y
//! variables de entorno:
//!
//! - `ServerConfig`: servidor de usuarios (`http_lab`)
//! - `BenchArgs`: herramienta de benchmark (`http_bench`)
//! - `ClientArgs`: cliente de la API (`user_client`)
//!
//! ## Ejemplos de uso
//!
//! ```bash
//! ./http_lab --port 8080 --api-key secret
//! HTTP_PORT=9000 API_KEY=secret ./http_lab
//! ./http_bench -n 1000 -c 10 --header "Authorization: Bearer k" http://127.0.0.1:8080/users/1
//! ```

use crate::error::ConfigError;
use clap::{Parser, ValueEnum};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_KEY: &str = "your-api-key-here";
pub const DEFAULT_TOKEN_SECRET: &str = "your-secret-key";
pub const DEFAULT_ENCRYPTION_KEY: &str = "your-32-byte-encryption-key-here";

/// Configuración del servidor de usuarios
#[derive(Debug, Clone, Parser)]
#[command(name = "http_lab")]
#[command(about = "API de usuarios sobre HTTP/1.0 con un thread por conexión")]
#[command(version = "0.1.0")]
pub struct ServerConfig {
    /// Puerto en el que escucha el servidor (0 = puerto efímero)
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// API key aceptada como `Authorization: Bearer <key>`
    #[arg(long, default_value = DEFAULT_API_KEY, env = "API_KEY")]
    pub api_key: String,

    /// Secreto compartido para tokens firmados con SHA-256
    #[arg(long, default_value = DEFAULT_TOKEN_SECRET, env = "TOKEN_SECRET")]
    pub token_secret: String,

    /// Clave AES-256 (exactamente 32 bytes) para /users/encrypted
    #[arg(long, default_value = DEFAULT_ENCRYPTION_KEY, env = "ENCRYPTION_KEY")]
    pub encryption_key: String,

    /// Tamaño máximo del body en bytes (413 si se supera)
    #[arg(long = "max-body", default_value = "1048576", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Timeout de lectura del socket en milisegundos
    #[arg(long = "read-timeout", default_value = "5000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    /// Segundos de diferencia de reloj aceptados en tokens firmados
    #[arg(long = "token-skew", default_value = "300", env = "TOKEN_SKEW_SECS")]
    pub token_skew_secs: u64,

    /// No cargar los usuarios de ejemplo
    #[arg(long = "no-seed", env = "NO_SEED")]
    pub no_seed: bool,
}

impl ServerConfig {
    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use http_lab::config::ServerConfig;
    ///
    /// let config = ServerConfig::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::Invalid("API key must not be empty".to_string()));
        }
        if self.encryption_key.len() != 32 {
            return Err(ConfigError::KeyLength(self.encryption_key.len()));
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Zero { field: "max body bytes" });
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::Zero { field: "read timeout" });
        }
        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║              HTTP Lab - User API Configuration               ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:      {}", self.address());
        println!("   Read timeout: {} ms", self.read_timeout_ms);
        println!("   Max body:     {} bytes", self.max_body_bytes);
        println!();
        println!("🔐 Auth:");
        println!("   API key:      {}", mask(&self.api_key));
        println!("   Token skew:   {} s", self.token_skew_secs);
        println!("   Seed users:   {}", if self.no_seed { "no" } else { "yes" });
        println!();
        println!("═══════════════════════════════════════════════════════════════");
        println!();
    }
}

/// Muestra sólo los primeros caracteres de un secreto
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            token_secret: DEFAULT_TOKEN_SECRET.to_string(),
            encryption_key: DEFAULT_ENCRYPTION_KEY.to_string(),
            max_body_bytes: 1024 * 1024,
            read_timeout_ms: 5_000,
            token_skew_secs: 300,
            no_seed: false,
        }
    }
}

/// Qué se mide en el benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BenchTarget {
    /// Requests HTTP reales contra `url`
    Http,
    /// Store clave-valor en memoria (sin red)
    Kv,
}

/// Argumentos de la herramienta de benchmark
#[derive(Debug, Clone, Parser)]
#[command(name = "http_bench")]
#[command(about = "Benchmark concurrente de requests HTTP/1.0")]
#[command(version = "0.1.0")]
pub struct BenchArgs {
    /// URL objetivo
    #[arg(default_value = "http://127.0.0.1:8080/health", env = "BENCH_URL")]
    pub url: String,

    /// Número total de requests
    #[arg(short = 'n', long, default_value = "1000", env = "BENCH_REQUESTS")]
    pub requests: usize,

    /// Número de workers concurrentes
    #[arg(short = 'c', long, default_value = "10", env = "BENCH_CONCURRENCY")]
    pub concurrency: usize,

    /// Método HTTP
    #[arg(short = 'm', long, default_value = "GET")]
    pub method: String,

    /// Header extra, repetible: `--header "Name: value"`
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Timeout por request en milisegundos
    #[arg(long = "timeout", default_value = "30000", env = "BENCH_TIMEOUT_MS")]
    pub timeout_ms: u64,

    /// Requests de calentamiento que no se miden
    #[arg(long, default_value = "0")]
    pub warmup: usize,

    #[arg(long, value_enum, default_value = "http")]
    pub target: BenchTarget,
}

impl BenchArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parsea los `--header` en pares (nombre, valor)
    pub fn parsed_headers(&self) -> Result<Vec<(String, String)>, ConfigError> {
        self.headers
            .iter()
            .map(|raw| match raw.split_once(':') {
                Some((name, value)) if !name.trim().is_empty() => {
                    Ok((name.trim().to_string(), value.trim().to_string()))
                }
                _ => Err(ConfigError::InvalidHeader(raw.clone())),
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requests == 0 {
            return Err(ConfigError::Zero { field: "requests" });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Zero { field: "concurrency" });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Zero { field: "timeout" });
        }
        if self.target == BenchTarget::Http {
            Url::parse(&self.url).map_err(|_| ConfigError::InvalidUrl(self.url.clone()))?;
        }
        self.parsed_headers()?;
        Ok(())
    }
}

impl Default for BenchArgs {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080/health".to_string(),
            requests: 1000,
            concurrency: 10,
            method: "GET".to_string(),
            headers: Vec::new(),
            timeout_ms: 30_000,
            warmup: 0,
            target: BenchTarget::Http,
        }
    }
}

/// Argumentos del cliente de la API
#[derive(Debug, Clone, Parser)]
#[command(name = "user_client")]
#[command(about = "Ejecuta cada operación del cliente contra el servidor de usuarios")]
#[command(version = "0.1.0")]
pub struct ClientArgs {
    /// URL base del servidor
    #[arg(long, default_value = "http://127.0.0.1:8080", env = "API_BASE_URL")]
    pub base_url: String,

    #[arg(long, default_value = DEFAULT_API_KEY, env = "API_KEY")]
    pub api_key: String,

    #[arg(long, default_value = DEFAULT_ENCRYPTION_KEY, env = "ENCRYPTION_KEY")]
    pub encryption_key: String,

    #[arg(long, default_value = DEFAULT_TOKEN_SECRET, env = "TOKEN_SECRET")]
    pub token_secret: String,

    /// Reintentos después del primer intento fallido
    #[arg(long, default_value = "3")]
    pub retries: u32,

    /// Espera base entre reintentos (se duplica en cada intento)
    #[arg(long = "retry-delay", default_value = "1000")]
    pub retry_delay_ms: u64,
}

impl ClientArgs {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.base_url).map_err(|_| ConfigError::InvalidUrl(self.base_url.clone()))?;
        if self.encryption_key.len() != 32 {
            return Err(ConfigError::KeyLength(self.encryption_key.len()));
        }
        Ok(())
    }
}

impl Default for ClientArgs {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            encryption_key: DEFAULT_ENCRYPTION_KEY.to_string(),
            token_secret: DEFAULT_TOKEN_SECRET.to_string(),
            retries: 3,
            retry_delay_ms: 1_000,
        }
    }
}
