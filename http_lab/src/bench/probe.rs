//! # Probes
//! src/bench/probe.rs
//!
//! Un probe es una operación que el benchmark repite y cronometra.

use crate::client::transport;
use crate::error::ConfigError;
use crate::http::{Method, Request};
use std::time::Duration;
use url::Url;

/// Operación medible. `seq` es el número de request dentro de la corrida.
pub trait Probe: Sync {
    /// `true` si la operación tuvo éxito
    fn probe(&self, seq: usize) -> bool;
}

impl<F> Probe for F
where
    F: Fn(usize) -> bool + Sync,
{
    fn probe(&self, seq: usize) -> bool {
        self(seq)
    }
}

/// Un request HTTP real; éxito ⇔ status < 400
#[derive(Debug, Clone)]
pub struct HttpProbe {
    url: Url,
    method: Method,
    headers: Vec<(String, String)>,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(url: &str, method: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let url = Url::parse(url).map_err(|_| ConfigError::InvalidUrl(url.to_string()))?;
        let method = method
            .to_ascii_uppercase()
            .parse::<Method>()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(Self {
            url,
            method,
            headers: vec![("User-Agent".to_string(), "http-bench/0.1".to_string())],
            timeout,
        })
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn build_request(&self) -> Request {
        self.headers.iter().fold(
            Request::new(self.method, &transport::request_target(&self.url)),
            |request, (name, value)| request.with_header(name, value),
        )
    }
}

impl Probe for HttpProbe {
    fn probe(&self, _seq: usize) -> bool {
        match transport::send(&self.url, self.build_request(), self.timeout) {
            Ok(response) => response.status().as_u16() < 400,
            Err(e) => {
                tracing::debug!(error = %e, "probe failed");
                false
            }
        }
    }
}
