//! Inicialización de logs (`RUST_LOG` sobrescribe el filtro por defecto).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Instala el subscriber global. Llamarla más de una vez no hace nada.
pub fn init_tracing(default_directive: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init_tracing("http_lab=debug");
        init_tracing("http_lab=info");
        tracing::info!("telemetry ready");
    }
}
