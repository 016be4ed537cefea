//! Singleton: una única instancia global, creada la primera vez que se pide.

use std::sync::OnceLock;

static INSTANCE: OnceLock<Registry> = OnceLock::new();

#[derive(Debug)]
pub struct Registry {
    seed: i64,
}

impl Registry {
    /// Devuelve la instancia global. Sólo el `seed` de la primera llamada
    /// tiene efecto; las siguientes reciben la misma instancia.
    pub fn instance(seed: i64) -> &'static Registry {
        INSTANCE.get_or_init(|| {
            tracing::debug!(seed, "registry created");
            Registry { seed }
        })
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_first_seed_wins() {
        let handles: Vec<_> = (0..8)
            .map(|seed| thread::spawn(move || Registry::instance(seed) as *const Registry as usize))
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));

        let first = Registry::instance(100);
        let second = Registry::instance(200);
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.seed(), second.seed());
        assert_ne!(first.seed(), 200);
    }
}
