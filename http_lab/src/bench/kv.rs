//! Store clave-valor en memoria para medir contención de un `RwLock` sin
//! red de por medio.

use super::probe::Probe;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct KvStore {
    data: RwLock<HashMap<String, String>>,
}

impl KvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Devuelve el valor o un string vacío si no existe
    pub fn read(&self, key: &str) -> String {
        let data = self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        data.get(key).cloned().unwrap_or_default()
    }

    pub fn write(&self, key: &str, value: &str) {
        let mut data = self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        data.insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cada tercer request escribe; el resto lee la última clave escrita de
/// su grupo. Éxito ⇔ respuesta no vacía.
#[derive(Debug, Default)]
pub struct KvProbe {
    store: KvStore,
}

impl KvProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &KvStore {
        &self.store
    }

    fn handle(&self, seq: usize) -> String {
        if seq % 3 == 0 {
            self.store.write(&format!("key_{}", seq), &format!("value_{}", seq));
            "OK".to_string()
        } else {
            self.store.read(&format!("key_{}", seq - seq % 3))
        }
    }
}

impl Probe for KvProbe {
    fn probe(&self, seq: usize) -> bool {
        !self.handle(seq).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_read_write() {
        let store = KvStore::new();
        assert_eq!(store.read("missing"), "");

        store.write("a", "1");
        store.write("a", "2");
        assert_eq!(store.read("a"), "2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_probe_write_then_read() {
        let probe = KvProbe::new();

        // Lectura antes de la escritura del grupo
        assert!(!probe.probe(4));

        assert!(probe.probe(3));
        assert!(probe.probe(4));
        assert!(probe.probe(5));
        assert_eq!(probe.store().read("key_3"), "value_3");
    }
}
