//! Observer: un `Notifier` reenvía cada evento a sus listeners registrados.

use std::sync::{Arc, Mutex};

pub trait Listener: Send + Sync {
    fn on_event(&self, event: &str);
}

/// Identifica a un listener para poder quitarlo después
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
pub struct Notifier {
    listeners: Vec<(ListenerId, Arc<dyn Listener>)>,
    next_id: u64,
    last_event: Option<String>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Arc<dyn Listener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// `false` si el id no estaba registrado
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    /// Entrega `event` a todos los listeners, en orden de registro.
    /// Devuelve a cuántos llegó.
    pub fn notify(&mut self, event: &str) -> usize {
        self.last_event = Some(event.to_string());
        for (_, listener) in &self.listeners {
            listener.on_event(event);
        }
        self.listeners.len()
    }

    pub fn last_event(&self) -> Option<&str> {
        self.last_event.as_deref()
    }
}

/// Listener que guarda lo que recibe
#[derive(Default)]
pub struct Inbox {
    name: String,
    received: Mutex<Vec<String>>,
}

impl Inbox {
    pub fn new(name: &str) -> Self {
        Inbox {
            name: name.to_string(),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl Listener for Inbox {
    fn on_event(&self, event: &str) {
        tracing::debug!(inbox = %self.name, event, "event received");
        self.received
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_reaches_registered_listeners() {
        let mut notifier = Notifier::new();
        let cnn = Arc::new(Inbox::new("CNN"));
        let bbc = Arc::new(Inbox::new("BBC"));

        notifier.add_listener(cnn.clone());
        let bbc_id = notifier.add_listener(bbc.clone());

        assert_eq!(notifier.notify("rust 2024 released"), 2);
        assert!(notifier.remove_listener(bbc_id));
        assert!(!notifier.remove_listener(bbc_id));
        assert_eq!(notifier.notify("second"), 1);

        assert_eq!(cnn.received(), vec!["rust 2024 released", "second"]);
        assert_eq!(bbc.received(), vec!["rust 2024 released"]);
        assert_eq!(notifier.last_event(), Some("second"));
    }

    #[test]
    fn test_notify_without_listeners() {
        assert_eq!(Notifier::new().notify("nobody"), 0);
    }
}
