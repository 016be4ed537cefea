//! # Detección de threads colgados
//! src/leak.rs
//!
//! `TaskTracker` lleva la cuenta de los threads vivos que lanzó. Un thread
//! bloqueado para siempre en un `send` se ve como un gauge que no baja.

use crate::error::Result;
use crate::wait_group::WaitGroup;
use crossbeam::channel::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone, Default)]
pub struct TaskTracker {
    live: WaitGroup,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lanza un thread con nombre. El gauge baja cuando el thread termina,
    /// también si termina en pánico.
    pub fn spawn<F, T>(&self, name: &str, f: F) -> Result<JoinHandle<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let guard = self.live.guard();
        let task = name.to_string();

        let handle = thread::Builder::new().name(task.clone()).spawn(move || {
            let _guard = guard;
            debug!(%task, "task started");
            f()
        })?;
        Ok(handle)
    }

    /// Threads lanzados que todavía no terminaron
    pub fn live(&self) -> usize {
        self.live.pending()
    }

    /// `true` si todos los threads terminaron antes de `timeout`.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let idle = self.live.wait_timeout(timeout);
        if !idle {
            warn!(live = self.live(), "tasks still running");
        }
        idle
    }
}

/// Productor que envía sin fin por un canal sin buffer. Se leen `take`
/// valores y se devuelve el receptor: mientras siga vivo, el productor queda
/// bloqueado en `send`. Soltarlo hace fallar el `send` y el thread termina.
pub fn stalled_producer(tracker: &TaskTracker, take: usize) -> Result<(Vec<u64>, Receiver<u64>)> {
    let (tx, rx) = channel::bounded::<u64>(0);

    tracker.spawn("stalled-producer", move || {
        let mut next = 0;
        while tx.send(next).is_ok() {
            next += 1;
        }
        debug!(sent = next, "receiver dropped, producer exits");
    })?;

    let taken = rx.iter().take(take).collect();
    Ok((taken, rx))
}

/// Productor que cierra su canal al terminar: el consumidor sale del bucle
/// solo y no queda ningún thread colgado.
pub fn closed_producer(tracker: &TaskTracker, count: u64) -> Result<Vec<u64>> {
    let (tx, rx) = channel::bounded::<u64>(0);

    let producer = tracker.spawn("closed-producer", move || {
        for n in 0..count {
            if tx.send(n).is_err() {
                break;
            }
        }
    })?;

    let received = rx.iter().collect();
    producer.join().map_err(|_| crate::error::LabError::WorkerPanicked)?;
    Ok(received)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stalled_producer_until_receiver_dropped() {
        let tracker = TaskTracker::new();
        let (taken, rx) = stalled_producer(&tracker, 3).unwrap();

        assert_eq!(taken, vec![0, 1, 2]);
        assert!(!tracker.wait_idle(Duration::from_millis(50)));
        assert_eq!(tracker.live(), 1);

        drop(rx);
        assert!(tracker.wait_idle(Duration::from_secs(2)));
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn test_closed_producer_leaves_nothing_behind() {
        let tracker = TaskTracker::new();
        assert_eq!(closed_producer(&tracker, 4).unwrap(), vec![0, 1, 2, 3]);
        assert!(tracker.wait_idle(Duration::from_secs(1)));
    }

    #[test]
    fn test_gauge_drops_on_panic() {
        let tracker = TaskTracker::new();
        let handle = tracker.spawn("panicky", || -> u8 { panic!("boom") }).unwrap();

        assert!(handle.join().is_err());
        assert!(tracker.wait_idle(Duration::from_secs(1)));
    }

    #[test]
    fn test_thread_is_named() {
        let tracker = TaskTracker::new();
        let handle = tracker
            .spawn("named-task", || thread::current().name().map(str::to_string))
            .unwrap();
        assert_eq!(handle.join().unwrap().as_deref(), Some("named-task"));
    }
}
