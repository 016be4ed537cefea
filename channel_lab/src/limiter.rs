//! # Límite de conexiones concurrentes
//! src/limiter.rs
//!
//! Un canal acotado funciona como semáforo: cada permiso ocupa un lugar del
//! buffer y lo libera al soltarse.

use crate::error::{LabError, Result};
use crossbeam::channel::{self, Receiver, Sender};
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct ConnectionLimiter {
    slots: Sender<()>,
    release: Receiver<()>,
}

/// Lugar ocupado en el limitador mientras esté vivo
pub struct Permit {
    release: Receiver<()>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        let _ = self.release.try_recv();
    }
}

impl ConnectionLimiter {
    pub fn new(max: usize) -> Result<Self> {
        if max == 0 {
            return Err(LabError::ZeroLimit);
        }
        let (slots, release) = channel::bounded(max);
        Ok(ConnectionLimiter { slots, release })
    }

    /// Bloquea hasta que haya un lugar libre.
    pub fn acquire(&self) -> Result<Permit> {
        self.slots.send(()).map_err(|_| LabError::PoolClosed)?;
        Ok(self.permit())
    }

    /// `None` si todos los lugares están ocupados
    pub fn try_acquire(&self) -> Option<Permit> {
        self.slots.try_send(()).ok().map(|()| self.permit())
    }

    fn permit(&self) -> Permit {
        Permit {
            release: self.release.clone(),
        }
    }

    pub fn in_use(&self) -> usize {
        self.slots.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionReport {
    pub handled: usize,
    /// Máximo de conexiones atendidas a la vez
    pub peak: usize,
}

/// Lanza `connections` threads que compiten por `max` lugares y simulan
/// trabajo con un retardo aleatorio.
pub fn connection_benchmark(max: usize, connections: usize) -> Result<ConnectionReport> {
    let limiter = ConnectionLimiter::new(max)?;
    let active = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);
    let handled = AtomicUsize::new(0);

    thread::scope(|s| -> Result<()> {
        let handles: Vec<_> = (0..connections)
            .map(|id| {
                let (limiter, active, peak, handled) = (&limiter, &active, &peak, &handled);
                s.spawn(move || -> Result<()> {
                    let permit = limiter.acquire()?;
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);

                    thread::sleep(Duration::from_millis(rand::thread_rng().gen_range(0..10)));
                    debug!(connection = id, "connection handled");

                    active.fetch_sub(1, Ordering::SeqCst);
                    handled.fetch_add(1, Ordering::SeqCst);
                    drop(permit);
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            handle.join().map_err(|_| LabError::WorkerPanicked)??;
        }
        Ok(())
    })?;

    Ok(ConnectionReport {
        handled: handled.into_inner(),
        peak: peak.into_inner(),
    })
}
