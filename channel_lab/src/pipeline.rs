//! # Pipeline de etapas
//! src/pipeline.rs
//!
//! Cada etapa corre en su propio thread, lee del canal de la etapa anterior
//! y escribe en un `mpsc::sync_channel` propio. Cuando su entrada se cierra,
//! la etapa termina y suelta su `SyncSender`, cerrando a su vez la salida.

use crate::error::{LabError, Result};
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Capacidad de los canales entre etapas intermedias
const STAGE_CAPACITY: usize = 8;

/// Salida de una etapa del pipeline, junto con los threads que la alimentan
pub struct Stage<T> {
    rx: Receiver<T>,
    handles: Vec<JoinHandle<()>>,
}

impl<T: Send + 'static> Stage<T> {
    /// Primera etapa: emite cada elemento de `iter` y cierra el canal.
    pub fn source<I>(iter: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = T> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<T>(capacity);
        let handle = thread::spawn(move || {
            for item in iter {
                if tx.send(item).is_err() {
                    // El consumidor se fue; no tiene sentido seguir
                    break;
                }
            }
            debug!("source stage closed");
        });

        Stage {
            rx,
            handles: vec![handle],
        }
    }

    /// Etapa que transforma cada elemento
    pub fn map<U, F>(self, f: F) -> Stage<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + 'static,
    {
        self.then(move |item, tx: &mpsc::SyncSender<U>| tx.send(f(item)).is_ok())
    }

    /// Etapa que deja pasar sólo los elementos que cumplen `pred`
    pub fn filter<F>(self, pred: F) -> Stage<T>
    where
        F: Fn(&T) -> bool + Send + 'static,
    {
        self.then(move |item, tx: &mpsc::SyncSender<T>| !pred(&item) || tx.send(item).is_ok())
    }

    fn then<U, F>(self, step: F) -> Stage<U>
    where
        U: Send + 'static,
        F: Fn(T, &mpsc::SyncSender<U>) -> bool + Send + 'static,
    {
        let Stage { rx, mut handles } = self;
        let (tx, next_rx) = mpsc::sync_channel::<U>(STAGE_CAPACITY);

        handles.push(thread::spawn(move || {
            for item in rx {
                if !step(item, &tx) {
                    break;
                }
            }
        }));

        Stage {
            rx: next_rx,
            handles,
        }
    }

    /// Drena la última etapa y espera a que todos los threads terminen.
    pub fn collect(self) -> Result<Vec<T>> {
        let items: Vec<T> = self.rx.iter().collect();
        for handle in self.handles {
            handle.join().map_err(|_| LabError::WorkerPanicked)?;
        }
        Ok(items)
    }
}

/// generar → elevar al cuadrado → quedarse con los pares → raíz cuadrada
///
/// ```
/// let roots = channel_lab::pipeline::square_even_roots(1..=10).unwrap();
/// assert_eq!(roots, vec![2.0, 4.0, 6.0, 8.0, 10.0]);
/// ```
pub fn square_even_roots<I>(nums: I) -> Result<Vec<f64>>
where
    I: IntoIterator<Item = i64> + Send + 'static,
{
    Stage::source(nums, STAGE_CAPACITY)
        .map(|n| n * n)
        .filter(|sq| sq % 2 == 0)
        .map(|sq| (sq as f64).sqrt())
        .collect()
}
