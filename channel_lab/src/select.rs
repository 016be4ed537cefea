//! # Select sobre varios canales
//! src/select.rs
//!
//! Carreras entre fuentes con distinto retardo, recepción no bloqueante y
//! un productor que se detiene ante una señal de fin.

use crossbeam::channel::{self, Receiver, Select, Sender, TryRecvError};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Evento observado en una ronda de `race`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceEvent {
    Arrived(String),
    Timeout,
}

/// Cada fuente manda su etiqueta después de su retardo. Se hacen
/// `sources.len()` rondas; en cada una gana la primera fuente pendiente que
/// llega, o `Timeout` si ninguna llega dentro de `timeout`.
///
/// ```
/// use channel_lab::select::{race, RaceEvent};
/// use std::time::Duration;
///
/// let events = race(
///     vec![("slow".into(), Duration::from_millis(60)), ("fast".into(), Duration::from_millis(5))],
///     Duration::from_secs(1),
/// );
/// assert_eq!(events[0], RaceEvent::Arrived("fast".into()));
/// ```
pub fn race(sources: Vec<(String, Duration)>, timeout: Duration) -> Vec<RaceEvent> {
    let rounds = sources.len();
    let mut pending: Vec<Receiver<String>> = sources
        .into_iter()
        .map(|(label, delay)| {
            let (tx, rx) = channel::bounded(1);
            thread::spawn(move || {
                thread::sleep(delay);
                // El receptor pudo haberse descartado tras un timeout
                let _ = tx.send(label);
            });
            rx
        })
        .collect();

    let mut events = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        if pending.is_empty() {
            break;
        }

        let selected = {
            let mut sel = Select::new();
            for rx in &pending {
                sel.recv(rx);
            }
            match sel.select_timeout(timeout) {
                Ok(op) => {
                    let index = op.index();
                    Some((index, op.recv(&pending[index])))
                }
                Err(_) => None,
            }
        };

        match selected {
            Some((index, Ok(label))) => {
                debug!(%label, "source arrived");
                events.push(RaceEvent::Arrived(label));
                pending.swap_remove(index);
            }
            // La fuente terminó sin enviar
            Some((index, Err(_))) => {
                events.push(RaceEvent::Timeout);
                pending.swap_remove(index);
            }
            None => events.push(RaceEvent::Timeout),
        }
    }
    events
}

/// Recepción no bloqueante: `None` si no hay nada listo todavía.
pub fn try_take<T>(rx: &Receiver<T>) -> Option<T> {
    match rx.try_recv() {
        Ok(value) => Some(value),
        Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
    }
}

/// Envía `0, 1, 2, ...` hasta `limit` valores, eligiendo en cada paso entre
/// enviar el siguiente y atender `done`. Devuelve cuántos se enviaron.
///
/// Un mensaje o la desconexión de `done` detienen al productor, igual que la
/// desconexión del receptor de `tx`.
pub fn produce_until_done(tx: &Sender<u64>, done: &Receiver<()>, limit: u64) -> u64 {
    let mut sent = 0;
    while sent < limit {
        crossbeam::select! {
            send(tx, sent) -> res => {
                if res.is_err() {
                    break;
                }
                sent += 1;
            }
            recv(done) -> _ => {
                debug!(sent, "producer told to stop");
                break;
            }
        }
    }
    sent
}
