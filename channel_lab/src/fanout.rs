//! # Fan-out sobre canales
//! src/fanout.rs
//!
//! Un productor reparte items entre varios receptores que comparten el mismo
//! canal acotado. Cada receptor consume hasta que el canal se cierra.

use crate::error::{LabError, Result};
use crossbeam::channel::{self, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Reparte `items` entre `receivers` threads y devuelve cuántos procesó cada uno.
///
/// El productor cierra el canal (suelta el `Sender`) después del último item,
/// y todos los receptores terminan cuando lo drenan. La suma de los conteos es
/// siempre `items.len()`.
///
/// ```
/// let counts = channel_lab::fanout::fan_out(3, (0..30).collect(), |_, _: i32| {}).unwrap();
/// assert_eq!(counts.iter().sum::<usize>(), 30);
/// ```
pub fn fan_out<T, F>(receivers: usize, items: Vec<T>, handler: F) -> Result<Vec<usize>>
where
    T: Send,
    F: Fn(usize, T) + Sync,
{
    if receivers == 0 {
        return Err(LabError::NoWorkers);
    }

    let (tx, rx) = channel::bounded::<T>(receivers);
    let handler = &handler;

    thread::scope(|s| {
        let handles: Vec<_> = (0..receivers)
            .map(|id| {
                let rx = rx.clone();
                s.spawn(move || {
                    let mut count = 0;
                    // recv falla sólo cuando el canal está vacío y cerrado
                    while let Ok(item) = rx.recv() {
                        handler(id, item);
                        count += 1;
                    }
                    debug!(receiver = id, count, "receiver finished");
                    count
                })
            })
            .collect();
        drop(rx);

        for item in items {
            if tx.send(item).is_err() {
                break;
            }
        }
        drop(tx);

        handles
            .into_iter()
            .map(|h| h.join().map_err(|_| LabError::WorkerPanicked))
            .collect()
    })
}

/// Resultado de un intercambio por un canal sin buffer
#[derive(Debug, PartialEq)]
pub struct PingOutcome<T> {
    pub value: T,
    /// El `send` no volvió antes de que el receptor llegara al `recv`
    pub sender_waited: bool,
}

/// Envía `value` por un canal de capacidad cero (rendezvous).
///
/// El receptor tarda un poco en llegar al `recv`; el emisor queda bloqueado
/// en `send` hasta entonces.
pub fn ping<T: Send>(value: T) -> Result<PingOutcome<T>> {
    let (tx, rx) = channel::bounded::<T>(0);
    let receiving = AtomicBool::new(false);

    thread::scope(|s| {
        let sender = s.spawn(|| {
            let sent = tx.send(value).is_ok();
            sent && receiving.load(Ordering::SeqCst)
        });

        thread::sleep(Duration::from_millis(20));
        receiving.store(true, Ordering::SeqCst);
        let value = rx.recv().map_err(|_| LabError::WorkerPanicked)?;

        let sender_waited = sender.join().map_err(|_| LabError::WorkerPanicked)?;
        Ok(PingOutcome {
            value,
            sender_waited,
        })
    })
}

/// Llena un canal con buffer, lo cierra y lo drena.
///
/// Devuelve los valores en orden de envío y si después de drenarlo el canal
/// reportó desconexión.
pub fn drain_after_close<T>(items: Vec<T>) -> (Vec<T>, bool) {
    let (tx, rx) = channel::bounded::<T>(items.len().max(1));
    for item in items {
        // La capacidad alcanza para todos: nunca bloquea
        if tx.send(item).is_err() {
            break;
        }
    }
    drop(tx);

    let drained: Vec<T> = rx.iter().collect();
    let disconnected = matches!(rx.try_recv(), Err(TryRecvError::Disconnected));
    (drained, disconnected)
}
