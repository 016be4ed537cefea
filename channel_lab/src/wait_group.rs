//! # WaitGroup
//! src/wait_group.rs
//!
//! Contador compartido de tareas pendientes: `add` lo incrementa, `done` lo
//! decrementa y `wait` bloquea hasta que llega a cero.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Clone, Default)]
pub struct WaitGroup {
    inner: Arc<(Mutex<usize>, Condvar)>,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, n: usize) {
        let (count, _) = &*self.inner;
        *count.lock().unwrap_or_else(|p| p.into_inner()) += n;
    }

    /// # Panics
    ///
    /// Si se llama más veces que las sumadas con `add`.
    pub fn done(&self) {
        let (count, cvar) = &*self.inner;
        let mut count = count.lock().unwrap_or_else(|p| p.into_inner());
        assert!(*count > 0, "WaitGroup::done called more times than add");
        *count -= 1;
        if *count == 0 {
            cvar.notify_all();
        }
    }

    /// Tareas todavía pendientes
    pub fn pending(&self) -> usize {
        *self.inner.0.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Bloquea hasta que el contador llegue a cero. Con cero vuelve enseguida.
    pub fn wait(&self) {
        let (count, cvar) = &*self.inner;
        let guard = count.lock().unwrap_or_else(|p| p.into_inner());
        let _guard = cvar
            .wait_while(guard, |pending| *pending > 0)
            .unwrap_or_else(|p| p.into_inner());
    }

    /// Como `wait`, pero se rinde después de `timeout`. Devuelve `true` si el
    /// contador llegó a cero.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let (count, cvar) = &*self.inner;
        let mut guard = count.lock().unwrap_or_else(|p| p.into_inner());

        while *guard > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            guard = cvar
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(|p| p.into_inner())
                .0;
        }
        true
    }

    /// Suma una tarea y devuelve un guard que la da por terminada al soltarse,
    /// aunque el thread entre en pánico.
    pub fn guard(&self) -> WaitGuard {
        self.add(1);
        WaitGuard { wg: self.clone() }
    }
}

#[must_use = "dropping the guard marks the task as done immediately"]
pub struct WaitGuard {
    wg: WaitGroup,
}

impl Drop for WaitGuard {
    fn drop(&mut self) {
        self.wg.done();
    }
}
