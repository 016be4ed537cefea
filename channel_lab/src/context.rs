//! # Context
//! src/context.rs
//!
//! Árbol de contextos para cancelación cooperativa. Cada contexto conoce a
//! su padre (referencia fuerte) y a sus hijos (referencias débiles); al
//! cancelarse, marca su error, cierra su canal `done` y cancela a todos sus
//! descendientes con el mismo error.
//!
//! Reglas:
//! - un hijo de un contexto ya terminado nace terminado
//! - el deadline de un hijo nunca supera al del padre
//! - cancelar dos veces no tiene efecto
//!
//! ```
//! use channel_lab::context::Context;
//! use channel_lab::error::ContextError;
//!
//! let (parent, cancel) = Context::with_cancel(&Context::background());
//! let child = Context::with_value(&parent, "request_id", 42u32);
//!
//! cancel.cancel();
//! assert_eq!(child.err(), Some(ContextError::Canceled));
//! assert_eq!(child.value::<u32>("request_id").as_deref(), Some(&42));
//! ```

use crate::error::{ContextError, Result};
use crossbeam::channel::{self, Receiver, Sender};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, Weak};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

type Value = (&'static str, Arc<dyn Any + Send + Sync>);

struct State {
    err: Option<ContextError>,
    children: Vec<Weak<Inner>>,
    /// Nunca se usa para enviar; soltarlo desconecta a los receptores
    done_tx: Option<Sender<()>>,
    done_rx: Receiver<()>,
}

struct Inner {
    parent: Option<Context>,
    state: Mutex<State>,
    cvar: Condvar,
    deadline: Option<Instant>,
    value: Option<Value>,
}

#[derive(Clone)]
pub struct Context(Arc<Inner>);

/// Permite cancelar el contexto creado junto con él
#[derive(Clone)]
pub struct CancelHandle(Context);

impl CancelHandle {
    /// Cancela el contexto y sus descendientes. Idempotente.
    pub fn cancel(&self) {
        self.0.cancel(ContextError::Canceled);
    }
}

impl Context {
    fn node(parent: Option<Context>, deadline: Option<Instant>, value: Option<Value>) -> Self {
        let (done_tx, done_rx) = channel::bounded(0);
        Context(Arc::new(Inner {
            parent,
            state: Mutex::new(State {
                err: None,
                children: Vec::new(),
                done_tx: Some(done_tx),
                done_rx,
            }),
            cvar: Condvar::new(),
            deadline,
            value,
        }))
    }

    /// Raíz del árbol: nunca se cancela ni tiene deadline.
    pub fn background() -> Self {
        Self::node(None, None, None)
    }

    pub fn with_cancel(parent: &Context) -> (Context, CancelHandle) {
        let ctx = Self::child(parent, parent.deadline(), None);
        (ctx.clone(), CancelHandle(ctx))
    }

    pub fn with_timeout(parent: &Context, timeout: Duration) -> (Context, CancelHandle) {
        Self::with_deadline(parent, Instant::now() + timeout)
    }

    pub fn with_deadline(parent: &Context, deadline: Instant) -> (Context, CancelHandle) {
        let effective = match parent.deadline() {
            Some(inherited) if inherited <= deadline => inherited,
            _ => deadline,
        };
        let ctx = Self::child(parent, Some(effective), None);

        // Si el deadline es el del padre, su timer ya nos cancela
        if parent.deadline() != Some(effective) && ctx.err().is_none() {
            ctx.arm_timer(effective);
        }
        (ctx.clone(), CancelHandle(ctx))
    }

    /// Hijo que agrega un valor; se cancela sólo a través de su padre.
    pub fn with_value<T>(parent: &Context, key: &'static str, value: T) -> Context
    where
        T: Any + Send + Sync,
    {
        Self::child(parent, parent.deadline(), Some((key, Arc::new(value))))
    }

    fn child(parent: &Context, deadline: Option<Instant>, value: Option<Value>) -> Context {
        let ctx = Self::node(Some(parent.clone()), deadline, value);

        let parent_err = {
            let mut state = parent.lock();
            if state.err.is_none() {
                state.children.retain(|child| child.strong_count() > 0);
                state.children.push(Arc::downgrade(&ctx.0));
            }
            state.err
        };

        // `parent.err()` además revisa un deadline vencido que nadie disparó
        if let Some(err) = parent_err.or_else(|| parent.err()) {
            ctx.cancel(err);
        }
        ctx
    }

    fn arm_timer(&self, deadline: Instant) {
        let weak = Arc::downgrade(&self.0);
        let done = self.done();

        thread::spawn(move || {
            let timer = channel::at(deadline);
            crossbeam::select! {
                recv(done) -> _ => {}
                recv(timer) -> _ => {
                    if let Some(inner) = weak.upgrade() {
                        Context(inner).cancel(ContextError::DeadlineExceeded);
                    }
                }
            }
        });
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.0.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn cancel(&self, err: ContextError) {
        let children = {
            let mut state = self.lock();
            if state.err.is_some() {
                return;
            }
            state.err = Some(err);
            state.done_tx.take();
            self.0.cvar.notify_all();
            std::mem::take(&mut state.children)
        };
        debug!(%err, children = children.len(), "context done");

        for child in children.iter().filter_map(Weak::upgrade) {
            Context(child).cancel(err);
        }
    }

    /// `None` mientras el contexto siga vivo.
    pub fn err(&self) -> Option<ContextError> {
        if let Some(err) = self.lock().err {
            return Some(err);
        }
        match self.0.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.cancel(ContextError::DeadlineExceeded);
                self.lock().err
            }
            _ => None,
        }
    }

    /// `Ok` si el trabajo puede seguir; pensado para usarse con `?`.
    pub fn check(&self) -> Result<()> {
        match self.err() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.0.deadline
    }

    /// Busca `key` en este contexto y luego en sus ancestros.
    pub fn value<T>(&self, key: &str) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let mut current = Some(self);
        while let Some(ctx) = current {
            if let Some((k, v)) = &ctx.0.value {
                if *k == key {
                    return Arc::clone(v).downcast::<T>().ok();
                }
            }
            current = ctx.0.parent.as_ref();
        }
        None
    }

    /// Receptor que se desconecta cuando el contexto termina; sirve como
    /// rama de `select!`.
    pub fn done(&self) -> Receiver<()> {
        self.lock().done_rx.clone()
    }

    /// Bloquea hasta que el contexto termine. Sobre `background` no vuelve nunca.
    pub fn wait(&self) -> ContextError {
        loop {
            if let Some(err) = self.wait_timeout(Duration::from_secs(1)) {
                return err;
            }
        }
    }

    pub fn wait_timeout(&self, timeout: Duration) -> Option<ContextError> {
        let limit = match self.0.deadline {
            Some(deadline) => timeout.min(deadline.saturating_duration_since(Instant::now())),
            None => timeout,
        };

        let state = self.lock();
        let (state, _) = self
            .0
            .cvar
            .wait_timeout_while(state, limit, |state| state.err.is_none())
            .unwrap_or_else(|p| p.into_inner());
        drop(state);

        self.err()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("deadline", &self.0.deadline)
            .field("err", &self.lock().err)
            .finish()
    }
}

/// Cómo terminó un worker de `ticker`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerExit {
    pub ticks: u64,
    pub reason: ContextError,
}

/// Cuenta un tick cada `interval` hasta que `ctx` termine.
pub fn ticker(ctx: &Context, interval: Duration) -> TickerExit {
    let done = ctx.done();
    let mut ticks = 0;
    loop {
        crossbeam::select! {
            recv(done) -> _ => break,
            default(interval) => ticks += 1,
        }
    }

    TickerExit {
        ticks,
        reason: ctx.err().unwrap_or(ContextError::Canceled),
    }
}

/// Arranca `workers` tickers bajo un mismo contexto y los cancela juntos
/// después de `after`.
pub fn cancel_workers(workers: usize, after: Duration) -> Vec<TickerExit> {
    let (ctx, cancel) = Context::with_cancel(&Context::background());

    thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|id| {
                let ctx = Context::with_value(&ctx, "worker", id);
                s.spawn(move || ticker(&ctx, Duration::from_millis(5)))
            })
            .collect();

        thread::sleep(after);
        cancel.cancel();

        handles
            .into_iter()
            .filter_map(|h| h.join().ok())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabError;

    #[test]
    fn test_background_is_never_done() {
        let ctx = Context::background();
        assert_eq!(ctx.err(), None);
        assert_eq!(ctx.deadline(), None);
        assert_eq!(ctx.wait_timeout(Duration::from_millis(10)), None);
    }

    #[test]
    fn test_cancel_propagates_to_descendants() {
        let (parent, cancel) = Context::with_cancel(&Context::background());
        let (child, _) = Context::with_cancel(&parent);
        let grandchild = Context::with_value(&child, "k", "v");

        cancel.cancel();
        cancel.cancel();

        assert_eq!(parent.err(), Some(ContextError::Canceled));
        assert_eq!(child.err(), Some(ContextError::Canceled));
        assert_eq!(grandchild.err(), Some(ContextError::Canceled));
        assert!(grandchild.done().recv().is_err());
    }

    #[test]
    fn test_child_cancel_does_not_touch_parent() {
        let (parent, _keep) = Context::with_cancel(&Context::background());
        let (child, cancel) = Context::with_cancel(&parent);

        cancel.cancel();
        assert!(child.is_done());
        assert!(!parent.is_done());
    }

    #[test]
    fn test_child_of_done_parent_is_born_done() {
        let (parent, cancel) = Context::with_cancel(&Context::background());
        cancel.cancel();

        let (child, _) = Context::with_timeout(&parent, Duration::from_secs(60));
        assert_eq!(child.err(), Some(ContextError::Canceled));
    }

    #[test]
    fn test_timeout_expires() {
        let (ctx, _cancel) = Context::with_timeout(&Context::background(), Duration::from_millis(20));
        assert_eq!(ctx.wait(), ContextError::DeadlineExceeded);
        assert!(ctx.done().recv().is_err());
    }

    #[test]
    fn test_timer_cancels_descendants() {
        let (ctx, _cancel) = Context::with_timeout(&Context::background(), Duration::from_millis(20));
        let (child, _) = Context::with_cancel(&ctx);

        assert_eq!(
            child.done().recv_timeout(Duration::from_secs(2)),
            Err(channel::RecvTimeoutError::Disconnected)
        );
        assert_eq!(child.err(), Some(ContextError::DeadlineExceeded));
    }

    #[test]
    fn test_child_deadline_never_exceeds_parent() {
        let (parent, _p) = Context::with_timeout(&Context::background(), Duration::from_millis(50));
        let (child, _c) = Context::with_timeout(&parent, Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());

        let (shorter, _s) = Context::with_timeout(&parent, Duration::from_millis(1));
        assert!(shorter.deadline() < parent.deadline());
    }

    #[test]
    fn test_past_deadline_is_done_immediately() {
        let (ctx, _) = Context::with_deadline(&Context::background(), Instant::now());
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
    }

    #[test]
    fn test_values_are_inherited_and_typed() {
        let root = Context::with_value(&Context::background(), "user", String::from("ana"));
        let (child, _) = Context::with_cancel(&root);
        let leaf = Context::with_value(&child, "attempt", 3u8);

        assert_eq!(leaf.value::<String>("user").as_deref().map(String::as_str), Some("ana"));
        assert_eq!(leaf.value::<u8>("attempt").as_deref(), Some(&3));
        assert!(leaf.value::<u32>("attempt").is_none());
        assert!(root.value::<u8>("attempt").is_none());
    }

    #[test]
    fn test_check_converts_into_lab_error() {
        let (ctx, cancel) = Context::with_cancel(&Context::background());
        assert!(ctx.check().is_ok());
        cancel.cancel();
        assert!(matches!(
            ctx.check(),
            Err(LabError::Context(ContextError::Canceled))
        ));
    }

    #[test]
    fn test_cancel_workers() {
        let exits = cancel_workers(3, Duration::from_millis(30));
        assert_eq!(exits.len(), 3);
        assert!(exits.iter().all(|e| e.reason == ContextError::Canceled));
    }
}
