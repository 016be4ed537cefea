//! # Errores
//! src/error.rs
//!
//! Errores tipados de los pools, contextos y patrones del laboratorio.

use thiserror::Error;

/// Motivo por el que un `Context` terminó
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Error)]
pub enum LabError {
    #[error("worker pool is closed")]
    PoolClosed,

    #[error("worker pool needs at least one worker")]
    NoWorkers,

    #[error("connection limit must be at least 1")]
    ZeroLimit,

    #[error(transparent)]
    Context(#[from] ContextError),

    /// El proxy detectó mercadería falsa antes de comprar
    #[error("counterfeit goods: {item}")]
    Counterfeit { item: String },

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("insufficient funds: balance {balance:.2}, requested {requested:.2}")]
    InsufficientFunds { balance: f64, requested: f64 },

    #[error("no payment strategy selected")]
    NoPaymentStrategy,

    #[error("worker thread panicked")]
    WorkerPanicked,

    #[error("failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LabError>;
