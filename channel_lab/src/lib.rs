//! # Channel Lab
//! src/lib.rs
//!
//! Demostraciones de primitivas de concurrencia sobre threads del sistema:
//! canales, pipelines, worker pools, select, contextos de cancelación,
//! wait groups, detección de threads colgados y estado compartido. Incluye
//! además algunos patrones de diseño clásicos expresados con traits.
//!
//! ## Módulos
//!
//! - `fanout`: un productor y varios receptores sobre un canal acotado
//! - `pipeline`: etapas encadenadas con `mpsc::sync_channel`
//! - `worker_pool`: cola de trabajos compartida y reporte por worker
//! - `select`: carreras con timeout y productores cancelables
//! - `context`: árbol de cancelación con deadlines y valores
//! - `wait_group`: espera a que terminen N tareas
//! - `leak`: gauge de threads vivos
//! - `object_pool`: reutilización de objetos sobre un canal acotado
//! - `limiter`: máximo de conexiones concurrentes
//! - `shared_state`: `Mutex`, atómicos, `RwLock` y `Once`
//! - `patterns`: observer, proxy, singleton, strategy, decorator, builder,
//!   composite, command y fábricas

pub mod context;
pub mod error;
pub mod fanout;
pub mod leak;
pub mod limiter;
pub mod object_pool;
pub mod patterns;
pub mod pipeline;
pub mod select;
pub mod shared_state;
pub mod telemetry;
pub mod wait_group;
pub mod worker_pool;
