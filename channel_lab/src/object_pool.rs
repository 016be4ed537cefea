//! # Pool de objetos
//! src/object_pool.rs
//!
//! Objetos caros de crear se guardan en un canal acotado. `get` toma uno
//! libre sin bloquear o crea uno nuevo; `put` lo devuelve si queda lugar y
//! si no lo descarta.

use crossbeam::channel::{self, Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub created: usize,
    pub reused: usize,
    pub discarded: usize,
    pub idle: usize,
}

pub struct ObjectPool<T> {
    tx: Sender<T>,
    rx: Receiver<T>,
    make: Box<dyn Fn() -> T + Send + Sync>,
    created: AtomicUsize,
    reused: AtomicUsize,
    discarded: AtomicUsize,
}

impl<T> ObjectPool<T> {
    /// Crea el pool y lo llena con `capacity` objetos.
    pub fn new<F>(capacity: usize, make: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let (tx, rx) = channel::bounded(capacity);
        let pool = ObjectPool {
            tx,
            rx,
            make: Box::new(make),
            created: AtomicUsize::new(0),
            reused: AtomicUsize::new(0),
            discarded: AtomicUsize::new(0),
        };
        for _ in 0..capacity {
            let object = pool.create();
            pool.put(object);
        }
        pool
    }

    fn create(&self) -> T {
        self.created.fetch_add(1, Ordering::Relaxed);
        (self.make)()
    }

    pub fn get(&self) -> T {
        match self.rx.try_recv() {
            Ok(object) => {
                self.reused.fetch_add(1, Ordering::Relaxed);
                object
            }
            Err(_) => self.create(),
        }
    }

    /// `false` si el pool estaba lleno y el objeto se descartó
    pub fn put(&self, object: T) -> bool {
        match self.tx.try_send(object) {
            Ok(()) => true,
            Err(_) => {
                self.discarded.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.created.load(Ordering::Relaxed),
            reused: self.reused.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            idle: self.rx.len(),
        }
    }
}

/// Buffer de 1 KB usado por la demostración
pub fn reuse_buffers(iterations: usize, capacity: usize) -> PoolStats {
    let pool = ObjectPool::new(capacity, || vec![0u8; 1024]);
    for i in 0..iterations {
        let mut buffer = pool.get();
        buffer[0] = (i % 256) as u8;
        pool.put(buffer);
    }
    pool.stats()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_sequential_use_never_allocates_again() {
        let stats = reuse_buffers(1000, 10);
        assert_eq!(stats.created, 10);
        assert_eq!(stats.reused, 1000);
        assert_eq!(stats.discarded, 0);
        assert_eq!(stats.idle, 10);
    }

    #[test]
    fn test_empty_pool_creates_and_full_pool_discards() {
        let pool = ObjectPool::new(1, || 0u32);
        let a = pool.get();
        let b = pool.get();
        assert_eq!(pool.stats().created, 2);

        assert!(pool.put(a));
        assert!(!pool.put(b));
        assert_eq!(pool.stats().discarded, 1);
    }

    #[test]
    fn test_concurrent_borrowers() {
        let pool = ObjectPool::new(8, || String::with_capacity(64));
        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        let object = pool.get();
                        pool.put(object);
                    }
                });
            }
        });

        let stats = pool.stats();
        assert_eq!(stats.reused + stats.created - 8, 400);
        assert_eq!(stats.idle, 8);
    }
}
