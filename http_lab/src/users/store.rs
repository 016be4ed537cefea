//! # Store de usuarios
//! src/users/store.rs
//!
//! Usuarios en memoria detrás de un `RwLock`: muchas lecturas concurrentes
//! (`GET /users/{id}`) y escrituras exclusivas (`POST /users`). Los ids
//! salen de un contador monotónico y nunca se reutilizan.

use super::model::{NewUser, User};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct StoreData {
    users: BTreeMap<u64, User>,
    next_id: u64,
}

#[derive(Default)]
pub struct UserStore {
    inner: RwLock<StoreData>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreData {
                users: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Store con los tres usuarios de ejemplo
    ///
    /// El usuario 1 puede hacer login con `password123`.
    pub fn seeded() -> Self {
        let store = Self::new();
        store.insert(NewUser::new("张三", "zhangsan@example.com").with_password("password123"));
        store.insert(NewUser::new("李四", "lisi@example.com"));
        store.insert(NewUser::new("王五", "wangwu@example.com"));
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreData> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreData> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Inserta un usuario nuevo y devuelve la copia almacenada
    pub fn insert(&self, new_user: NewUser) -> User {
        let mut data = self.write();
        // Un store creado con Default arranca en 0
        data.next_id = data.next_id.max(1);
        let id = data.next_id;
        data.next_id += 1;

        let user = User {
            id,
            name: new_user.name,
            email: new_user.email,
            password: new_user.password,
        };
        data.users.insert(id, user.clone());
        user
    }

    pub fn get(&self, id: u64) -> Option<User> {
        self.read().users.get(&id).cloned()
    }

    /// Busca por email y contraseña
    pub fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        self.read()
            .users
            .values()
            .find(|user| user.email == email && user.password.as_deref() == Some(password))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
