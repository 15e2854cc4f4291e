//! # Cola de Trabajo Bloqueante
//! src/pool/queue.rs
//!
//! Implementa una cola FIFO thread-safe sin límite de capacidad, con una
//! señal explícita de deshabilitación para el shutdown del pool.
//!
//! ## Semántica de `disable`
//!
//! Deshabilitar la cola detiene los `put` nuevos y despierta de inmediato a
//! todos los `get` bloqueados, **abandonando** los items que quedaron
//! encolados sin entregar. Esta política calza con el join-on-shutdown del
//! pool: no hay que esperar a drenar la cola para terminar los workers.
//! El pool reporta cuántos items quedaron abandonados (ver `pool/mod.rs`).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};

/// Cola FIFO bloqueante con señal de deshabilitación
pub struct WorkQueue<T> {
    /// Items pendientes, en orden de llegada
    items: Mutex<VecDeque<T>>,

    /// Condvar para despertar a consumidores bloqueados
    condvar: Condvar,

    /// Flag de deshabilitación (una vez true, nunca vuelve a false)
    disabled: AtomicBool,
}

impl<T> WorkQueue<T> {
    /// Crea una cola vacía y habilitada
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            disabled: AtomicBool::new(false),
        }
    }

    /// Encola un item y despierta a un consumidor
    ///
    /// Nunca bloquea (la cola no tiene límite de capacidad).
    ///
    /// Retorna `false` si la cola está deshabilitada; en ese caso el item
    /// se descarta.
    pub fn put(&self, item: T) -> bool {
        if self.disabled() {
            return false;
        }

        let mut items = self.items.lock().unwrap();
        items.push_back(item);

        self.condvar.notify_one();

        true
    }

    /// Desencola el item más antiguo, bloqueando hasta que haya uno
    ///
    /// Retorna `None` si la cola está deshabilitada (aunque queden items:
    /// política de abandono, ver docs del módulo). El flag se re-verifica
    /// después de cada despertar, así que un despertar espurio nunca
    /// entrega un item inexistente ni pierde la señal de shutdown.
    pub fn get(&self) -> Option<T> {
        let mut items = self.items.lock().unwrap();

        loop {
            if self.disabled() {
                return None;
            }

            if let Some(item) = items.pop_front() {
                return Some(item);
            }

            items = self.condvar.wait(items).unwrap();
        }
    }

    /// Intenta desencolar sin bloquear
    pub fn try_get(&self) -> Option<T> {
        if self.disabled() {
            return None;
        }

        let mut items = self.items.lock().unwrap();
        items.pop_front()
    }

    /// Deshabilita la cola y despierta a todos los consumidores
    ///
    /// Idempotente. Se toma el mutex antes de notificar para serializar
    /// con consumidores que están entre la verificación del flag y el
    /// wait (si no, esa notificación podría perderse).
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);

        let _items = self.items.lock().unwrap();
        self.condvar.notify_all();
    }

    /// Verifica si la cola está deshabilitada
    pub fn disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    /// Retorna el número de items pendientes
    pub fn len(&self) -> usize {
        let items = self.items.lock().unwrap();
        items.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
