//! # Thread Pool de Workers
//! src/pool/mod.rs
//!
//! Pool de tamaño fijo que ejecuta items de trabajo tomados de una
//! `WorkQueue` compartida. Cada worker corre un loop simple:
//!
//! ```text
//! get() → ejecutar item → repetir
//! ```
//!
//! Cuando la cola se deshabilita, `get()` retorna `None` y el worker
//! termina. Un panic dentro de un item se captura en la frontera del item
//! (`catch_unwind`): se loguea y el worker sigue vivo. Así una request que
//! falla nunca tumba al resto del pool.

pub mod queue;

pub use queue::WorkQueue;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

/// Unidad de trabajo diferido
///
/// Captura por valor todo lo que necesita (descriptor, buffer). Una vez
/// encolado, el ownership de esos recursos pasa al worker que lo ejecute.
pub type WorkItem = Box<dyn FnOnce() + Send + 'static>;

/// Pool de workers de tamaño fijo
pub struct ThreadPool {
    /// Cola compartida con todos los workers
    queue: Arc<WorkQueue<WorkItem>>,

    /// Handles de los threads, para el join en el Drop
    workers: Vec<thread::JoinHandle<()>>,
}

impl ThreadPool {
    /// Crea el pool y arranca `workers` threads
    ///
    /// # Panics
    ///
    /// Si `workers` es 0 (la configuración lo valida antes).
    pub fn new(workers: usize) -> Self {
        assert!(workers >= 1, "thread pool requires at least one worker");

        let queue = Arc::new(WorkQueue::new());

        let workers = (0..workers)
            .map(|i| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || Self::worker_loop(i, queue))
            })
            .collect();

        Self { queue, workers }
    }

    /// Loop principal de cada worker
    fn worker_loop(id: usize, queue: Arc<WorkQueue<WorkItem>>) {
        println!("🔧 Worker {} started", id);

        while let Some(item) = queue.get() {
            // Aislar fallas por item: un panic no termina el worker
            if panic::catch_unwind(AssertUnwindSafe(item)).is_err() {
                eprintln!("   ❌ Worker {}: un item hizo panic, el worker continúa", id);
            }
        }

        println!("🔧 Worker {} stopped", id);
    }

    /// Encola un item para ejecución diferida
    ///
    /// Retorna `false` si el pool ya fue deshabilitado (el item se descarta).
    pub fn execute<F>(&self, f: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.put(Box::new(f))
    }

    /// Deshabilita la cola: no se aceptan más items y los workers
    /// terminan al despertar
    pub fn disable(&self) {
        self.queue.disable();
    }

    /// Retorna el número de items pendientes en la cola
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Drop for ThreadPool {
    /// Deshabilita la cola y espera a que todos los workers terminen
    ///
    /// Los items que quedaron encolados sin entregar se abandonan; si hay
    /// alguno, se reporta la cantidad.
    fn drop(&mut self) {
        self.queue.disable();

        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }

        let abandoned = self.queue.len();
        if abandoned > 0 {
            eprintln!("   ⚠️  Thread pool: {} items abandonados en el shutdown", abandoned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_pool_executes_items() {
        let pool = ThreadPool::new(2);
        let (tx, rx) = mpsc::channel();

        for i in 0..10 {
            let tx = tx.clone();
            assert!(pool.execute(move || {
                tx.send(i).unwrap();
            }));
        }

        let mut received: Vec<i32> = (0..10)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        received.sort();

        assert_eq!(received, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_execute_after_disable_fails() {
        let pool = ThreadPool::new(1);
        pool.disable();

        assert!(!pool.execute(|| {}));
    }

    #[test]
    fn test_panicking_item_does_not_kill_worker() {
        let pool = ThreadPool::new(1);
        let (tx, rx) = mpsc::channel();

        assert!(pool.execute(|| panic!("boom")));
        assert!(pool.execute(move || {
            tx.send(42).unwrap();
        }));

        // El item posterior al panic se ejecuta en el mismo worker
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 42);
    }

    #[test]
    fn test_drop_with_queued_items_terminates() {
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let pool = ThreadPool::new(2);

            for _ in 0..50 {
                let counter = Arc::clone(&counter);
                pool.execute(move || {
                    thread::sleep(Duration::from_millis(5));
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }

            // El drop deshabilita y hace join sin colgarse, abandonando
            // lo que quede sin entregar
        }

        // Al menos algún item pudo haberse ejecutado, pero nunca más de 50
        assert!(counter.load(Ordering::SeqCst) <= 50);
    }

    #[test]
    fn test_workers_terminate_on_disable() {
        let pool = ThreadPool::new(4);
        pool.disable();

        // El drop hace join de los 4 workers; si no terminaran, el test
        // se colgaría
        drop(pool);
    }
}
