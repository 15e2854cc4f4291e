//! # Web Server
//! src/lib.rs
//!
//! Servidor web estático concurrente implementado desde cero para demostrar
//! conceptos de sistemas operativos: multiplexación de I/O con epoll,
//! thread pools, sincronización y manejo de descriptores.
//!
//! ## Arquitectura
//!
//! Un solo thread (el reactor) multiplexa la readiness de todas las
//! conexiones con epoll edge-triggered; un pool fijo de workers ejecuta el
//! trabajo bloqueante que el reactor le entrega por una cola thread-safe.
//!
//! El servidor está dividido en módulos especializados:
//! - `config`: Configuración CLI inmutable (puerto, root, workers)
//! - `pool`: Cola de trabajo bloqueante y thread pool de workers
//! - `http`: Request line, responses, status codes y content types
//! - `handler`: Procesador de requests (resolución y lectura de archivos)
//! - `server`: Reactor de epoll y ciclo de vida de conexiones
//!
//! ## Ejemplo de uso
//!
//! ```ignore
//! use web_server::config::Config;
//! use web_server::server::Server;
//!
//! let config = Config::new();
//! let mut server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("Error en el event loop");
//! ```

pub mod config;
pub mod handler;
pub mod http;
pub mod pool;
pub mod server;
