//! # Multiplexor de Conexiones (Reactor)
//! src/server/mod.rs
//!
//! Un solo thread corre el event loop de epoll sobre el socket de escucha
//! y todas las conexiones aceptadas; el trabajo bloqueante (drenar accepts,
//! procesar la request, escribir la respuesta) se delega al thread pool.
//!
//! ## Ciclo de vida de una conexión
//!
//! ```text
//! accept → no bloqueante → registrada en epoll → legible →
//! bytes acumulados → hand-off al pool → worker responde y cierra
//! ```
//!
//! Cada item despachado captura por valor el descriptor y su buffer: a
//! partir del hand-off, ese worker es el único dueño de ambos. El registro
//! de conexiones nuevas desde los workers es seguro porque `epoll_ctl`
//! puede correr concurrente con `epoll_wait` (ver `poller.rs`).
//!
//! El loop es deliberadamente infinito: este es un servicio de larga vida
//! que solo termina con el proceso. Los errores por conexión se loguean y
//! cierran esa conexión, nunca tumban el loop.

pub mod poller;
pub mod socket;

use crate::config::Config;
use crate::handler::RequestProcessor;
use crate::pool::ThreadPool;
use poller::Poller;

use std::io::{self, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::os::unix::io::{AsRawFd, FromRawFd, IntoRawFd, RawFd};
use std::sync::Arc;

/// Tamaño del chunk de lectura dentro del loop de drenado
const READ_CHUNK: usize = 512;

/// Servidor web: reactor de epoll + pool de workers
pub struct Server {
    config: Arc<Config>,
    listener: Arc<TcpListener>,
    poller: Arc<Poller>,
    pool: ThreadPool,
    processor: Arc<RequestProcessor>,
}

impl Server {
    /// Prepara el servidor: bind, modo no bloqueante, epoll y pool
    ///
    /// Cualquier error acá es fatal de arranque y se propaga al caller
    /// (no hay reintentos).
    pub fn bind(config: Config) -> io::Result<Server> {
        let config = Arc::new(config);

        let listener = socket::create_and_bind(&config.address())?;

        let poller = Poller::new()?;
        poller.add(listener.as_raw_fd())?;

        let pool = ThreadPool::new(config.workers);
        let processor = Arc::new(RequestProcessor::new(Arc::clone(&config)));

        Ok(Server {
            config,
            listener: Arc::new(listener),
            poller: Arc::new(poller),
            pool,
            processor,
        })
    }

    /// Dirección local real del socket de escucha
    ///
    /// Útil con puerto 0 (efímero) en los tests.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Corre el event loop (bloquea el thread, no retorna normalmente)
    ///
    /// Solo sale con `Err` si el wait de epoll falla de forma fatal.
    pub fn run(&mut self) -> io::Result<()> {
        println!("[+] Servidor escuchando en {}", self.config.address());
        println!("[*] starting event loop...\n");

        let listen_fd = self.listener.as_raw_fd();
        let mut events =
            vec![libc::epoll_event { events: 0, u64: 0 }; self.config.max_events];

        loop {
            let count = self.poller.wait(&mut events)?;

            for event in &events[..count] {
                let fd = event.u64 as RawFd;
                let flags = event.events;

                let error = flags & (libc::EPOLLERR as u32) != 0;
                let hangup = flags & (libc::EPOLLHUP as u32) != 0;
                let readable = flags & (libc::EPOLLIN as u32) != 0;

                if error || hangup || !readable {
                    eprintln!("   ❌ epoll error en fd {}", fd);
                    socket::close_fd(fd);
                    continue;
                }

                if fd == listen_fd {
                    self.dispatch_accept();
                } else {
                    self.handle_readable(fd);
                }
            }
        }
    }

    /// Despacha el drenado del backlog de accepts al pool
    ///
    /// Drenar puede tomar tiempo si llegaron muchas conexiones de golpe;
    /// correrlo en un worker evita que el multiplexor deje de atender a
    /// los descriptores ya registrados.
    fn dispatch_accept(&self) {
        let listener = Arc::clone(&self.listener);
        let poller = Arc::clone(&self.poller);

        if !self.pool.execute(move || Self::drain_accepts(&listener, &poller)) {
            eprintln!("   ❌ Pool deshabilitado: accept pendiente descartado");
        }
    }

    /// Acepta conexiones hasta agotar el backlog
    ///
    /// Con interés edge-triggered un solo accept no alcanza: la
    /// notificación llega una vez por transición, no una por conexión
    /// pendiente, así que hay que iterar hasta `WouldBlock`.
    fn drain_accepts(listener: &TcpListener, poller: &Poller) {
        loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nonblocking(true) {
                        eprintln!("   ❌ set_nonblocking: {}", e);
                        continue; // el drop cierra la conexión
                    }

                    // El reactor identifica la conexión solo por su fd;
                    // soltamos el ownership del TcpStream y el descriptor
                    // vive hasta su close explícito
                    let fd = stream.into_raw_fd();

                    println!(" ✅ Accepted connection on descriptor {} (peer={})", fd, peer);

                    if let Err(e) = poller.add(fd) {
                        eprintln!("   ❌ No se pudo registrar fd {}: {}", fd, e);
                        socket::close_fd(fd);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    // Backlog drenado por completo
                    break;
                }
                Err(e) => {
                    eprintln!("   ❌ accept: {}", e);
                    break;
                }
            }
        }
    }

    /// Drena los bytes disponibles de un descriptor de datos
    ///
    /// Lee hasta `WouldBlock` (fin de lo disponible, la conexión espera su
    /// próxima notificación), EOF o error (la conexión se cierra). Si se
    /// acumuló algo, el buffer y el fd se entregan al pool por valor.
    fn handle_readable(&self, fd: RawFd) {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        let mut done = false;

        loop {
            match socket::read_fd(fd, &mut chunk) {
                Ok(0) => {
                    // EOF: el peer cerró su lado
                    done = true;
                    break;
                }
                Ok(count) => buffer.extend_from_slice(&chunk[..count]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    // No hay más datos por ahora; no es un error
                    break;
                }
                Err(e) => {
                    eprintln!("   ❌ read fd {}: {}", fd, e);
                    done = true;
                    break;
                }
            }
        }

        if !buffer.is_empty() {
            println!("   ✅ got {} bytes on descriptor {}", buffer.len(), fd);

            let processor = Arc::clone(&self.processor);

            // El item captura fd y buffer por valor: desde acá el worker
            // asignado es el único que toca esta conexión
            if !self.pool.execute(move || Self::write_response(processor, fd, buffer)) {
                eprintln!("   ❌ Pool deshabilitado: se cierra fd {}", fd);
                socket::close_fd(fd);
            }
        } else if done {
            println!("   ✅ Closed connection on descriptor {}", fd);
            socket::close_fd(fd);
        }
    }

    /// Ejecutado en un worker: procesa la request y responde por el socket
    fn write_response(processor: Arc<RequestProcessor>, fd: RawFd, buffer: Vec<u8>) {
        let (bytes, close) = processor.process(&buffer);

        // Reconstruir el TcpStream desde el fd para escribir; se vuelve a
        // modo bloqueante porque el worker sí puede esperar por el send
        let mut stream = unsafe { TcpStream::from_raw_fd(fd) };

        if let Err(e) = stream.set_nonblocking(false) {
            eprintln!("   ❌ set_blocking fd {}: {}", fd, e);
        }

        if let Err(e) = stream.write_all(&bytes).and_then(|_| stream.flush()) {
            eprintln!("   ❌ send fd {}: {}", fd, e);
        }

        if close {
            println!("   ✅ Closed connection on descriptor {}", fd);
            // El drop del stream cierra el fd (y epoll lo desregistra)
        } else {
            // Mantener abierta: devolver el ownership al descriptor crudo
            let _ = stream.into_raw_fd();
        }
    }
}
