//! # Glue de Sockets No Bloqueantes
//! src/server/socket.rs
//!
//! Helpers para crear el socket de escucha no bloqueante y para operar
//! sobre descriptores crudos. Los descriptores de datos viven como `RawFd`
//! (el multiplexor los identifica solo por su número), así que la lectura
//! y el cierre pasan por estos wrappers en vez de por un `TcpStream`.

use std::io;
use std::net::TcpListener;
use std::os::unix::io::RawFd;

/// Crea el socket de escucha, lo liga a `addr` y lo deja no bloqueante
///
/// Cualquier falla acá es fatal para el arranque del servidor.
pub fn create_and_bind(addr: &str) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(addr)?;
    listener.set_nonblocking(true)?;

    Ok(listener)
}

/// Lee del descriptor crudo hacia `buf`
///
/// Retorna `Ok(0)` en EOF (el peer cerró) y `WouldBlock` cuando no hay
/// más datos disponibles por ahora.
pub fn read_fd(fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
    let count = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };

    if count == -1 {
        return Err(io::Error::last_os_error());
    }

    Ok(count as usize)
}

/// Cierra el descriptor crudo
///
/// Cerrarlo también lo remueve del set monitoreado por epoll.
pub fn close_fd(fd: RawFd) {
    unsafe {
        libc::close(fd);
    }
}
