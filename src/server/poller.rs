//! # Registro de Readiness (epoll)
//! src/server/poller.rs
//!
//! Wrapper fino sobre epoll. Todo el interés es de lectura edge-triggered
//! (`EPOLLIN | EPOLLET`): una notificación por transición de readiness, no
//! por byte pendiente, así que quien la reciba debe drenar hasta
//! `WouldBlock`.
//!
//! ## Registro entre threads
//!
//! `add` se puede invocar desde un worker mientras el thread del multiplexor
//! está bloqueado en `wait`: epoll(7) garantiza que `epoll_ctl` es seguro
//! de llamar concurrentemente con `epoll_wait` sobre el mismo descriptor.
//! Esa garantía del kernel es lo que permite que el drenado de accepts
//! corra en el pool y registre conexiones nuevas sin pasar mensajes de
//! vuelta al multiplexor.

use std::io;
use std::os::unix::io::RawFd;

/// Dueño del descriptor de epoll
pub struct Poller {
    /// Descriptor retornado por epoll_create1
    epfd: RawFd,
}

impl Poller {
    /// Crea la instancia de epoll
    ///
    /// La falla es fatal para el arranque del servidor.
    pub fn new() -> io::Result<Self> {
        let epfd = unsafe { libc::epoll_create1(0) };

        if epfd == -1 {
            return Err(io::Error::last_os_error());
        }

        Ok(Self { epfd })
    }

    /// Registra interés de lectura edge-triggered sobre `fd`
    ///
    /// El evento lleva el número de descriptor en `u64`: es toda la
    /// identidad que el multiplexor necesita por conexión.
    pub fn add(&self, fd: RawFd) -> io::Result<()> {
        let mut event = libc::epoll_event {
            events: (libc::EPOLLIN | libc::EPOLLET) as u32,
            u64: fd as u64,
        };

        let result = unsafe { libc::epoll_ctl(self.epfd, libc::EPOLL_CTL_ADD, fd, &mut event) };

        if result == -1 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }

    /// Bloquea hasta que haya eventos y los deja en `events`
    ///
    /// Sin timeout: el proceso no necesita despertar si no hay I/O.
    /// Un `EINTR` reintenta el wait en vez de reportarse como error.
    pub fn wait(&self, events: &mut [libc::epoll_event]) -> io::Result<usize> {
        loop {
            let count = unsafe {
                libc::epoll_wait(self.epfd, events.as_mut_ptr(), events.len() as i32, -1)
            };

            if count == -1 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }

            return Ok(count as usize);
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.epfd);
        }
    }
}
