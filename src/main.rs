//! # Web Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor web estático.
//!
//! Uso: `web_server <puerto> <root> [--workers N] [--max-events N]`

use web_server::config::Config;
use web_server::server::Server;

fn main() {
    println!("=================================");
    println!("  Static Web Server");
    println!("  Principios de Sistemas Operativos");
    println!("=================================\n");

    // Parsear CLI (clap reporta el uso si faltan puerto o root)
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    // Preparar sockets, epoll y pool; cualquier falla acá es fatal
    let mut server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("💥 Error fatal al iniciar: {}", e);
            std::process::exit(1);
        }
    };

    // Correr el event loop (bloquea este thread para siempre)
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal en el event loop: {}", e);
        std::process::exit(1);
    }
}
