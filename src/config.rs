//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor web con soporte para
//! argumentos CLI y variables de entorno.
//!
//! La configuración se construye una sola vez en `main` y se comparte como
//! valor inmutable (`Arc<Config>`) con el resto del servidor. No hay estado
//! global: el root path viaja explícitamente hasta el procesador de requests.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./web_server 8080 ./www --workers 4 --max-events 128
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_HOST=0.0.0.0 HTTP_WORKERS=8 ./web_server 8080 ./www
//! ```

use clap::Parser;

/// Configuración del servidor web estático
#[derive(Debug, Clone, Parser)]
#[command(name = "web_server")]
#[command(about = "Servidor web estático concurrente (epoll + thread pool) para Principios de Sistemas Operativos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor (posicional, obligatorio)
    pub port: u16,

    /// Directorio raíz desde donde se sirven los archivos (posicional, obligatorio)
    pub root_dir: String,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Número de workers del thread pool
    #[arg(long, default_value = "4", env = "HTTP_WORKERS")]
    pub workers: usize,

    /// Máximo de eventos retornados por cada epoll_wait
    #[arg(long = "max-events", default_value = "128", env = "HTTP_MAX_EVENTS")]
    pub max_events: usize,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    ///
    /// Si faltan los argumentos posicionales (puerto y root), clap
    /// imprime el mensaje de uso y termina el proceso.
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use web_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }

        if self.max_events == 0 {
            return Err("Max events must be >= 1".to_string());
        }

        if self.root_dir.is_empty() {
            return Err("Root directory must not be empty".to_string());
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("⚙️  Configuración:");
        println!("   Address:     {}", self.address());
        println!("   Root dir:    {}", self.root_dir);
        println!("   Workers:     {}", self.workers);
        println!("   Max events:  {}", self.max_events);
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto (usada principalmente en tests)
    fn default() -> Self {
        Self {
            port: 8080,
            root_dir: "./www".to_string(),
            host: "0.0.0.0".to_string(),
            workers: 4,
            max_events: 128,
        }
    }
}
