//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Protocolo HTTP mínimo implementado desde cero, sin librerías de alto
//! nivel. Este servidor solo necesita:
//!
//! - Parsing de la request line (`GET /path HTTP/1.1`)
//! - Construcción de responses (archivo o página de error)
//! - Códigos de estado (200, 400, 403, 404)
//! - Content-Type por extensión de archivo
//!
//! El resto del protocolo (headers de entrada, body, keep-alive, chunked
//! transfer) queda fuera de alcance: cada response cierra la conexión.

pub mod mime;
pub mod request;  // Parsing de la request line
pub mod response; // Construcción de HTTP responses
pub mod status;   // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
