//! # Parsing de la Request Line
//! src/http/request.rs
//!
//! Parser mínimo de requests HTTP: solo interesa la request line.
//!
//! ```text
//! GET /index.html HTTP/1.1\r\n
//! ```
//!
//! El servidor procesa lo que llegó desde la última notificación de
//! lectura, así que el buffer puede venir parcial o con basura: cualquier
//! cosa que no calce con el patrón se reporta como request malformada y
//! el handler la convierte en 400.

use regex::Regex;
use std::sync::OnceLock;

/// Patrón de la request line: verbo, target y versión, con espacios
/// alrededor tolerados
fn request_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\s*([A-Z]*)\s+(.*?)\s+HTTP/(\d\.\d)").unwrap())
}

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso (el único verbo que sirve archivos)
    GET,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// # Errores
    ///
    /// Retorna error si el método no es soportado
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
        }
    }
}

/// Representa la request line parseada
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP (solo GET)
    method: Method,

    /// Target de la petición (ej: "/index.html")
    target: String,

    /// Versión HTTP (ej: "1.1")
    version: String,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request vacía
    EmptyRequest,

    /// La request line no calza con el patrón `VERB target HTTP/x.y`
    MalformedRequestLine,

    /// Método HTTP no soportado
    UnsupportedMethod(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyRequest => write!(f, "Empty request"),
            ParseError::MalformedRequestLine => write!(f, "Malformed request line"),
            ParseError::UnsupportedMethod(m) => write!(f, "Unsupported HTTP method: {}", m),
        }
    }
}

impl std::error::Error for ParseError {}

impl Request {
    /// Parsea la request line desde los bytes acumulados de la conexión
    ///
    /// # Retorna
    ///
    /// * `Ok(Request)` - Request line válida con verbo soportado
    /// * `Err(ParseError)` - Buffer vacío, línea malformada o verbo no GET
    ///
    /// # Ejemplo
    /// ```
    /// use web_server::http::Request;
    ///
    /// let request = Request::parse(b"GET /index.html HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(request.target(), "/index.html");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Request, ParseError> {
        if buffer.is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        // El buffer puede traer bytes arbitrarios; lossy alcanza porque
        // solo nos interesa la request line ASCII
        let text = String::from_utf8_lossy(buffer);

        let captures = request_line_regex()
            .captures(&text)
            .ok_or(ParseError::MalformedRequestLine)?;

        let method = Method::from_str(&captures[1])?;
        let target = captures[2].to_string();
        let version = captures[3].to_string();

        Ok(Request {
            method,
            target,
            version,
        })
    }

    /// Obtiene el método HTTP
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el target de la petición
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Obtiene la versión HTTP (ej: "1.1")
    pub fn version(&self) -> &str {
        &self.version
    }
}
