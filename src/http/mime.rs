//! # Content-Type por Extensión
//! src/http/mime.rs
//!
//! Deriva el header `Content-Type` a partir de la extensión final del
//! archivo pedido. Extensión desconocida o ausente cae al tipo genérico
//! `text/plain`.

use regex::Regex;
use std::sync::OnceLock;

/// Tipo por defecto cuando la extensión no se reconoce
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Patrón que captura la extensión final del path
fn extension_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^.*\.(\w+)$").unwrap())
}

/// Tabla extensión → content type
fn lookup(extension: &str) -> Option<&'static str> {
    let content_type = match extension {
        "html" => "text/html",
        "htm" => "text/html",
        "shtm" => "text/html",
        "shtml" => "text/html",
        "css" => "text/css",
        "js" => "application/x-javascript",
        "ico" => "image/x-icon",
        "gif" => "image/gif",
        "jpg" => "image/jpeg",
        "jpeg" => "image/jpeg",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "torrent" => "application/x-bittorrent",
        "wav" => "audio/x-wav",
        "mp3" => "audio/x-mp3",
        "mid" => "audio/mid",
        "m3u" => "audio/x-mpegurl",
        "ogg" => "application/ogg",
        "ram" => "audio/x-pn-realaudio",
        "xml" => "text/xml",
        "json" => "application/json",
        "xslt" => "application/xml",
        "xsl" => "application/xml",
        "ra" => "audio/x-pn-realaudio",
        "doc" => "application/msword",
        "exe" => "application/octet-stream",
        "zip" => "application/x-zip-compressed",
        "xls" => "application/excel",
        "tgz" => "application/x-tar-gz",
        "tar" => "application/x-tar",
        "gz" => "application/x-gunzip",
        "arj" => "application/x-arj-compressed",
        "rar" => "application/x-rar-compressed",
        "rtf" => "application/rtf",
        "pdf" => "application/pdf",
        "swf" => "application/x-shockwave-flash",
        "mpg" => "video/mpeg",
        "webm" => "video/webm",
        "mpeg" => "video/mpeg",
        "mov" => "video/quicktime",
        "mp4" => "video/mp4",
        "m4v" => "video/x-m4v",
        "asf" => "video/x-ms-asf",
        "avi" => "video/x-msvideo",
        "bmp" => "image/bmp",
        "ttf" => "application/x-font-ttf",
        _ => return None,
    };

    Some(content_type)
}

/// Retorna el content type para un path según su extensión final
///
/// # Ejemplo
/// ```
/// use web_server::http::mime::content_type_for;
///
/// assert_eq!(content_type_for("/www/index.html"), "text/html");
/// assert_eq!(content_type_for("/www/README"), "text/plain");
/// ```
pub fn content_type_for(path: &str) -> &'static str {
    extension_regex()
        .captures(path)
        .and_then(|captures| lookup(&captures[1]))
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
