//! Tests de integración del servidor web
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero, dentro del
//! mismo proceso. El thread del event loop no tiene camino de terminación
//! (el loop es infinito por diseño), así que queda corriendo hasta que el
//! proceso de tests termina.

use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use web_server::config::Config;
use web_server::server::Server;

/// Crea un root temporal único con un index.html
fn temp_root(index_contents: &[u8]) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    let dir = std::env::temp_dir().join(format!(
        "web_server_integration_{}_{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("index.html"), index_contents).unwrap();

    dir
}

/// Levanta un servidor sobre `root` y retorna su dirección real
fn start_server(root: &PathBuf) -> SocketAddr {
    let mut config = Config::default();
    config.host = "127.0.0.1".to_string();
    config.port = 0; // puerto efímero
    config.root_dir = root.to_string_lossy().to_string();
    config.workers = 4;

    let server = Server::bind(config).expect("bind");
    let addr = server.local_addr().expect("local_addr");

    thread::spawn(move || {
        let mut server = server;
        let _ = server.run();
    });

    addr
}

/// Helper: envía un request crudo y retorna la response completa en bytes
fn send_raw(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).expect("connect");

    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    stream
        .set_write_timeout(Some(Duration::from_secs(5)))
        .unwrap();

    stream.write_all(request).unwrap();
    stream.flush().unwrap();

    // El servidor cierra la conexión después de responder
    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();

    response
}

/// Helper: request GET simple, response como String
fn send_get(addr: SocketAddr, target: &str) -> String {
    let request = format!("GET {} HTTP/1.1\r\n\r\n", target);
    String::from_utf8_lossy(&send_raw(addr, request.as_bytes())).to_string()
}

/// Helper: extrae el body de una response HTTP en bytes
fn extract_body(response: &[u8]) -> &[u8] {
    let pos = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response sin separador de headers");
    &response[pos + 4..]
}

#[test]
fn test_get_root_serves_index() {
    let root = temp_root(b"<html><body>bienvenido</body></html>");
    let addr = start_server(&root);

    let response = send_raw(addr, b"GET / HTTP/1.1\r\n\r\n");
    let text = String::from_utf8_lossy(&response);

    assert!(text.contains("200"), "response: {}", text);
    assert!(text.contains("Content-Length: 36\r\n"));
    assert!(text.contains("Content-Type: text/html\r\n"));
    assert_eq!(extract_body(&response), b"<html><body>bienvenido</body></html>");
}

#[test]
fn test_get_file_byte_identical() {
    let root = temp_root(b"index");
    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    fs::write(root.join("blob.bin"), &payload).unwrap();
    let addr = start_server(&root);

    let response = send_raw(addr, b"GET /blob.bin HTTP/1.1\r\n\r\n");
    let text = String::from_utf8_lossy(&response);

    assert!(text.contains("200"));
    assert!(text.contains("Content-Length: 4096\r\n"));
    assert_eq!(extract_body(&response), &payload[..]);
}

#[test]
fn test_missing_file_returns_404_with_target() {
    let root = temp_root(b"index");
    let addr = start_server(&root);

    let text = send_get(addr, "/missing.txt");

    assert!(text.contains("404"), "response: {}", text);
    let body_start = text.find("\r\n\r\n").unwrap() + 4;
    assert!(text[body_start..].contains("/missing.txt"));
}

#[test]
fn test_post_returns_400() {
    let root = temp_root(b"index");
    let addr = start_server(&root);

    let response = send_raw(addr, b"POST / HTTP/1.1\r\n\r\n");
    let text = String::from_utf8_lossy(&response);

    assert!(text.contains("400"), "response: {}", text);
}

#[test]
fn test_traversal_returns_403() {
    let root = temp_root(b"index");
    let addr = start_server(&root);

    for target in ["/../etc/passwd", "/a/../../b", "/x..y"] {
        let text = send_get(addr, target);
        assert!(text.contains("403"), "target {}: {}", target, text);
    }
}

#[test]
fn test_garbage_returns_400() {
    let root = temp_root(b"index");
    let addr = start_server(&root);

    let response = send_raw(addr, b"\x00\x01\x02\x03garbage");
    let text = String::from_utf8_lossy(&response);

    assert!(text.contains("400"), "response: {}", text);
}

#[test]
fn test_zero_byte_connection_closed_server_survives() {
    let root = temp_root(b"index");
    let addr = start_server(&root);

    // Conectar y cerrar sin enviar nada: el reactor cierra el descriptor
    // sin despachar ningún item
    {
        let stream = TcpStream::connect(addr).unwrap();
        drop(stream);
    }

    thread::sleep(Duration::from_millis(100));

    // El servidor sigue sirviendo con normalidad
    let text = send_get(addr, "/");
    assert!(text.contains("200"), "response: {}", text);
}

#[test]
fn test_connection_closed_after_response() {
    let root = temp_root(b"index");
    let addr = start_server(&root);

    let mut stream = TcpStream::connect(addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    stream.write_all(b"GET / HTTP/1.1\r\n\r\n").unwrap();

    // read_to_end solo termina si el servidor cierra su lado
    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    assert!(!response.is_empty());

    // Una segunda lectura confirma el EOF
    let mut extra = [0u8; 8];
    assert_eq!(stream.read(&mut extra).unwrap(), 0);
}

#[test]
fn test_concurrent_clients() {
    let root = temp_root(b"contenido compartido");
    let addr = start_server(&root);

    let clients: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(move || {
                let response = send_raw(addr, b"GET / HTTP/1.1\r\n\r\n");
                let text = String::from_utf8_lossy(&response).to_string();
                assert!(text.contains("200"), "response: {}", text);
                assert_eq!(extract_body(&response), b"contenido compartido");
            })
        })
        .collect();

    for client in clients {
        client.join().unwrap();
    }
}

#[test]
fn test_sequential_requests_new_connections() {
    let root = temp_root(b"index");
    fs::write(root.join("a.txt"), b"AAA").unwrap();
    fs::write(root.join("b.txt"), b"BBB").unwrap();
    let addr = start_server(&root);

    let a = send_raw(addr, b"GET /a.txt HTTP/1.1\r\n\r\n");
    assert_eq!(extract_body(&a), b"AAA");

    let b = send_raw(addr, b"GET /b.txt HTTP/1.1\r\n\r\n");
    assert_eq!(extract_body(&b), b"BBB");
}
