use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use courier::http::connection::{Connection, ConnectionSettings};
use courier::http::parser::Limits;
use courier::router::Router;
use courier::server::listener::serve;
use courier::store::{DirectoryStore, FileStore, MemoryStore};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn settings() -> ConnectionSettings {
    ConnectionSettings {
        read_timeout: Duration::from_secs(5),
        limits: Limits {
            max_head_bytes: 8 * 1024,
            max_body_bytes: 1024,
        },
    }
}

async fn spawn_server<S: FileStore>(store: Option<S>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = Arc::new(Router::new(store));

    tokio::spawn(serve(listener, router, settings()));
    addr
}

/// Sends raw bytes and reads until the server closes the connection.
async fn send_raw(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw).await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    out
}

#[tokio::test]
async fn test_root() {
    let addr = spawn_server(Some(MemoryStore::new())).await;
    let resp = send_raw(addr, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert_eq!(resp, b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n".to_vec());
}

#[tokio::test]
async fn test_echo() {
    let addr = spawn_server(Some(MemoryStore::new())).await;
    let resp = send_raw(addr, b"GET /echo/abc HTTP/1.1\r\n\r\n").await;

    assert_eq!(
        resp,
        b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\nContent-Type: text/plain\r\n\r\nabc".to_vec()
    );
}

#[tokio::test]
async fn test_user_agent() {
    let addr = spawn_server(Some(MemoryStore::new())).await;
    let resp = send_raw(
        addr,
        b"GET /user-agent HTTP/1.1\r\nHost: localhost\r\nUser-Agent: foobar/1.2.3\r\n\r\n",
    )
    .await;

    assert!(resp.starts_with(b"HTTP/1.1 200 OK\r\n"));
    assert!(resp.ends_with(b"\r\n\r\nfoobar/1.2.3"));
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let addr = spawn_server(Some(MemoryStore::new())).await;
    let resp = send_raw(addr, b"GET /nonexistent HTTP/1.1\r\n\r\n").await;

    assert_eq!(
        resp,
        b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_vec()
    );
}

#[tokio::test]
async fn test_file_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(Some(DirectoryStore::new(dir.path()))).await;

    let resp = send_raw(
        addr,
        b"POST /files/a.txt HTTP/1.1\r\nContent-Length: 5\r\nContent-Type: application/octet-stream\r\n\r\nhello",
    )
    .await;
    assert!(resp.starts_with(b"HTTP/1.1 201 Created\r\n"));
    assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"hello");

    let resp = send_raw(addr, b"GET /files/a.txt HTTP/1.1\r\n\r\n").await;
    assert_eq!(
        resp,
        b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nContent-Type: application/octet-stream\r\n\r\nhello"
            .to_vec()
    );

    let resp = send_raw(addr, b"GET /files/missing.txt HTTP/1.1\r\n\r\n").await;
    assert!(resp.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
}

#[tokio::test]
async fn test_body_split_across_writes() {
    let store = MemoryStore::new();
    let addr = spawn_server(Some(store.clone())).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"POST /files/slow HTTP/1.1\r\nContent-Length: 6\r\n\r\nabc")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    stream.write_all(b"def").await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();

    assert!(out.starts_with(b"HTTP/1.1 201 Created\r\n"));
    assert_eq!(store.read("slow").await.unwrap(), Some(b"abcdef".to_vec()));
}

#[tokio::test]
async fn test_malformed_request_gets_400() {
    let addr = spawn_server(Some(MemoryStore::new())).await;
    let resp = send_raw(addr, b"NONSENSE\r\n\r\n").await;

    assert!(resp.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
    assert!(resp.ends_with(b"400 Bad Request"));
}

#[tokio::test]
async fn test_oversized_body_gets_413() {
    let addr = spawn_server(Some(MemoryStore::new())).await;
    let resp = send_raw(addr, b"POST /files/big HTTP/1.1\r\nContent-Length: 4096\r\n\r\n").await;

    assert!(resp.starts_with(b"HTTP/1.1 413 Payload Too Large\r\n"));
}

#[tokio::test]
async fn test_unconfigured_directory_gets_500() {
    let addr = spawn_server::<MemoryStore>(None).await;
    let resp = send_raw(addr, b"GET /files/a.txt HTTP/1.1\r\n\r\n").await;

    assert!(resp.starts_with(b"HTTP/1.1 500 Internal Server Error\r\n"));
}

#[tokio::test]
async fn test_missing_filename_gets_400() {
    let addr = spawn_server(Some(MemoryStore::new())).await;
    let resp = send_raw(addr, b"GET /files/ HTTP/1.1\r\n\r\n").await;

    assert!(resp.starts_with(b"HTTP/1.1 400 Bad Request\r\n"));
}

#[tokio::test]
async fn test_one_bad_connection_does_not_stop_the_server() {
    let addr = spawn_server(Some(MemoryStore::new())).await;

    // Truncated request, then hang up
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"GET /echo/x HTTP/1.1\r\n").await.unwrap();
    drop(stream);

    let resp = send_raw(addr, b"GET /echo/still-up HTTP/1.1\r\n\r\n").await;
    assert!(resp.ends_with(b"still-up"));
}

#[tokio::test]
async fn test_concurrent_connections() {
    let addr = spawn_server(Some(MemoryStore::new())).await;

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            tokio::spawn(async move {
                let raw = format!("GET /echo/n{i} HTTP/1.1\r\n\r\n");
                (i, send_raw(addr, raw.as_bytes()).await)
            })
        })
        .collect();

    for task in tasks {
        let (i, resp) = task.await.unwrap();
        assert!(resp.ends_with(format!("n{i}").as_bytes()));
    }
}

#[tokio::test]
async fn test_connection_truncated_request_sends_nothing() {
    let (mut client, server) = tokio::io::duplex(1024);
    let router = Arc::new(Router::with_store(MemoryStore::new()));
    let mut conn = Connection::new(server, router, settings());

    client.write_all(b"GET / HTTP/1.1\r\nHost: x\r\n").await.unwrap();
    client.shutdown().await.unwrap();

    assert!(conn.run().await.is_err());
    drop(conn);

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_connection_quiet_close_is_ok() {
    let (mut client, server) = tokio::io::duplex(1024);
    let router = Arc::new(Router::with_store(MemoryStore::new()));
    let mut conn = Connection::new(server, router, settings());

    client.shutdown().await.unwrap();

    assert!(conn.run().await.is_ok());
}

#[tokio::test]
async fn test_connection_read_timeout_sends_408() {
    let (mut client, server) = tokio::io::duplex(1024);
    let router = Arc::new(Router::with_store(MemoryStore::new()));
    let settings = ConnectionSettings {
        read_timeout: Duration::from_millis(100),
        ..settings()
    };
    let mut conn = Connection::new(server, router, settings);

    client.write_all(b"GET / HTTP/1.1\r\n").await.unwrap();

    conn.run().await.unwrap();
    drop(conn);

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    assert!(out.starts_with(b"HTTP/1.1 408 Request Timeout\r\n"));
}
