//! Shared utilities for integration tests.

use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Start a listener on an ephemeral port that accepts and drops connections.
#[allow(dead_code)]
pub async fn start_accepting_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => drop(socket),
                Err(_) => break,
            }
        }
    });

    addr
}

/// Write `content` to a fresh file in the system temp directory.
#[allow(dead_code)]
pub fn write_temp_file(name: &str, content: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("appkit-tests-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
