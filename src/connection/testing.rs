//! In-process Bolt server stub for tests

use crate::client::ConnectionDescriptor;
use crate::protocol::constants::HANDSHAKE_LEN;
use crate::protocol::ServerVersion;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Accepts connections, records each handshake and answers with a fixed version
pub(crate) struct FakeServer {
    port: u16,
    accepted: Arc<AtomicUsize>,
    handshakes: Mutex<mpsc::UnboundedReceiver<[u8; HANDSHAKE_LEN]>>,
    task: JoinHandle<()>,
}

impl FakeServer {
    pub(crate) async fn start(reply: ServerVersion) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = mpsc::unbounded_channel();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();

        let task = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut request = [0u8; HANDSHAKE_LEN];
                    if socket.read_exact(&mut request).await.is_err() {
                        return;
                    }
                    let _ = tx.send(request);
                    if socket.write_all(&reply.to_bytes()).await.is_err() {
                        return;
                    }
                    let mut sink = [0u8; 64];
                    while let Ok(n) = socket.read(&mut sink).await {
                        if n == 0 {
                            break;
                        }
                    }
                });
            }
        });

        Self {
            port,
            accepted,
            handshakes: Mutex::new(rx),
            task,
        }
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    pub(crate) fn descriptor(&self) -> ConnectionDescriptor {
        ConnectionDescriptor::explicit(format!("bolt://neo4j:pw@127.0.0.1:{}", self.port))
    }

    /// Number of TCP connections accepted so far
    pub(crate) fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    /// Waits for the next recorded handshake request
    pub(crate) async fn next_handshake(&self) -> [u8; HANDSHAKE_LEN] {
        self.handshakes
            .lock()
            .await
            .recv()
            .await
            .expect("fake server stopped")
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
