//! In-process Bolt endpoint answering the version handshake

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Replies to every handshake with `[0, 0, minor, major]` and then idles
pub struct BoltStub {
    pub port: u16,
    accepted: Arc<AtomicUsize>,
    task: JoinHandle<()>,
}

impl BoltStub {
    pub async fn start(major: u8, minor: u8) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();

        let task = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::spawn(async move {
                    let mut request = [0u8; 20];
                    if socket.read_exact(&mut request).await.is_err() {
                        return;
                    }
                    assert_eq!(&request[..4], &[0x60, 0x60, 0xB0, 0x17]);
                    if socket.write_all(&[0, 0, minor, major]).await.is_err() {
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
            task,
        }
    }

    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}

impl Drop for BoltStub {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Install a test subscriber honouring `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
