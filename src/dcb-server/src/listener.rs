// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Line-oriented TCP listener for dcb-server.
//!
//! Each connection gets its own task. Every non-empty request line is handed
//! to the shared board and its single response line written back in request
//! order.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use dcb_core::Dcb;

/// Run the TCP listener until shutdown is signalled.
pub async fn run_listener(
    addr: SocketAddr,
    dcb: Arc<Dcb>,
    shutdown_rx: watch::Receiver<bool>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);
    serve(listener, dcb, shutdown_rx).await
}

async fn serve(
    listener: TcpListener,
    dcb: Arc<Dcb>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> std::io::Result<()> {
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (socket, peer) = accepted?;
                info!("Client connected: {}", peer);
                let dcb = Arc::clone(&dcb);
                tokio::spawn(async move {
                    if let Err(e) = handle_client(socket, peer, dcb).await {
                        warn!("Client {} error: {:?}", peer, e);
                    }
                });
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    info!("Listener shutting down");
                    return Ok(());
                }
            }
        }
    }
}

async fn handle_client<S>(stream: S, addr: SocketAddr, dcb: Arc<Dcb>) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            info!("Client {} disconnected", addr);
            break;
        }

        if line.trim().is_empty() {
            continue;
        }

        let resp = dcb.prompt_command(&line).await;
        debug!("{} <- {:?} -> {:?}", addr, line.trim_end(), resp.trim_end());
        writer.write_all(resp.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use dcb_core::BoardConfig;
    use tokio::io::AsyncReadExt;

    fn test_board() -> Arc<Dcb> {
        Arc::new(Dcb::from_config(&BoardConfig {
            io_count: 4,
            dispenser_count: 1,
            actuator_count: 1,
            actuator_timeout_ms: 100,
            ..BoardConfig::default()
        }))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_answers_each_line_in_order() {
        let (client, server) = tokio::io::duplex(1024);
        let session = tokio::spawn(handle_client(server, peer(), test_board()));

        let (client_reader, mut client_writer) = tokio::io::split(client);
        client_writer
            .write_all(b"MSP?0\nMSP:0:50\n\nMSP?0\nDSP:0\nDOP?9\nBOGUS\n")
            .await
            .unwrap();
        client_writer.shutdown().await.unwrap();

        let mut replies = String::new();
        BufReader::new(client_reader)
            .read_to_string(&mut replies)
            .await
            .unwrap();
        assert_eq!(
            replies,
            "MSP:0=0\nOK\nMSP:0=50\nOK\nERROR\nERROR\n"
        );
        session.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_accepts_crlf_terminated_lines() {
        let (client, server) = tokio::io::duplex(1024);
        let session = tokio::spawn(handle_client(server, peer(), test_board()));

        let (client_reader, mut client_writer) = tokio::io::split(client);
        client_writer.write_all(b"DOP?0\r\n").await.unwrap();
        let mut reader = BufReader::new(client_reader);
        let mut reply = String::new();
        reader.read_line(&mut reply).await.unwrap();
        assert_eq!(reply, "DOP=0\n");

        drop(client_writer);
        drop(reader);
        session.await.unwrap().unwrap();
    }

    #[tokio::test]
    #[ignore = "requires TCP bind permissions"]
    async fn test_listener_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let server = tokio::spawn(serve(listener, test_board(), shutdown_rx));

        let stream = tokio::net::TcpStream::connect(addr).await.expect("connect");
        let (reader, mut writer) = stream.into_split();
        writer.write_all(b"MSP:0:7\n").await.unwrap();
        let mut reader = BufReader::new(reader);
        let mut reply = String::new();
        reader.read_line(&mut reply).await.unwrap();
        assert_eq!(reply, "OK\n");

        let _ = shutdown_tx.send(true);
        tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .expect("listener shutdown timeout")
            .unwrap()
            .unwrap();
    }
}
