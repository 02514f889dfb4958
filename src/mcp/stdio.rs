//! Newline-delimited JSON-RPC transport over standard input/output
//!
//! Every line is handled on its own task, so a slow downstream call never holds up other
//! messages. Responses go through a single writer task and are always written whole-line.

use std::io;

use serde_json::Value;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::mpsc,
    task::JoinSet,
};
use tracing::{debug, error};

use crate::mcp::{rpc::json_rpc_error, server::handle_json_rpc_payload};
use crate::AppState;

pub async fn serve_stdio(state: AppState) -> io::Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    serve(state, stdin, tokio::io::stdout()).await
}

/// Runs until the reader reaches EOF and every in-flight message has been answered.
pub async fn serve<R, W>(state: AppState, reader: R, writer: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel::<String>();
    let writer_task = tokio::spawn(write_responses(writer, rx));

    let mut lines = reader.lines();
    let mut in_flight = JoinSet::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let state = state.clone();
        let tx = tx.clone();
        in_flight.spawn(async move {
            if let Some(response) = handle_line(&state, &line).await {
                // A closed channel means the writer already failed; it reports the error.
                let _ = tx.send(response.to_string());
            }
        });

        while let Some(joined) = in_flight.try_join_next() {
            log_join_failure(joined);
        }
    }

    debug!("stdin closed, draining in-flight messages");
    while let Some(joined) = in_flight.join_next().await {
        log_join_failure(joined);
    }

    drop(tx);
    writer_task.await.map_err(io::Error::other)?
}

pub async fn handle_line(state: &AppState, line: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(line) {
        Ok(payload) => handle_json_rpc_payload(state, payload).await,
        Err(_) => Some(json_rpc_error(None, -32700, "Parse error")),
    }
}

async fn write_responses<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<String>,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(mut line) = rx.recv().await {
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

fn log_join_failure(joined: Result<(), tokio::task::JoinError>) {
    if let Err(err) = joined {
        error!(error = %err, "message handler task failed");
    }
}
