//! Thread-safe parser pool for tree-sitter grammars.
//!
//! `tree_sitter::Parser` is not `Send`/`Sync`, so it cannot be shared across
//! async tasks directly. This pool owns a small number of dedicated worker
//! threads, each with its own `Parser`, and answers requests sent over a
//! channel — the same shape the reference indexer uses, generalized so any
//! registered plugin's grammar can be parsed through one shared pool instead
//! of a fixed per-language enum.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tree_sitter::{Language, Parser};

/// A parsing request sent to the pool.
pub struct ParseRequest {
    pub language: Language,
    pub content: Vec<u8>,
    pub path: PathBuf,
}

/// Result of a parsing operation.
pub struct ParseResult {
    pub tree: tree_sitter::Tree,
    pub path: PathBuf,
    pub content: Vec<u8>,
}

struct WorkerRequest {
    request: ParseRequest,
    response_sender: std::sync::mpsc::Sender<Result<ParseResult>>,
}

/// Thread-safe parser pool. Cloning shares the same worker threads.
#[derive(Clone)]
pub struct ParserPool {
    sender: std::sync::mpsc::Sender<WorkerRequest>,
}

impl ParserPool {
    /// Create a new pool with the given number of worker threads.
    pub fn new(num_workers: usize) -> Self {
        let (sender, receiver) = std::sync::mpsc::channel::<WorkerRequest>();
        let receiver = Arc::new(Mutex::new(receiver));

        for i in 0..num_workers.max(1) {
            let receiver = receiver.clone();
            std::thread::spawn(move || Self::worker_thread(i, receiver));
        }

        Self { sender }
    }

    fn worker_thread(
        worker_id: usize,
        receiver: Arc<Mutex<std::sync::mpsc::Receiver<WorkerRequest>>>,
    ) {
        tracing::debug!(worker_id, "parser worker started");
        let mut parser = Parser::new();

        loop {
            let WorkerRequest { request, response_sender } = match receiver.lock().unwrap().recv() {
                Ok(req) => req,
                Err(_) => {
                    tracing::debug!(worker_id, "parser worker shutting down");
                    break;
                }
            };

            if let Err(e) = parser.set_language(&request.language) {
                let _ = response_sender.send(Err(anyhow::anyhow!("failed to set language: {e}")));
                continue;
            }

            let result = match parser.parse(&request.content, None) {
                Some(tree) => Ok(ParseResult { tree, path: request.path, content: request.content }),
                None => Err(anyhow::anyhow!("grammar could not produce a parse tree")),
            };

            if response_sender.send(result).is_err() {
                tracing::warn!(worker_id, "caller dropped before receiving parse result");
            }
        }
    }

    /// Parse synchronously, blocking the calling thread until a worker
    /// answers. Used by the parallel file-processing stage in
    /// `astrograph-discovery`.
    pub fn parse_blocking(&self, request: ParseRequest) -> Result<ParseResult> {
        let (response_sender, response_receiver) = std::sync::mpsc::channel();
        self.sender
            .send(WorkerRequest { request, response_sender })
            .map_err(|_| anyhow::anyhow!("parser pool is shut down"))?;
        response_receiver.recv().map_err(|_| anyhow::anyhow!("parser worker died"))?
    }

    /// Parse off the async reactor via `spawn_blocking`, for the server and
    /// watcher paths.
    pub async fn parse(&self, request: ParseRequest) -> Result<ParseResult> {
        let sender = self.sender.clone();
        tokio::task::spawn_blocking(move || {
            let (response_sender, response_receiver) = std::sync::mpsc::channel();
            sender
                .send(WorkerRequest { request, response_sender })
                .map_err(|_| anyhow::anyhow!("parser pool is shut down"))?;
            response_receiver.recv().map_err(|_| anyhow::anyhow!("parser worker died"))?
        })
        .await
        .map_err(|e| anyhow::anyhow!("parser task join error: {e}"))?
    }
}

/// Create a pool sized to the host, at least 2 workers.
pub fn create_parser_pool() -> ParserPool {
    let num_workers = std::thread::available_parallelism().map(|n| n.get().max(2)).unwrap_or(2);
    ParserPool::new(num_workers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rust_source_blocking() {
        let pool = create_parser_pool();
        let request = ParseRequest {
            language: tree_sitter_rust::LANGUAGE.into(),
            content: b"fn main() {}".to_vec(),
            path: PathBuf::from("test.rs"),
        };
        let result = pool.parse_blocking(request).unwrap();
        assert_eq!(result.tree.root_node().kind(), "source_file");
    }

    #[tokio::test]
    async fn parses_python_source_async() {
        let pool = create_parser_pool();
        let request = ParseRequest {
            language: tree_sitter_python::LANGUAGE.into(),
            content: b"def f():\n    pass\n".to_vec(),
            path: PathBuf::from("test.py"),
        };
        let result = pool.parse(request).await.unwrap();
        assert_eq!(result.tree.root_node().kind(), "module");
    }
}
