//! Single-writer, single-reader message conduit for migration tasks.
//!
//! A migration task owns the [`PipeWriter`] and reports progress notices and
//! errors through it; whoever dispatched the task owns the [`PipeReader`] and
//! drains it once the writer is closed. Neither half can be cloned, closing
//! consumes the writer, and draining consumes the reader, so a pipe is used
//! for exactly one migration attempt.

use tokio::sync::mpsc;

/// A message written into a pipe
#[derive(Debug)]
pub enum PipeMessage<E> {
    /// Informational progress notice
    Notice(String),
    /// Failure of the producing task
    Error(E),
}

impl<E> PipeMessage<E> {
    pub fn is_error(&self) -> bool {
        matches!(self, PipeMessage::Error(_))
    }
}

/// Create a new, empty pipe
pub fn pipe<E>() -> (PipeWriter<E>, PipeReader<E>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (PipeWriter { tx }, PipeReader { rx })
}

/// Producer half. Dropping it closes the pipe.
#[derive(Debug)]
pub struct PipeWriter<E> {
    tx: mpsc::UnboundedSender<PipeMessage<E>>,
}

impl<E> PipeWriter<E> {
    /// Write a message. Discarded if the reader is gone.
    pub fn write(&self, message: PipeMessage<E>) {
        if self.tx.send(message).is_err() {
            log::trace!("Pipe reader dropped; discarding message");
        }
    }

    pub fn notice(&self, text: impl Into<String>) {
        self.write(PipeMessage::Notice(text.into()));
    }

    pub fn error(&self, err: E) {
        self.write(PipeMessage::Error(err));
    }

    /// Close the pipe, unblocking the reader
    pub fn close(self) {}
}

/// Consumer half
#[derive(Debug)]
pub struct PipeReader<E> {
    rx: mpsc::UnboundedReceiver<PipeMessage<E>>,
}

impl<E> PipeReader<E> {
    /// Wait until the writer closes the pipe and return every message in
    /// write order
    pub async fn drain(mut self) -> Vec<PipeMessage<E>> {
        let mut messages = Vec::new();
        while let Some(message) = self.rx.recv().await {
            messages.push(message);
        }
        messages
    }

    /// Drain the pipe, keeping only error messages
    pub async fn read_errors(self) -> Vec<E> {
        errors_only(self.drain().await)
    }
}

/// Filter drained messages down to their errors
pub fn errors_only<E>(messages: Vec<PipeMessage<E>>) -> Vec<E> {
    messages
        .into_iter()
        .filter_map(|m| match m {
            PipeMessage::Error(e) => Some(e),
            PipeMessage::Notice(_) => None,
        })
        .collect()
}

#[cfg(test)]
#[path = "pipe_test.rs"]
mod tests;
