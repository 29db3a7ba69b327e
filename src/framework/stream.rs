//! # Frame Streams
//!
//! One direction of a streaming call is a bounded `mpsc` channel of [`Frame`]s.
//! The producer holds a [`StreamSender`], the consumer a [`Streaming`].
//!
//! Termination is always explicit: the producer either sends an end marker
//! ([`StreamSender::close`]) or a terminal error ([`StreamSender::abort`]).
//! A channel that simply disappears is never a clean end: a request stream
//! the caller dropped is reported as cancelled, a response stream the server
//! dropped as an internal failure.
//!
//! Both halves watch the shared [`CallContext`], so a deadline or a
//! cancellation stops sending and receiving at the next suspension point.

use crate::framework::context::CallContext;
use crate::framework::status::Status;
use tokio::sync::mpsc;
use tokio_util::sync::DropGuard;

/// Unit carried over one direction of a stream.
enum Frame<T> {
    Item(T),
    End,
    Error(Status),
}

/// Which way a stream direction flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Caller to server.
    Request,
    /// Server to caller.
    Response,
}

/// Opens one stream direction bound to `ctx`.
pub fn channel<T>(
    ctx: &CallContext,
    direction: Direction,
    buffer: usize,
) -> (StreamSender<T>, Streaming<T>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let sender = StreamSender {
        ctx: ctx.clone(),
        tx,
    };
    let stream = Streaming {
        ctx: ctx.clone(),
        direction,
        rx,
        terminal: None,
        _guard: None,
    };
    (sender, stream)
}

/// Sending half of a stream direction.
pub struct StreamSender<T> {
    ctx: CallContext,
    tx: mpsc::Sender<Frame<T>>,
}

impl<T> Clone for StreamSender<T> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            tx: self.tx.clone(),
        }
    }
}

impl<T> StreamSender<T> {
    /// Sends one item, waiting for buffer space.
    ///
    /// Fails with the call's terminal status once the call is over, and with
    /// `Cancelled` when the receiving side has gone away.
    pub async fn send(&self, item: T) -> Result<(), Status> {
        self.ctx.check()?;
        self.deliver(Frame::Item(item)).await
    }

    /// Closes this direction with an end marker.
    pub async fn close(self) -> Result<(), Status> {
        self.deliver(Frame::End).await
    }

    /// Terminates this direction with `status`. Items already sent stay delivered.
    pub async fn abort(self, status: Status) -> Result<(), Status> {
        self.deliver(Frame::Error(status)).await
    }

    pub fn context(&self) -> &CallContext {
        &self.ctx
    }

    /// True once the receiving half has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn deliver(&self, frame: Frame<T>) -> Result<(), Status> {
        tokio::select! {
            biased;
            status = self.ctx.done() => Err(status),
            sent = self.tx.send(frame) => sent.map_err(|_| {
                Status::cancelled(format!("{}: receiving side closed the stream", self.ctx.method()))
            }),
        }
    }
}

/// Receiving half of a stream direction.
pub struct Streaming<T> {
    ctx: CallContext,
    direction: Direction,
    rx: mpsc::Receiver<Frame<T>>,
    terminal: Option<Result<(), Status>>,
    _guard: Option<DropGuard>,
}

impl<T> Streaming<T> {
    /// Receives the next item.
    ///
    /// `Ok(None)` means the producer closed the stream cleanly. After an error
    /// or the end marker every further call repeats the same terminal outcome.
    pub async fn message(&mut self) -> Result<Option<T>, Status> {
        if let Some(terminal) = &self.terminal {
            return terminal.clone().map(|()| None);
        }

        let frame = tokio::select! {
            biased;
            status = self.ctx.done() => Err(status),
            frame = self.rx.recv() => Ok(frame),
        };

        match frame {
            Ok(Some(Frame::Item(item))) => Ok(Some(item)),
            Ok(Some(Frame::End)) => self.terminate(Ok(())),
            Ok(Some(Frame::Error(status))) | Err(status) => self.terminate(Err(status)),
            Ok(None) => {
                let status = self.vanished();
                self.terminate(Err(status))
            }
        }
    }

    /// Receives every remaining item; fails with the terminal status if the
    /// stream does not end cleanly.
    pub async fn try_collect(mut self) -> Result<Vec<T>, Status> {
        let mut items = Vec::new();
        while let Some(item) = self.message().await? {
            items.push(item);
        }
        Ok(items)
    }

    pub fn context(&self) -> &CallContext {
        &self.ctx
    }

    /// Cancels the whole call from the receiving side.
    pub fn cancel(&self) {
        self.ctx.cancel();
    }

    /// Cancels the call when this half is dropped. Used on the calling side.
    pub(crate) fn cancel_on_drop(mut self) -> Self {
        self._guard = Some(self.ctx.drop_guard());
        self
    }

    fn vanished(&self) -> Status {
        let method = self.ctx.method();
        match self.direction {
            Direction::Request => Status::cancelled(format!(
                "{method}: request stream dropped without an end marker"
            )),
            Direction::Response => Status::internal(format!(
                "{method}: server ended the call without a status"
            )),
        }
    }

    fn terminate(&mut self, outcome: Result<(), Status>) -> Result<Option<T>, Status> {
        self.rx.close();
        self.terminal = Some(outcome.clone());
        outcome.map(|()| None)
    }
}
