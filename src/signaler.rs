use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Sleep;

use crate::log::{CompletionLog, TracingLog};

/// A unit of asynchronous work whose only outcome is "finished".
///
/// A signaler never fails. It may however never finish if the event it
/// waits on never happens; whoever registers it owns that risk.
pub struct Signaler(BoxFuture<'static, ()>);

impl Signaler {
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self(fut.boxed())
    }

    /// Completes on first poll.
    pub fn noop() -> Self {
        Self::new(future::ready(()))
    }

    /// Completes once a value is received or every sender is dropped.
    /// The received value is discarded.
    pub fn from_channel<T>(mut rx: mpsc::Receiver<T>) -> Self
    where
        T: Send + 'static,
    {
        Self::new(async move {
            let _ = rx.recv().await;
        })
    }

    /// Completes once the value is sent or the sender is dropped.
    pub fn from_oneshot<T>(rx: oneshot::Receiver<T>) -> Self
    where
        T: Send + 'static,
    {
        Self::new(async move {
            let _ = rx.await;
        })
    }

    /// Completes when `timer` fires.
    pub fn from_timer(timer: Sleep) -> Self {
        Self::new(timer)
    }

    /// Starts a fresh timer for `duration` right away and completes when it
    /// fires. Must be called from within a Tokio runtime.
    pub fn from_duration(duration: Duration) -> Self {
        Self::from_timer(tokio::time::sleep(duration))
    }

    /// Runs `self` to completion, then hands `message` to `log`.
    ///
    /// The message is logged before the waiter is notified, so it is always
    /// visible once [`SignalWait::wait`](crate::SignalWait::wait) returns.
    pub fn with_logging<L>(self, log: L, message: impl Into<String>) -> Self
    where
        L: CompletionLog + 'static,
    {
        let message = message.into();
        Self::new(async move {
            self.0.await;
            log.info(&message);
        })
    }

    /// [`with_logging`](Self::with_logging) into `tracing` at info level.
    pub fn with_log(self, message: impl Into<String>) -> Self {
        self.with_logging(TracingLog, message)
    }
}

impl Future for Signaler {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.0.poll_unpin(cx)
    }
}

impl fmt::Debug for Signaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signaler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::log::MemoryLog;

    #[tokio::test]
    async fn noop_is_ready() {
        assert_eq!(Signaler::noop().now_or_never(), Some(()));
    }

    #[tokio::test]
    async fn channel_value_or_close() {
        let (tx, rx) = mpsc::channel::<u32>(1);
        let mut signaler = Signaler::from_channel(rx);
        assert!((&mut signaler).now_or_never().is_none());
        tx.send(7).await.unwrap();
        signaler.await;

        let (tx, rx) = mpsc::channel::<u32>(1);
        let mut signaler = Signaler::from_channel(rx);
        assert!((&mut signaler).now_or_never().is_none());
        drop(tx);
        signaler.await;
    }

    #[tokio::test]
    async fn oneshot_value_or_drop() {
        let (tx, rx) = oneshot::channel::<&str>();
        let mut signaler = Signaler::from_oneshot(rx);
        assert!((&mut signaler).now_or_never().is_none());
        tx.send("up").unwrap();
        signaler.await;

        let (tx, rx) = oneshot::channel::<&str>();
        drop(tx);
        assert_eq!(Signaler::from_oneshot(rx).now_or_never(), Some(()));
    }

    #[tokio::test]
    async fn duration_runs_from_construction() {
        let begin = Instant::now();
        let signaler = Signaler::from_duration(Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(signaler.now_or_never(), Some(()));
        assert!(begin.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn logs_after_delegate() {
        let log = MemoryLog::new();
        let (tx, rx) = oneshot::channel::<()>();
        let mut signaler = Signaler::from_oneshot(rx).with_logging(log.clone(), "monitor up");

        assert!((&mut signaler).now_or_never().is_none());
        assert!(log.is_empty());

        tx.send(()).unwrap();
        signaler.await;
        assert_eq!(log.messages(), vec!["monitor up"]);
    }
}
