use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Sleep;

use crate::error::{Error, Result};
use crate::signaler::Signaler;

/// Fan-in barrier over any number of [`Signaler`]s.
///
/// Every added signaler runs as its own Tokio task and reports back through
/// a small bounded queue. [`wait`](Self::wait) drains one report per pending
/// signaler. The pending count lives on the waiter and is only ever touched
/// through `&mut self`; the spawned tasks hold nothing but a queue sender.
///
/// `wait` is unbounded: a signaler whose event never happens keeps it
/// pending forever. Use [`wait_timeout`](Self::wait_timeout) to put an upper
/// bound on it.
#[derive(Debug)]
pub struct SignalWait {
    pending: usize,
    deadline: Option<Duration>,
    tx: mpsc::Sender<()>,
    rx: mpsc::Receiver<()>,
}

impl SignalWait {
    pub fn new() -> Self {
        Builder::new().build()
    }

    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Signalers added but not yet drained by a wait.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Spawns `signaler` onto the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn add(&mut self, signaler: Signaler) {
        self.pending += 1;
        tracing::debug!(pending = self.pending, "signaler added");

        let tx = self.tx.clone();
        tokio::spawn(async move {
            signaler.await;
            // the receiver only goes away with the waiter
            let _ = tx.send(()).await;
        });
    }

    pub fn add_channel<T>(&mut self, rx: mpsc::Receiver<T>)
    where
        T: Send + 'static,
    {
        self.add(Signaler::from_channel(rx))
    }

    pub fn add_oneshot<T>(&mut self, rx: oneshot::Receiver<T>)
    where
        T: Send + 'static,
    {
        self.add(Signaler::from_oneshot(rx))
    }

    pub fn add_timer(&mut self, timer: Sleep) {
        self.add(Signaler::from_timer(timer))
    }

    pub fn add_timeout(&mut self, duration: Duration) {
        self.add(Signaler::from_duration(duration))
    }

    /// Registers a unit that completes immediately.
    pub fn signal(&mut self) {
        self.add(Signaler::noop())
    }

    /// Resolves once every pending signaler has completed, in any order.
    ///
    /// Returns immediately when nothing is pending. Dropping the future early
    /// is fine: only drained reports are subtracted from the pending count.
    pub async fn wait(&mut self) {
        if self.pending == 0 {
            return;
        }

        // the waiter holds a sender, so `recv` never yields `None` here
        while self.pending > 0 && self.rx.recv().await.is_some() {
            self.pending -= 1;
            tracing::trace!(pending = self.pending, "signaler completed");
        }
        tracing::debug!("all signalers completed");
    }

    /// Like [`wait`](Self::wait), but gives up after `deadline`.
    ///
    /// On expiry the signalers that did complete are accounted for and the
    /// rest stay pending, so a later wait picks up where this one stopped.
    pub async fn wait_timeout(&mut self, deadline: Duration) -> Result<()> {
        let result = tokio::time::timeout(deadline, self.wait()).await;
        match result {
            Ok(()) => Ok(()),
            Err(_) => {
                tracing::warn!(
                    ?deadline,
                    remaining = self.pending,
                    "deadline elapsed before all signalers completed"
                );
                Err(Error::Elapsed {
                    deadline,
                    remaining: self.pending,
                })
            }
        }
    }

    /// Waits under the deadline set on the [`Builder`], if any.
    pub async fn wait_deadline(&mut self) -> Result<()> {
        match self.deadline {
            Some(deadline) => self.wait_timeout(deadline).await,
            None => {
                self.wait().await;
                Ok(())
            }
        }
    }
}

impl Default for SignalWait {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for a [`SignalWait`].
///
/// ```rust,ignore
/// let waiter = SignalWait::builder()
///     .deadline(Duration::from_secs(5))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    capacity: usize,
    deadline: Option<Duration>,
}

impl Builder {
    /// Queue capacity of one and no deadline.
    pub fn new() -> Self {
        Self {
            capacity: 1,
            deadline: None,
        }
    }

    /// Sets how many completion reports may be buffered before reporting
    /// tasks have to wait for the owner to drain.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn capacity(mut self, n: usize) -> Self {
        assert!(n > 0, "capacity must be > 0");

        self.capacity = n;
        self
    }

    /// Deadline used by [`SignalWait::wait_deadline`].
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn build(self) -> SignalWait {
        let (tx, rx) = mpsc::channel(self.capacity);
        SignalWait {
            pending: 0,
            deadline: self.deadline,
            tx,
            rx,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
