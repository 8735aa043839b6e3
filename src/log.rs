use std::sync::Arc;

use spin::Mutex;

/// Sink for the messages emitted by [`Signaler::with_logging`].
///
/// [`Signaler::with_logging`]: crate::Signaler::with_logging
pub trait CompletionLog: Send + Sync {
    fn info(&self, message: &str);
}

/// Forwards every message to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl CompletionLog for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Keeps every message in memory, in the order they were logged.
#[derive(Debug, Default, Clone)]
pub struct MemoryLog(Arc<Mutex<Vec<String>>>);

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

impl CompletionLog for MemoryLog {
    fn info(&self, message: &str) {
        self.0.lock().push(message.to_owned());
    }
}

impl<L: CompletionLog + ?Sized> CompletionLog for Arc<L> {
    fn info(&self, message: &str) {
        (**self).info(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_log_keeps_order() {
        let log = MemoryLog::new();
        assert!(log.is_empty());

        let shared = log.clone();
        shared.info("first");
        shared.info("second");

        assert_eq!(log.len(), 2);
        assert_eq!(log.messages(), vec!["first", "second"]);
    }

    #[test]
    fn arc_forwards() {
        let log = MemoryLog::new();
        let dynamic: Arc<dyn CompletionLog> = Arc::new(log.clone());
        dynamic.info("through arc");
        assert_eq!(log.messages(), vec!["through arc"]);
    }
}
