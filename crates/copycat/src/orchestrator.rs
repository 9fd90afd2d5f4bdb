//! Filter-and-publish copy operations.
//!
//! Messages are taken from the [`MessageSource`] on the calling thread.
//! Header filtering runs on tokio's blocking pool so that a large body or an
//! expensive pattern never stalls the caller. Only the filtered `String`
//! comes back; the sink and the logger are invoked on the thread that started
//! the copy. Sources, sinks and loggers are held in `Rc` and need not be
//! `Send`, so a host can hand in UI-bound implementations.
//!
//! Background copies go through [`CopyOrchestrator::dispatch`], which spawns
//! onto the current [`LocalSet`](tokio::task::LocalSet).

use std::rc::Rc;
use std::sync::Arc;

use tokio::task::JoinError;
use tracing::{debug, error};

use crate::error::Error;
use crate::filter::MessageFilter;
use crate::logging::TracingLogger;
use crate::message::{LineEnding, MessageKind, RawMessage};
use crate::ports::{Logger, MessageSource, ResultSink};
use crate::settings::Settings;

/// How a copy operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Filtered text was handed to the sink.
    Published,
    /// There was nothing to copy, or filtering failed. Nothing was published.
    NothingAvailable,
}

/// Runs copy operations against the current exclusion patterns.
pub struct CopyOrchestrator {
    settings: Arc<Settings>,
    sink: Rc<dyn ResultSink>,
    logger: Rc<dyn Logger>,
    line_ending: LineEnding,
}

impl CopyOrchestrator {
    /// Create an orchestrator that publishes to `sink`.
    #[must_use]
    pub fn new(settings: Arc<Settings>, sink: Rc<dyn ResultSink>) -> Self {
        Self {
            settings,
            sink,
            logger: Rc::new(TracingLogger),
            line_ending: LineEnding::default(),
        }
    }

    /// Record activity lines through a custom logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Rc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Set the terminator used to reassemble messages.
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// The settings whose patterns this orchestrator applies.
    #[must_use]
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Copy the current request.
    pub async fn copy_request(&self, source: &dyn MessageSource) -> Outcome {
        self.copy(MessageKind::Request, source).await
    }

    /// Copy the current response.
    pub async fn copy_response(&self, source: &dyn MessageSource) -> Outcome {
        self.copy(MessageKind::Response, source).await
    }

    /// Copy the request and response, separated by a blank line.
    ///
    /// If only one side is available it is copied alone.
    pub async fn copy_both(&self, source: &dyn MessageSource) -> Outcome {
        self.copy(MessageKind::Exchange, source).await
    }

    /// Copy a message of the given kind.
    pub async fn copy(&self, kind: MessageKind, source: &dyn MessageSource) -> Outcome {
        let (request, response) = match kind {
            MessageKind::Request => (source.current(kind), None),
            MessageKind::Response => (None, source.current(kind)),
            MessageKind::Exchange => (source.current_request(), source.current_response()),
        };

        if request.is_none() && response.is_none() {
            self.logger.info(&Error::no_message(kind).to_string());
            return Outcome::NothingAvailable;
        }

        // Each side gets its own worker; the snapshot is shared read-only
        let filter = MessageFilter::new(self.settings.rules()).with_line_ending(self.line_ending);
        debug!(%kind, generation = filter.rules().generation(), "Filtering");
        let (request, response) = tokio::join!(
            filter_on_worker(filter.clone(), request),
            filter_on_worker(filter, response),
        );

        let (request, response) = match (request, response) {
            (Ok(request), Ok(response)) => (request, response),
            (Err(e), _) | (_, Err(e)) => {
                let err = Error::internal(format!("filter worker for {kind} failed: {e}"));
                error!(error = %err, "Copy failed");
                self.logger.error(&err.to_string());
                return Outcome::NothingAvailable;
            }
        };

        let text = match (request, response) {
            (Some(request), Some(response)) => {
                let separator = self.line_ending.as_str().repeat(2);
                format!("{request}{separator}{response}")
            }
            (Some(text), None) | (None, Some(text)) => text,
            (None, None) => {
                self.logger.info(&Error::no_message(kind).to_string());
                return Outcome::NothingAvailable;
            }
        };

        self.sink.publish(&text);
        self.logger
            .info(&format!("{} copied (headers filtered)", kind.label()));
        Outcome::Published
    }

    /// Start a copy in the background and return immediately.
    ///
    /// The copy runs as a local task, so it publishes on the thread driving
    /// the current `LocalSet`.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a `LocalSet`.
    pub fn dispatch(
        self: &Rc<Self>,
        kind: MessageKind,
        source: Rc<dyn MessageSource>,
    ) -> tokio::task::JoinHandle<Outcome> {
        let orchestrator = Rc::clone(self);
        tokio::task::spawn_local(async move { orchestrator.copy(kind, source.as_ref()).await })
    }
}

impl std::fmt::Debug for CopyOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopyOrchestrator")
            .field("settings", &self.settings)
            .field("line_ending", &self.line_ending)
            .finish_non_exhaustive()
    }
}

async fn filter_on_worker(
    filter: MessageFilter,
    message: Option<RawMessage>,
) -> Result<Option<String>, JoinError> {
    match message {
        Some(message) => {
            tokio::task::spawn_blocking(move || filter.filter(&message))
                .await
                .map(Some)
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::thread::{self, ThreadId};

    use tokio::task::LocalSet;

    use super::*;
    use crate::adapters::{MemoryLog, MemorySink, Severity, StaticSource};

    const REQUEST: &str =
        "POST /api HTTP/1.1\r\nHost: example.com\r\nContent-Length: 5\r\nX-Custom: v\r\n\r\nhello";
    const RESPONSE: &str = "HTTP/1.1 200 OK\r\nConnection: close\r\nX-Id: 7\r\n\r\nok";

    struct Fixture {
        orchestrator: Rc<CopyOrchestrator>,
        sink: Rc<MemorySink>,
        log: Rc<MemoryLog>,
    }

    fn fixture() -> Fixture {
        let sink = Rc::new(MemorySink::new());
        let log = Rc::new(MemoryLog::new());
        let orchestrator = CopyOrchestrator::new(Arc::new(Settings::default()), sink.clone())
            .with_logger(log.clone());
        Fixture {
            orchestrator: Rc::new(orchestrator),
            sink,
            log,
        }
    }

    #[tokio::test]
    async fn test_copy_request() {
        let f = fixture();
        let source = StaticSource::request(REQUEST);

        let outcome = f.orchestrator.copy_request(&source).await;
        assert_eq!(outcome, Outcome::Published);
        assert_eq!(
            f.sink.last().unwrap(),
            "POST /api HTTP/1.1\r\nX-Custom: v\r\n\r\nhello"
        );
        assert_eq!(
            f.log.lines(Severity::Info),
            vec!["Request copied (headers filtered)"]
        );
    }

    #[tokio::test]
    async fn test_copy_response() {
        let f = fixture();
        let source = StaticSource::exchange(REQUEST, RESPONSE);

        assert_eq!(f.orchestrator.copy_response(&source).await, Outcome::Published);
        assert_eq!(f.sink.last().unwrap(), "HTTP/1.1 200 OK\r\nX-Id: 7\r\n\r\nok");
    }

    #[tokio::test]
    async fn test_copy_missing_message() {
        let f = fixture();
        let source = StaticSource::response(RESPONSE);

        let outcome = f.orchestrator.copy_request(&source).await;
        assert_eq!(outcome, Outcome::NothingAvailable);
        assert!(f.sink.published().is_empty());
        assert_eq!(
            f.log.lines(Severity::Info),
            vec!["no request available to copy"]
        );
    }

    #[tokio::test]
    async fn test_copy_both() {
        let f = fixture();
        let source = StaticSource::exchange(REQUEST, RESPONSE);

        assert_eq!(f.orchestrator.copy_both(&source).await, Outcome::Published);
        assert_eq!(
            f.sink.last().unwrap(),
            "POST /api HTTP/1.1\r\nX-Custom: v\r\n\r\nhello\r\n\r\nHTTP/1.1 200 OK\r\nX-Id: 7\r\n\r\nok"
        );
        assert_eq!(
            f.log.lines(Severity::Info),
            vec!["Request+Response copied (headers filtered)"]
        );
    }

    #[tokio::test]
    async fn test_copy_both_with_only_request() {
        let f = fixture();
        let source = StaticSource::request(REQUEST);

        assert_eq!(f.orchestrator.copy_both(&source).await, Outcome::Published);
        assert_eq!(
            f.sink.last().unwrap(),
            "POST /api HTTP/1.1\r\nX-Custom: v\r\n\r\nhello"
        );
    }

    #[tokio::test]
    async fn test_copy_both_with_nothing() {
        let f = fixture();
        let outcome = f.orchestrator.copy_both(&StaticSource::default()).await;
        assert_eq!(outcome, Outcome::NothingAvailable);
        assert!(f.sink.published().is_empty());
        assert_eq!(
            f.log.lines(Severity::Info),
            vec!["no request/response available to copy"]
        );
    }

    #[tokio::test]
    async fn test_copy_uses_current_patterns() {
        let f = fixture();
        let source = StaticSource::request(REQUEST);

        f.orchestrator.settings().add_pattern("x-.*");
        f.orchestrator.copy_request(&source).await;
        assert_eq!(f.sink.last().unwrap(), "POST /api HTTP/1.1\r\n\r\nhello");
    }

    #[tokio::test]
    async fn test_copy_with_lf_line_ending() {
        let sink = Rc::new(MemorySink::new());
        let orchestrator = CopyOrchestrator::new(Arc::new(Settings::default()), sink.clone())
            .with_line_ending(LineEnding::Lf);
        let source = StaticSource::exchange(REQUEST, RESPONSE);

        orchestrator.copy_both(&source).await;
        assert_eq!(
            sink.last().unwrap(),
            "POST /api HTTP/1.1\nX-Custom: v\n\nhello\n\nHTTP/1.1 200 OK\nX-Id: 7\n\nok"
        );
    }

    #[tokio::test]
    async fn test_dispatch() {
        let f = fixture();
        let source: Rc<dyn MessageSource> = Rc::new(StaticSource::request(REQUEST));

        let outcome = LocalSet::new()
            .run_until(async {
                f.orchestrator
                    .dispatch(MessageKind::Request, source)
                    .await
                    .unwrap()
            })
            .await;
        assert_eq!(outcome, Outcome::Published);
        assert_eq!(f.sink.published().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_copies() {
        let f = fixture();
        let source: Rc<dyn MessageSource> = Rc::new(StaticSource::exchange(REQUEST, RESPONSE));

        LocalSet::new()
            .run_until(async {
                let handles: Vec<_> = (0..8)
                    .map(|_| {
                        f.orchestrator
                            .dispatch(MessageKind::Exchange, Rc::clone(&source))
                    })
                    .collect();
                for handle in handles {
                    assert_eq!(handle.await.unwrap(), Outcome::Published);
                }
            })
            .await;

        let published = f.sink.published();
        assert_eq!(published.len(), 8);
        assert!(published.windows(2).all(|w| w[0] == w[1]));
    }

    /// Records the thread each publication happens on. Not `Send`.
    #[derive(Default)]
    struct ThreadRecordingSink {
        threads: RefCell<Vec<ThreadId>>,
    }

    impl ResultSink for ThreadRecordingSink {
        fn publish(&self, _text: &str) {
            self.threads.borrow_mut().push(thread::current().id());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dispatch_publishes_on_calling_thread() {
        let sink = Rc::new(ThreadRecordingSink::default());
        let orchestrator = Rc::new(CopyOrchestrator::new(
            Arc::new(Settings::default()),
            sink.clone(),
        ));
        let source: Rc<dyn MessageSource> = Rc::new(StaticSource::exchange(REQUEST, RESPONSE));

        let caller = LocalSet::new()
            .run_until(async {
                let caller = thread::current().id();
                let handles: Vec<_> = [MessageKind::Request, MessageKind::Exchange]
                    .into_iter()
                    .map(|kind| orchestrator.dispatch(kind, Rc::clone(&source)))
                    .collect();
                for handle in handles {
                    assert_eq!(handle.await.unwrap(), Outcome::Published);
                }
                caller
            })
            .await;

        let threads = sink.threads.borrow();
        assert_eq!(threads.len(), 2);
        assert!(threads.iter().all(|id| *id == caller));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_copy_publishes_on_calling_thread() {
        let sink = Rc::new(ThreadRecordingSink::default());
        let orchestrator = CopyOrchestrator::new(Arc::new(Settings::default()), sink.clone());

        let caller = thread::current().id();
        orchestrator
            .copy_both(&StaticSource::exchange(REQUEST, RESPONSE))
            .await;
        assert_eq!(*sink.threads.borrow(), vec![caller]);
    }

    #[tokio::test]
    async fn test_empty_message_is_published() {
        let f = fixture();
        let outcome = f.orchestrator.copy_request(&StaticSource::request("")).await;
        assert_eq!(outcome, Outcome::Published);
        assert_eq!(f.sink.last().unwrap(), "");
    }

    #[test]
    fn test_orchestrator_debug() {
        let f = fixture();
        let debug_str = format!("{:?}", f.orchestrator);
        assert!(debug_str.contains("CopyOrchestrator"));
    }
}
