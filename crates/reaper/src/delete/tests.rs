use super::{FailurePolicy, context::RunContext};
use crate::{
    Backend, BackendError, Deleter, Error, FileType, Handle, ID_LEN, IdSet, LocalBackend,
    MemoryBackend, NoopPrinter, ObjectId, Printer, Progress, ProgressCounter,
};
use core::{fmt, time::Duration};
use parking_lot::Mutex;
use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
};
use tokio_util::sync::CancellationToken;

const SLOW: Duration = Duration::from_millis(100);

fn id(n: u8) -> ObjectId {
    ObjectId::from([n; ID_LEN])
}

fn wide_id(n: u16) -> ObjectId {
    let mut bytes = [0_u8; ID_LEN];
    bytes[..2].copy_from_slice(&n.to_be_bytes());
    ObjectId::from(bytes)
}

fn set(ids: impl IntoIterator<Item = u8>) -> IdSet {
    ids.into_iter().map(id).collect()
}

/// Backend double that records every call and fails on demand.
#[derive(Default)]
struct ScriptedBackend {
    calls: Mutex<Vec<Handle>>,
    failing: HashSet<ObjectId>,
    slow: HashSet<ObjectId>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl ScriptedBackend {
    fn failing(ids: impl IntoIterator<Item = ObjectId>) -> Self {
        Self {
            failing: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    fn called_ids(&self) -> Vec<ObjectId> {
        self.calls.lock().iter().map(|h| h.id).collect()
    }

    fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Backend for ScriptedBackend {
    async fn remove(&self, handle: &Handle) -> Result<(), BackendError> {
        let n = {
            let mut calls = self.calls.lock();
            calls.push(*handle);
            calls.len()
        };

        if self.slow.contains(&handle.id) {
            tokio::time::sleep(SLOW).await;
        }

        if let Some((after, token)) = &self.cancel_after {
            if n == *after {
                token.cancel();
            }
        }

        if self.failing.contains(&handle.id) {
            Err(BackendError::Unavailable {
                reason: format!("injected failure for {}", handle.id.short()),
            })
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
struct RecordingPrinter {
    warnings: Mutex<Vec<String>>,
    traces: Mutex<Vec<String>>,
}

impl Printer for RecordingPrinter {
    fn warn(&self, msg: fmt::Arguments<'_>) {
        self.warnings.lock().push(msg.to_string());
    }

    fn verbose(&self, msg: fmt::Arguments<'_>) {
        self.traces.lock().push(msg.to_string());
    }
}

#[derive(Default)]
struct CountingProgress {
    total: AtomicU64,
    added: AtomicU64,
    done: AtomicUsize,
}

impl CountingProgress {
    fn added(&self) -> u64 {
        self.added.load(Ordering::SeqCst)
    }

    fn done(&self) -> usize {
        self.done.load(Ordering::SeqCst)
    }
}

impl Progress for CountingProgress {
    fn start(&self, total: u64) {
        self.total.store(total, Ordering::SeqCst);
    }

    fn add(&self, n: u64) {
        self.added.fetch_add(n, Ordering::SeqCst);
    }

    fn done(&self) {
        self.done.fetch_add(1, Ordering::SeqCst);
    }
}

struct Harness<B> {
    deleter: Deleter<B>,
    backend: Arc<B>,
    printer: Arc<RecordingPrinter>,
    progress: Arc<CountingProgress>,
}

fn harness<B: Backend>(backend: B, workers: usize) -> Harness<B> {
    let backend = Arc::new(backend);
    let printer = Arc::new(RecordingPrinter::default());
    let progress = Arc::new(CountingProgress::default());
    let deleter = Deleter::new(Arc::clone(&backend))
        .with_workers(workers)
        .with_printer(printer.clone())
        .with_progress(progress.clone());
    Harness {
        deleter,
        backend,
        printer,
        progress,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn all_successes_best_effort() {
    let h = harness(ScriptedBackend::default(), 8);
    let ids = set(1..=3);

    let summary = h.deleter.delete_files(&ids, FileType::Pack).await;

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.removed, 3);
    assert_eq!(summary.failed, 0);
    assert!(!summary.cancelled);
    assert!(summary.is_complete());
    assert_eq!(h.progress.added(), 3);
    assert_eq!(h.progress.total.load(Ordering::SeqCst), 3);
    assert_eq!(h.progress.done(), 1);
    assert!(h.printer.warnings.lock().is_empty());
    assert_eq!(h.printer.traces.lock().len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn single_failure_best_effort_warns_and_counts() {
    let h = harness(ScriptedBackend::failing([id(1)]), 8);
    let ids = set(1..=2);

    let summary = h.deleter.delete_files(&ids, FileType::Pack).await;

    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.removed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(h.progress.added(), 2);
    assert_eq!(h.progress.done(), 1);

    let warnings = h.printer.warnings.lock();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0],
        "unable to remove <data/01010101> from the repository"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn fail_fast_stops_dispatching_after_first_error() {
    let h = harness(ScriptedBackend::failing([id(2)]), 1);
    let ids = set(1..=4);

    let err = h
        .deleter
        .delete_files_checked(&ids, FileType::Index)
        .await
        .unwrap_err();

    match &err {
        Error::Removal { handle, source } => {
            assert_eq!(*handle, Handle::new(FileType::Index, id(2)));
            assert!(matches!(source, BackendError::Unavailable { .. }));
        }
        other => panic!("expected removal failure, got {other:?}"),
    }
    assert_eq!(h.backend.called_ids(), vec![id(1), id(2)]);
    assert_eq!(h.progress.added(), 1);
    assert_eq!(h.progress.done(), 1);
    assert_eq!(h.printer.warnings.lock().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn cancelled_before_start_issues_no_removals() {
    let h = harness(ScriptedBackend::default(), 8);
    let cancel = h.deleter.cancellation_token();
    cancel.cancel();
    let ids = set(1..=5);

    let err = h
        .deleter
        .delete_files_checked(&ids, FileType::Snapshot)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(h.backend.call_count(), 0);
    assert_eq!(h.progress.added(), 0);
    assert_eq!(h.progress.done(), 1);
    assert!(h.printer.warnings.lock().is_empty());

    let summary = h.deleter.delete_files(&ids, FileType::Snapshot).await;
    assert!(summary.cancelled);
    assert_eq!(summary.attempted, 0);
    assert_eq!(summary.skipped(), 5);
    assert_eq!(h.progress.done(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn every_id_is_removed_exactly_once() {
    let ids: IdSet = (0..1000).map(wide_id).collect();

    for workers in [1, 3, 8, 64] {
        let h = harness(ScriptedBackend::default(), workers);
        let summary = h
            .deleter
            .delete_files_checked(&ids, FileType::Pack)
            .await
            .unwrap();

        assert_eq!(summary.removed, 1000, "workers = {workers}");
        assert_eq!(h.progress.added(), 1000, "workers = {workers}");

        let mut called = h.backend.called_ids();
        called.sort();
        let expected: Vec<_> = ids.iter().copied().collect();
        assert_eq!(called, expected, "workers = {workers}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn drains_a_memory_backend() {
    let ids: IdSet = (0..500).map(wide_id).collect();
    let backend = MemoryBackend::with_objects(FileType::Key, &ids);
    let h = harness(backend, 8);

    let summary = h.deleter.delete_files(&ids, FileType::Key).await;

    assert_eq!(summary.removed, 500);
    assert!(h.backend.is_empty());

    // A second pass finds nothing left and only warns.
    let summary = h.deleter.delete_files(&ids, FileType::Key).await;
    assert_eq!(summary.removed, 0);
    assert_eq!(summary.failed, 500);
    assert_eq!(summary.attempted, 500);
    assert_eq!(h.printer.warnings.lock().len(), 500);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn best_effort_succeeds_even_if_everything_fails() {
    let ids: IdSet = (0..100).map(wide_id).collect();
    let h = harness(ScriptedBackend::failing(ids.iter().copied()), 8);

    let (summary, err) = h
        .deleter
        .run(&ids, FileType::Lock, FailurePolicy::BestEffort)
        .await;

    assert!(err.is_none());
    assert_eq!(summary.attempted, 100);
    assert_eq!(summary.failed, 100);
    assert_eq!(summary.removed, 0);
    assert!(!summary.cancelled);
    assert_eq!(h.printer.warnings.lock().len(), 100);
    assert!(h.printer.traces.lock().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_failures_surface_one_error() {
    let ids: IdSet = (0..64).map(wide_id).collect();
    let h = harness(ScriptedBackend::failing(ids.iter().copied()), 8);

    let err = h
        .deleter
        .delete_files_checked(&ids, FileType::Pack)
        .await
        .unwrap_err();

    let handle = err.handle().copied().expect("removal failure");
    assert!(ids.contains(&handle.id));
    // Every failing worker stops without counting its item.
    assert_eq!(h.progress.added(), 0);
    assert_eq!(h.progress.done(), 1);
    let calls = h.backend.call_count();
    assert!((1..=8).contains(&calls), "calls = {calls}");
    assert_eq!(h.printer.warnings.lock().len(), calls);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn in_flight_removals_finish_and_count() {
    let backend = ScriptedBackend {
        failing: [id(2)].into_iter().collect(),
        slow: [id(1)].into_iter().collect(),
        ..ScriptedBackend::default()
    };
    let h = harness(backend, 2);
    let ids = set(1..=4);

    let err = h
        .deleter
        .delete_files_checked(&ids, FileType::Pack)
        .await
        .unwrap_err();

    assert_eq!(err.handle().map(|h| h.id), Some(id(2)));
    let mut called = h.backend.called_ids();
    called.sort();
    assert_eq!(called, vec![id(1), id(2)]);
    // The slow removal of id(1) was awaited and counted.
    assert_eq!(h.progress.added(), 1);
    assert_eq!(h.progress.done(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn external_cancellation_mid_run() {
    let cancel = CancellationToken::new();
    let backend = ScriptedBackend {
        cancel_after: Some((3, cancel.clone())),
        ..ScriptedBackend::default()
    };
    let h = harness(backend, 1);
    let deleter = h.deleter.with_cancellation(cancel.clone());
    let ids = set(1..=10);

    let err = deleter
        .delete_files_checked(&ids, FileType::Pack)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(h.backend.called_ids(), vec![id(1), id(2), id(3)]);
    assert_eq!(h.progress.added(), 3);
    assert_eq!(h.progress.done(), 1);
    assert!(h.printer.warnings.lock().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn external_cancellation_is_silent_for_best_effort() {
    let cancel = CancellationToken::new();
    let backend = ScriptedBackend {
        cancel_after: Some((2, cancel.clone())),
        ..ScriptedBackend::default()
    };
    let h = harness(backend, 1);
    let deleter = h.deleter.with_cancellation(cancel);
    let ids = set(1..=6);

    let summary = deleter.delete_files(&ids, FileType::Index).await;

    assert!(summary.cancelled);
    assert_eq!(summary.attempted, 2);
    assert_eq!(summary.removed, 2);
    assert_eq!(summary.skipped(), 4);
    assert!(!summary.is_complete());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn worker_failure_does_not_cancel_the_callers_token() {
    let h = harness(ScriptedBackend::failing([id(9)]), 4);

    let err = h
        .deleter
        .delete_files_checked(&set([9]), FileType::Pack)
        .await
        .unwrap_err();
    assert!(!err.is_cancelled());
    assert!(!h.deleter.cancellation_token().is_cancelled());

    let summary = h
        .deleter
        .delete_files_checked(&set(1..=3), FileType::Pack)
        .await
        .unwrap();
    assert_eq!(summary.removed, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn empty_set_finishes_progress_once() {
    let h = harness(ScriptedBackend::default(), 8);

    let summary = h
        .deleter
        .delete_files_checked(&IdSet::new(), FileType::Pack)
        .await
        .unwrap();

    assert_eq!(summary.total, 0);
    assert_eq!(summary.attempted, 0);
    assert!(summary.is_complete());
    assert_eq!(h.progress.done(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn zero_workers_is_a_config_error() {
    let h = harness(ScriptedBackend::default(), 0);
    let ids = set(1..=2);

    let err = h
        .deleter
        .delete_files_checked(&ids, FileType::Pack)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));

    let summary = h.deleter.delete_files(&ids, FileType::Pack).await;
    assert_eq!(summary.attempted, 0);
    assert_eq!(h.backend.call_count(), 0);
    assert_eq!(h.progress.done(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn removes_files_from_a_local_repository() {
    let dir = tempfile::tempdir().unwrap();
    let backend = LocalBackend::open(dir.path()).await.unwrap();
    let ids = set(1..=4);

    for n in 1..=3 {
        let path = backend.path_for(&Handle::new(FileType::Pack, id(n)));
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, [n]).unwrap();
    }

    let h = harness(backend, 8);
    let summary = h.deleter.delete_files(&ids, FileType::Pack).await;

    assert_eq!(summary.removed, 3);
    assert_eq!(summary.failed, 1);
    let warnings = h.printer.warnings.lock();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains(&id(4).short()));
    for n in 1..=3 {
        assert!(!h.backend.path_for(&Handle::new(FileType::Pack, id(n))).exists());
    }
}

#[test]
fn first_error_wins_and_cancels() {
    let cancel = CancellationToken::new();
    let ctx = RunContext::new(
        Arc::new(MemoryBackend::new()),
        Arc::new(NoopPrinter),
        ProgressCounter::start(Arc::new(CountingProgress::default()), 0),
        FileType::Pack,
        FailurePolicy::FailFast,
        cancel.clone(),
    );

    let handle = Handle::new(FileType::Pack, id(1));
    assert!(ctx.fail(Error::Removal {
        handle,
        source: BackendError::NotFound { handle },
    }));
    assert!(cancel.is_cancelled());
    assert!(!ctx.fail(Error::Cancelled));
    assert!(!ctx.fail(Error::Cancelled));

    let err = ctx.take_error().unwrap();
    assert_eq!(err.handle(), Some(&handle));
    assert!(ctx.take_error().is_none());
}
