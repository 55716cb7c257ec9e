use crate::error::Result;
use crate::io::discover::{InputFile, InputKind};
use crate::report::RunReport;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::Path;
use std::sync::mpsc;
use tracing::{debug, info};

/// Bounded pool for archive tasks.
///
/// Archives are queued on a fixed number of worker threads instead of getting
/// one thread each. [`ArchivePool::run`] returns only after every queued
/// archive has finished, and each task hands its report back over a channel.
pub struct ArchivePool {
    pool: ThreadPool,
}

impl ArchivePool {
    /// Build a pool with `workers` threads (at least one).
    ///
    /// # Errors
    /// Returns an error if the threads cannot be spawned.
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("archive-{i}"))
            .build()?;
        debug!(workers, "archive pool ready");
        Ok(Self { pool })
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Drain `inputs` on the calling thread.
    ///
    /// JSON files go to `on_json` right away, in walk order. Archives are
    /// queued on the pool and handed to `on_archive`. Reports from both are
    /// merged into one.
    pub fn run<I, J, A>(&self, inputs: I, mut on_json: J, on_archive: A) -> RunReport
    where
        I: IntoIterator<Item = InputFile>,
        J: FnMut(&Path) -> RunReport,
        A: Fn(&Path) -> RunReport + Sync,
    {
        let (tx, rx) = mpsc::channel::<RunReport>();
        let mut report = RunReport::default();
        let on_archive = &on_archive;

        self.pool.in_place_scope(|scope| {
            for input in inputs {
                match input.kind {
                    InputKind::Json => report.merge(on_json(&input.path)),
                    InputKind::Archive => {
                        info!(archive = %input.path.display(), "queueing archive");
                        let tx = tx.clone();
                        let path = input.path;
                        scope.spawn(move |_| {
                            // Receiver outlives the scope.
                            let _ = tx.send(on_archive(&path));
                        });
                    }
                }
            }
        });
        drop(tx);

        for task in rx {
            report.merge(task);
        }
        report
    }
}
