use crate::error::BridgeResult;
use crossload_model::{InterpClass, InterpError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

pub type ClassProducer = Box<dyn FnOnce() -> Result<Arc<InterpClass>, InterpError> + Send>;

/// A pending compilation: either a class, or a producer that yields one when run.
pub enum CompilationTask {
    Ready(Arc<InterpClass>),
    Deferred(ClassProducer),
}

impl CompilationTask {
    pub fn deferred<F>(producer: F) -> Self
    where
        F: FnOnce() -> Result<Arc<InterpClass>, InterpError> + Send + 'static,
    {
        CompilationTask::Deferred(Box::new(producer))
    }

    pub fn into_class(self) -> Result<Arc<InterpClass>, InterpError> {
        match self {
            CompilationTask::Ready(class) => Ok(class),
            CompilationTask::Deferred(producer) => producer(),
        }
    }
}

impl From<Arc<InterpClass>> for CompilationTask {
    fn from(class: Arc<InterpClass>) -> Self {
        CompilationTask::Ready(class)
    }
}

impl fmt::Debug for CompilationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilationTask::Ready(class) => f.debug_tuple("Ready").field(&class.qualname()).finish(),
            CompilationTask::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// FIFO of classes waiting to be compiled.
///
/// Tasks may enqueue further tasks while they run; those are appended at the
/// tail and processed by the same drain.
#[derive(Debug, Default)]
pub struct CompilationQueue {
    tasks: Mutex<VecDeque<CompilationTask>>,
}

impl CompilationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, task: impl Into<CompilationTask>) {
        let task = task.into();
        log::debug!("Enqueued {:?}", task);
        self.tasks.lock().push_back(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    /// Pops and compiles tasks in order until the queue is empty.
    ///
    /// The first failure is returned immediately. The failing task has been
    /// consumed; every task behind it stays queued for the next drain.
    /// Returns how many tasks completed.
    pub fn drain<T, F>(&self, mut compile: F) -> BridgeResult<usize>
    where
        F: FnMut(Arc<InterpClass>) -> BridgeResult<T>,
    {
        let mut processed = 0;
        loop {
            // The lock is released before the task runs so that it can enqueue.
            let next = self.tasks.lock().pop_front();
            let Some(task) = next else { break };
            let class = task.into_class()?;
            compile(class)?;
            processed += 1;
        }
        if processed > 0 {
            log::debug!("Compilation queue drained ({} tasks)", processed);
        }
        Ok(processed)
    }
}
