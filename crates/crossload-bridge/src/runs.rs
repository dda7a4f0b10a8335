use crate::error::{BridgeError, BridgeResult};
use crossload_model::Value;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(String);

impl RunId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RunId {
    fn from(id: &str) -> Self {
        RunId(id.to_string())
    }
}

impl From<String> for RunId {
    fn from(id: String) -> Self {
        RunId(id)
    }
}

impl From<u64> for RunId {
    fn from(id: u64) -> Self {
        RunId(id.to_string())
    }
}

/// Keeps interpreted values alive while the managed side runs a solve.
///
/// The retained values are never read; holding them is the whole point.
#[derive(Debug, Default)]
pub struct SolverRunRegistry {
    runs: Mutex<FxHashMap<RunId, Vec<Value>>>,
}

impl SolverRunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retains `referenced` for `run_id`, replacing anything retained before.
    pub fn begin(&self, run_id: impl Into<RunId>, referenced: Vec<Value>) {
        let run_id = run_id.into();
        log::debug!("Run {} retaining {} values", run_id, referenced.len());
        let replaced = self.runs.lock().insert(run_id, referenced);
        // Dropped outside the lock.
        drop(replaced);
    }

    /// Releases everything retained for `run_id`.
    pub fn end(&self, run_id: impl Into<RunId>) -> BridgeResult<()> {
        let run_id = run_id.into();
        let released = self.runs.lock().remove(&run_id);
        match released {
            Some(values) => {
                log::debug!("Run {} released {} values", run_id, values.len());
                Ok(())
            }
            None => Err(BridgeError::RunNotFound(run_id)),
        }
    }

    pub fn is_active(&self, run_id: &RunId) -> bool {
        self.runs.lock().contains_key(run_id)
    }

    pub fn active_runs(&self) -> usize {
        self.runs.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossload_model::{Instance, InterpClass};
    use std::sync::Arc;

    #[test]
    fn begin_overwrites_and_end_releases() {
        let runs = SolverRunRegistry::new();
        let class = InterpClass::builder("Lesson").build();
        let first = Instance::new(class.clone(), Vec::new());
        let weak_first = Arc::downgrade(&first);

        runs.begin("run-1", vec![Value::Instance(first)]);
        assert!(weak_first.upgrade().is_some());

        runs.begin("run-1", vec![Value::Int(3)]);
        assert!(weak_first.upgrade().is_none());
        assert_eq!(runs.active_runs(), 1);

        runs.end("run-1").unwrap();
        assert!(!runs.is_active(&"run-1".into()));
    }

    #[test]
    fn ending_an_unknown_run_fails() {
        let runs = SolverRunRegistry::new();
        let err = runs.end(7_u64).unwrap_err();
        assert!(matches!(err, BridgeError::RunNotFound(ref id) if id.as_str() == "7"));
    }
}
