// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt;

/// Per-worker completion counters collected by the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    completions: Vec<usize>,
}

impl CompletionReport {
    pub fn new(completions: Vec<usize>) -> Self {
        Self { completions }
    }

    /// Completions indexed by worker id
    pub fn per_worker(&self) -> &[usize] {
        &self.completions
    }

    pub fn total(&self) -> usize {
        self.completions.iter().sum()
    }
}

impl fmt::Display for CompletionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (worker_id, count) in self.completions.iter().enumerate() {
            writeln!(f, "Worker {} did {} tasks", worker_id + 1, count)?;
        }
        write!(f, "Total: {}", self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_workers_one_based() {
        let report = CompletionReport::new(vec![2, 0, 3]);
        assert_eq!(report.total(), 5);
        assert_eq!(
            report.to_string(),
            "Worker 1 did 2 tasks\nWorker 2 did 0 tasks\nWorker 3 did 3 tasks\nTotal: 5"
        );
    }
}
