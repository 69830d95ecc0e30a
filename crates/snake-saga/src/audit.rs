use std::time::Instant;

/// Status of an action in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    /// Action applied successfully.
    Executed,
    /// Action failed during apply.
    Failed,
    /// Action was compensated successfully.
    Compensated,
    /// Action compensation failed.
    CompensationFailed,
}

/// Record of one action's run through the saga.
#[derive(Debug)]
pub struct StepRecord {
    /// Name of the action.
    pub name: String,
    /// Registry position of the action.
    pub position: usize,
    /// Current status.
    pub status: StepStatus,
    /// When the action started applying.
    pub started_at: Instant,
    /// When the action completed (apply or compensation).
    pub completed_at: Option<Instant>,
    /// Description of compensation (if applicable).
    pub compensation_description: Option<String>,
    /// Sequence number of the successful apply.
    pub applied_seq: Option<u64>,
    /// Sequence number of the compensation attempt.
    pub compensated_seq: Option<u64>,
}

/// Audit log tracking every apply and compensation of a commit.
///
/// Applies and compensations draw from one sequence counter, so comparing
/// `applied_seq` and `compensated_seq` across records shows the exact order
/// in which the saga touched its actions.
#[derive(Debug, Default)]
pub struct SagaAuditLog {
    records: Vec<StepRecord>,
    next_seq: u64,
}

impl SagaAuditLog {
    /// Create a new empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn record_mut(&mut self, position: usize) -> Option<&mut StepRecord> {
        self.records
            .iter_mut()
            .find(|record| record.position == position)
    }

    /// Record an action starting to apply.
    pub(crate) fn record_start(&mut self, position: usize, name: &str) {
        self.records.push(StepRecord {
            name: name.to_string(),
            position,
            status: StepStatus::Executed,
            started_at: Instant::now(),
            completed_at: None,
            compensation_description: None,
            applied_seq: None,
            compensated_seq: None,
        });
    }

    /// Mark an action's apply as failed.
    pub(crate) fn record_failure(&mut self, position: usize) {
        if let Some(record) = self.record_mut(position) {
            record.status = StepStatus::Failed;
            record.completed_at = Some(Instant::now());
        }
    }

    /// Mark an action as applied.
    pub(crate) fn record_success(&mut self, position: usize, compensation_description: String) {
        let seq = self.next_seq();
        if let Some(record) = self.record_mut(position) {
            record.status = StepStatus::Executed;
            record.completed_at = Some(Instant::now());
            record.compensation_description = Some(compensation_description);
            record.applied_seq = Some(seq);
        }
    }

    /// Record that an action was compensated.
    pub(crate) fn record_compensated(&mut self, position: usize) {
        self.record_compensation(position, StepStatus::Compensated);
    }

    /// Record that an action's compensation failed.
    pub(crate) fn record_compensation_failed(&mut self, position: usize) {
        self.record_compensation(position, StepStatus::CompensationFailed);
    }

    fn record_compensation(&mut self, position: usize, status: StepStatus) {
        let seq = self.next_seq();
        if let Some(record) = self.record_mut(position) {
            record.status = status;
            record.completed_at = Some(Instant::now());
            record.compensated_seq = Some(seq);
        }
    }

    /// Get all records in the audit log, in registry order.
    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Positions of compensated actions, in the order they were compensated.
    #[must_use]
    pub fn compensation_order(&self) -> Vec<usize> {
        let mut compensated: Vec<_> = self
            .records
            .iter()
            .filter_map(|record| record.compensated_seq.map(|seq| (seq, record.position)))
            .collect();
        compensated.sort_unstable();
        compensated.into_iter().map(|(_, position)| position).collect()
    }

    /// Get a summary of the saga execution for display.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for record in &self.records {
            let status = match record.status {
                StepStatus::Executed => "✓",
                StepStatus::Failed => "✗",
                StepStatus::Compensated => "↩",
                StepStatus::CompensationFailed => "⚠",
            };
            lines.push(format!("{status} {}", record.name));
        }
        lines.join("\n")
    }
}
