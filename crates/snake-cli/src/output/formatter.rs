use snake_saga::{Instances, SagaAuditLog};

/// Renders the outcome of a commit for the terminal.
pub(crate) trait ReportFormatter {
    fn format_success<E>(&self, instances: Instances<'_, E>, audit_log: &SagaAuditLog) -> String;
    fn format_failure<E>(&self, instances: Instances<'_, E>, audit_log: &SagaAuditLog) -> String;
}
