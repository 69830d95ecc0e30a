use snake_saga::{ActionEntry, ActionStatus, Instances, SagaAuditLog};

use super::ReportFormatter;

pub(crate) struct PlainTextFormatter;

impl PlainTextFormatter {
    fn status_glyph(status: ActionStatus) -> &'static str {
        match status {
            ActionStatus::Pending => "·",
            ActionStatus::Applied => "✓",
            ActionStatus::Compensated => "↩",
            ActionStatus::Inconsistent => "!",
            _ => "?",
        }
    }

    fn format_entry(output: &mut String, entry: &dyn ActionEntry) {
        output.push_str(&format!(
            "  {} {} props={} state={} ran={} reverted={}\n",
            Self::status_glyph(entry.status()),
            entry.name(),
            entry.describe_props(),
            entry.describe_state(),
            entry.ran(),
            entry.reverted(),
        ));
    }

    fn format_common_sections<E>(
        output: &mut String,
        instances: Instances<'_, E>,
        audit_log: &SagaAuditLog,
    ) {
        output.push_str("Actions:\n");
        for entry in instances.iter() {
            Self::format_entry(output, entry);
        }

        let summary = audit_log.summary();
        if !summary.is_empty() {
            output.push_str("\nAudit log:\n");
            for line in summary.lines() {
                output.push_str(&format!("  {line}\n"));
            }
        }
    }
}

impl ReportFormatter for PlainTextFormatter {
    fn format_success<E>(&self, instances: Instances<'_, E>, audit_log: &SagaAuditLog) -> String {
        let mut output = String::new();
        Self::format_common_sections(&mut output, instances, audit_log);
        let rolled_back = instances.iter().any(|entry| entry.reverted());
        if rolled_back {
            output.push_str("\nSaga committed and rolled back\n");
        } else {
            output.push_str("\nSaga committed\n");
        }
        output
    }

    fn format_failure<E>(&self, instances: Instances<'_, E>, audit_log: &SagaAuditLog) -> String {
        let mut output = String::new();
        Self::format_common_sections(&mut output, instances, audit_log);
        output.push_str("\nSaga failed\n");
        output
    }
}
