use std::path::Path;

use tracing::debug;

use super::commit_and_report;
use crate::error::Result;
use crate::plan::Plan;

pub(super) async fn run(path: &Path, force_rollback: bool) -> Result<()> {
    let plan = Plan::load(path)?;
    debug!(path = %path.display(), actions = plan.actions.len(), "loaded plan");

    let mut options = plan.options;
    if force_rollback {
        options = options.with_force_rollback(true);
    }

    commit_and_report(plan.into_saga(), options).await
}
