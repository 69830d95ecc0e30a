use snake_saga::{CommitOptions, Saga};

use super::commit_and_report;
use crate::actions::{Counter, Fail, Toggle};
use crate::error::Result;

pub(super) async fn run(force_rollback: bool, fail: bool) -> Result<()> {
    let mut saga = Saga::new()
        .register(Toggle, "asd".to_string())
        .register(Toggle, "qwe".to_string())
        .register(Counter, 1);
    if fail {
        saga.add(Fail::new("demo"), 2);
    }

    commit_and_report(saga, CommitOptions::new().with_force_rollback(force_rollback)).await
}
