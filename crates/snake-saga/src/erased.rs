use async_trait::async_trait;

use crate::action::{Action, StateWriter};
use crate::instance::{ActionEntry, ActionInstance};

/// Control surface the saga drives a registered action through.
///
/// Flipping the lifecycle flags is only possible here, and nothing outside the
/// crate can reach it.
#[async_trait]
pub(crate) trait ErasedAction<E>: ActionEntry {
    fn entry(&self) -> &dyn ActionEntry;

    async fn apply(&mut self) -> Result<(), E>;

    async fn compensate(&mut self) -> Result<(), E>;

    fn compensation_description(&self) -> String;

    fn mark_ran(&mut self);

    fn mark_reverted(&mut self);
}

#[async_trait]
impl<A> ErasedAction<A::Error> for ActionInstance<A>
where
    A: Action,
{
    fn entry(&self) -> &dyn ActionEntry {
        self
    }

    async fn apply(&mut self) -> Result<(), A::Error> {
        let (action, props, state) = self.parts_mut();
        let mut writer = StateWriter::new(state);
        action.apply(props, &mut writer).await
    }

    async fn compensate(&mut self) -> Result<(), A::Error> {
        let (action, props, state) = self.parts_mut();
        let mut writer = StateWriter::new(state);
        action.compensate(props, &mut writer).await
    }

    fn compensation_description(&self) -> String {
        self.action().compensation_description()
    }

    fn mark_ran(&mut self) {
        self.set_ran();
    }

    fn mark_reverted(&mut self) {
        self.set_reverted();
    }
}
