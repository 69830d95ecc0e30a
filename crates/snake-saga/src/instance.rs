use std::any::Any;
use std::fmt::{self, Debug};
use std::marker::PhantomData;

use crate::action::Action;

/// Lifecycle of a registered action, derived from its `ran`/`reverted` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionStatus {
    /// Not applied: never reached, or its apply failed.
    Pending,
    /// Applied and not compensated.
    Applied,
    /// Applied, then compensated.
    Compensated,
    /// Reverted without having run. The saga never produces this.
    Inconsistent,
}

impl ActionStatus {
    /// Status for a `(ran, reverted)` flag pair.
    #[must_use]
    pub fn from_flags(ran: bool, reverted: bool) -> Self {
        match (ran, reverted) {
            (false, false) => Self::Pending,
            (true, false) => Self::Applied,
            (true, true) => Self::Compensated,
            (false, true) => Self::Inconsistent,
        }
    }
}

/// Read-only view of a registered action, independent of its concrete type.
pub trait ActionEntry: Debug + Send + Sync {
    /// Name of the action.
    fn name(&self) -> &'static str;

    /// Position in the saga's registry, starting at zero.
    fn position(&self) -> usize;

    /// Whether the forward operation completed successfully.
    fn ran(&self) -> bool;

    /// Whether the compensating operation completed successfully.
    fn reverted(&self) -> bool;

    /// Lifecycle status derived from the flags.
    fn status(&self) -> ActionStatus {
        ActionStatus::from_flags(self.ran(), self.reverted())
    }

    /// Debug rendering of the props.
    fn describe_props(&self) -> String;

    /// Debug rendering of the current state.
    fn describe_state(&self) -> String;

    /// Access to the concrete [`ActionInstance`] for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// An action registered on a saga, together with its props, state and flags.
///
/// Props are fixed at registration. State is written only by the action
/// itself; the flags only by the saga.
pub struct ActionInstance<A: Action> {
    action: A,
    props: A::Props,
    state: A::State,
    position: usize,
    ran: bool,
    reverted: bool,
}

impl<A: Action> ActionInstance<A> {
    pub(crate) fn new(action: A, props: A::Props, position: usize) -> Self {
        let state = action.initial_state(&props);
        Self {
            action,
            props,
            state,
            position,
            ran: false,
            reverted: false,
        }
    }

    /// The action value this instance runs.
    #[must_use]
    pub fn action(&self) -> &A {
        &self.action
    }

    #[must_use]
    pub fn props(&self) -> &A::Props {
        &self.props
    }

    #[must_use]
    pub fn state(&self) -> &A::State {
        &self.state
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.action.name()
    }

    #[must_use]
    pub fn ran(&self) -> bool {
        self.ran
    }

    #[must_use]
    pub fn reverted(&self) -> bool {
        self.reverted
    }

    #[must_use]
    pub fn status(&self) -> ActionStatus {
        ActionStatus::from_flags(self.ran, self.reverted)
    }

    pub(crate) fn parts_mut(&mut self) -> (&A, &A::Props, &mut A::State) {
        (&self.action, &self.props, &mut self.state)
    }

    pub(crate) fn set_ran(&mut self) {
        self.ran = true;
    }

    pub(crate) fn set_reverted(&mut self) {
        debug_assert!(self.ran, "only applied actions can be reverted");
        self.reverted = true;
    }
}

impl<A: Action> Debug for ActionInstance<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionInstance")
            .field("name", &self.name())
            .field("position", &self.position)
            .field("props", &self.props)
            .field("state", &self.state)
            .field("ran", &self.ran)
            .field("reverted", &self.reverted)
            .finish()
    }
}

impl<A: Action> ActionEntry for ActionInstance<A> {
    fn name(&self) -> &'static str {
        self.action.name()
    }

    fn position(&self) -> usize {
        self.position
    }

    fn ran(&self) -> bool {
        self.ran
    }

    fn reverted(&self) -> bool {
        self.reverted
    }

    fn describe_props(&self) -> String {
        format!("{:?}", self.props)
    }

    fn describe_state(&self) -> String {
        format!("{:?}", self.state)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Typed reference to an action registered with [`Saga::add`](crate::Saga::add).
pub struct ActionHandle<A> {
    position: usize,
    _marker: PhantomData<fn() -> A>,
}

impl<A> ActionHandle<A> {
    pub(crate) fn new(position: usize) -> Self {
        Self {
            position,
            _marker: PhantomData,
        }
    }

    /// Registry position of the referenced action.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<A> Clone for ActionHandle<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A> Copy for ActionHandle<A> {}

impl<A> Debug for ActionHandle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandle")
            .field("position", &self.position)
            .finish()
    }
}
