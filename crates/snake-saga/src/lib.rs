//! Saga pattern for all-or-nothing multi-step operations.
//!
//! A [`Saga`] holds an ordered registry of [`Action`]s. Committing applies
//! each action in registration order; if one fails, every action that already
//! applied is compensated in reverse order and the failure is handed back.
//! Each registered action keeps its props, its state and two lifecycle flags
//! (`ran`, `reverted`) readable for the lifetime of the saga.
//!
//! ```
//! use async_trait::async_trait;
//! use snake_saga::{Action, CommitOptions, Saga, StateWriter};
//!
//! struct Reserve;
//!
//! #[async_trait]
//! impl Action for Reserve {
//!     type Props = &'static str;
//!     type State = indexmap::IndexMap<&'static str, bool>;
//!     type Error = std::io::Error;
//!
//!     async fn apply(
//!         &self,
//!         _props: &Self::Props,
//!         state: &mut StateWriter<'_, Self::State>,
//!     ) -> Result<(), Self::Error> {
//!         state.merge([("reserved", true)].into_iter().collect());
//!         Ok(())
//!     }
//!
//!     async fn compensate(
//!         &self,
//!         _props: &Self::Props,
//!         state: &mut StateWriter<'_, Self::State>,
//!     ) -> Result<(), Self::Error> {
//!         state.merge([("reserved", false)].into_iter().collect());
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() -> Result<(), snake_saga::SagaError<std::io::Error>> {
//! let mut saga = Saga::new().register(Reserve, "db").register(Reserve, "dns");
//! let instances = saga.commit_with(CommitOptions::forced_rollback()).await?;
//! assert!(instances.iter().all(|entry| entry.ran() && entry.reverted()));
//! # Ok(())
//! # }
//! ```

mod action;
mod audit;
mod erased;
mod error;
mod instance;
mod options;
mod saga;

pub use action::{Action, SagaState, StateWriter};
pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use error::{CompensationError, SagaError};
pub use instance::{ActionEntry, ActionHandle, ActionInstance, ActionStatus};
pub use options::CommitOptions;
pub use saga::{Instances, Saga};
