use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Deref;

use async_trait::async_trait;
use indexmap::IndexMap;

/// Action-owned output that is only ever updated by merging a patch into it.
///
/// A patch overwrites the parts of the state it carries and leaves the rest
/// untouched. The initial value comes from [`Action::initial_state`].
pub trait SagaState: Debug + Default + Send + Sync + 'static {
    /// Partial update applied by [`SagaState::merge`].
    type Patch: Send;

    /// Merge `patch` into the current state.
    fn merge(&mut self, patch: Self::Patch);
}

impl SagaState for () {
    type Patch = ();

    fn merge(&mut self, (): Self::Patch) {}
}

impl<K, V> SagaState for IndexMap<K, V>
where
    K: Debug + Hash + Eq + Send + Sync + 'static,
    V: Debug + Send + Sync + 'static,
{
    type Patch = IndexMap<K, V>;

    fn merge(&mut self, patch: Self::Patch) {
        self.extend(patch);
    }
}

impl SagaState for serde_json::Map<String, serde_json::Value> {
    type Patch = serde_json::Map<String, serde_json::Value>;

    fn merge(&mut self, patch: Self::Patch) {
        for (key, value) in patch {
            self.insert(key, value);
        }
    }
}

/// Write access an action gets to its own state while it runs.
///
/// The only mutation available is [`StateWriter::merge`]; lifecycle flags are
/// out of reach.
pub struct StateWriter<'a, S> {
    state: &'a mut S,
}

impl<'a, S: SagaState> StateWriter<'a, S> {
    pub(crate) fn new(state: &'a mut S) -> Self {
        Self { state }
    }

    /// Current state.
    #[must_use]
    pub fn get(&self) -> &S {
        self.state
    }

    /// Merge a partial update into the state.
    pub fn merge(&mut self, patch: S::Patch) {
        self.state.merge(patch);
    }
}

impl<S> Deref for StateWriter<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.state
    }
}

/// A reversible unit of work.
///
/// The implementing value describes the behaviour (and holds any handles it
/// needs); the props it runs with are bound when it is registered on a
/// [`Saga`](crate::Saga). Execution is sequential: the saga awaits each
/// operation to completion before starting the next one.
///
/// # Type Parameters
///
/// - `Props`: immutable input, fixed at registration
/// - `State`: output owned by the action, updated through merges
/// - `Error`: failure value of [`Action::apply`] and [`Action::compensate`]
#[async_trait]
pub trait Action: Send + Sync + 'static {
    /// Immutable input bound at registration.
    type Props: Debug + Send + Sync + 'static;

    /// Mutable output owned by the action.
    type State: SagaState;

    /// Error type for apply and compensate failures.
    type Error: Send;

    /// Human-readable name for logging and error messages.
    ///
    /// Defaults to the unqualified type name.
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Starting state for an instance registered with `props`.
    fn initial_state(&self, props: &Self::Props) -> Self::State {
        let _ = props;
        Self::State::default()
    }

    /// Perform the forward effect.
    ///
    /// On success the state should reflect completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the effect could not be performed. The saga stops,
    /// compensates every action applied before this one and hands the error
    /// back to the caller.
    async fn apply(
        &self,
        props: &Self::Props,
        state: &mut StateWriter<'_, Self::State>,
    ) -> Result<(), Self::Error>;

    /// Undo the forward effect.
    ///
    /// Only called for actions whose [`Action::apply`] succeeded. The default
    /// implementation is a no-op, suitable for read-only actions.
    ///
    /// # Errors
    ///
    /// Returns an error if compensation fails. The remaining compensations
    /// still run and the failures are reported together.
    async fn compensate(
        &self,
        props: &Self::Props,
        state: &mut StateWriter<'_, Self::State>,
    ) -> Result<(), Self::Error> {
        let _ = (props, state);
        Ok(())
    }

    /// Human-readable description of what compensation will do.
    fn compensation_description(&self) -> String {
        format!("undo {}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Progress {
        done: bool,
        note: Option<String>,
    }

    #[derive(Default)]
    struct ProgressPatch {
        done: Option<bool>,
        note: Option<String>,
    }

    impl SagaState for Progress {
        type Patch = ProgressPatch;

        fn merge(&mut self, patch: Self::Patch) {
            if let Some(done) = patch.done {
                self.done = done;
            }
            if let Some(note) = patch.note {
                self.note = Some(note);
            }
        }
    }

    struct Noop;

    #[async_trait]
    impl Action for Noop {
        type Props = ();
        type State = ();
        type Error = ();

        async fn apply(
            &self,
            _props: &Self::Props,
            _state: &mut StateWriter<'_, Self::State>,
        ) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    struct Generic<T>(std::marker::PhantomData<T>);

    #[async_trait]
    impl<T: Send + Sync + 'static> Action for Generic<T> {
        type Props = ();
        type State = ();
        type Error = ();

        async fn apply(
            &self,
            _props: &Self::Props,
            _state: &mut StateWriter<'_, Self::State>,
        ) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn merge_only_overwrites_keys_in_patch() {
        let mut state = Progress {
            done: false,
            note: Some("kept".to_string()),
        };
        let mut writer = StateWriter::new(&mut state);

        writer.merge(ProgressPatch {
            done: Some(true),
            ..ProgressPatch::default()
        });

        assert!(writer.get().done);
        assert_eq!(writer.note.as_deref(), Some("kept"));
    }

    #[test]
    fn index_map_merge_keeps_existing_keys_and_order() {
        let mut state: IndexMap<&'static str, i32> = IndexMap::new();
        state.insert("a", 1);
        state.insert("b", 2);

        state.merge(IndexMap::from([("b", 20), ("c", 3)]));

        let pairs: Vec<_> = state.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, vec![("a", 1), ("b", 20), ("c", 3)]);
    }

    #[test]
    fn json_map_merge_overwrites_matching_keys() {
        let mut state = serde_json::Map::new();
        state.insert("value".to_string(), json!(false));
        state.insert("label".to_string(), json!("asd"));

        let mut patch = serde_json::Map::new();
        patch.insert("value".to_string(), json!(true));
        state.merge(patch);

        assert_eq!(state.get("value"), Some(&json!(true)));
        assert_eq!(state.get("label"), Some(&json!("asd")));
    }

    #[test]
    fn default_name_is_unqualified_type_name() {
        assert_eq!(Noop.name(), "Noop");
        assert_eq!(Generic::<String>(std::marker::PhantomData).name(), "Generic");
    }

    #[test]
    fn default_compensation_description_uses_name() {
        assert_eq!(Noop.compensation_description(), "undo Noop");
    }

    #[test]
    fn default_initial_state_is_state_default() {
        Noop.initial_state(&());
    }
}
