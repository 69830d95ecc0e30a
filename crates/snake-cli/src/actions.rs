//! Demo actions that flip a single switch on apply and back on compensate.

use std::time::Duration;

use async_trait::async_trait;
use snake_saga::{Action, SagaState, StateWriter};
use tracing::debug;

#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum DemoError {
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct SwitchState {
    pub(crate) value: bool,
}

#[derive(Debug, Default)]
pub(crate) struct SwitchPatch {
    pub(crate) value: Option<bool>,
}

impl SwitchPatch {
    pub(crate) fn on() -> Self {
        Self { value: Some(true) }
    }

    pub(crate) fn off() -> Self {
        Self { value: Some(false) }
    }
}

impl SagaState for SwitchState {
    type Patch = SwitchPatch;

    fn merge(&mut self, patch: Self::Patch) {
        if let Some(value) = patch.value {
            self.value = value;
        }
    }
}

/// Switches on, labelled by a string.
pub(crate) struct Toggle;

#[async_trait]
impl Action for Toggle {
    type Props = String;
    type State = SwitchState;
    type Error = DemoError;

    fn name(&self) -> &'static str {
        "toggle"
    }

    async fn apply(
        &self,
        props: &Self::Props,
        state: &mut StateWriter<'_, Self::State>,
    ) -> Result<(), Self::Error> {
        debug!(label = %props, was_on = state.value, "switching on");
        state.merge(SwitchPatch::on());
        Ok(())
    }

    async fn compensate(
        &self,
        props: &Self::Props,
        state: &mut StateWriter<'_, Self::State>,
    ) -> Result<(), Self::Error> {
        debug!(label = %props, "switching off");
        state.merge(SwitchPatch::off());
        Ok(())
    }
}

/// Switches on, labelled by a number.
pub(crate) struct Counter;

#[async_trait]
impl Action for Counter {
    type Props = i64;
    type State = SwitchState;
    type Error = DemoError;

    fn name(&self) -> &'static str {
        "counter"
    }

    async fn apply(
        &self,
        _props: &Self::Props,
        state: &mut StateWriter<'_, Self::State>,
    ) -> Result<(), Self::Error> {
        state.merge(SwitchPatch::on());
        Ok(())
    }

    async fn compensate(
        &self,
        _props: &Self::Props,
        state: &mut StateWriter<'_, Self::State>,
    ) -> Result<(), Self::Error> {
        state.merge(SwitchPatch::off());
        Ok(())
    }
}

/// Always fails to apply with the configured message.
pub(crate) struct Fail {
    message: String,
}

impl Fail {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Action for Fail {
    type Props = i64;
    type State = SwitchState;
    type Error = DemoError;

    fn name(&self) -> &'static str {
        "fail"
    }

    async fn apply(
        &self,
        _props: &Self::Props,
        _state: &mut StateWriter<'_, Self::State>,
    ) -> Result<(), Self::Error> {
        Err(DemoError::Failed(self.message.clone()))
    }

    async fn compensate(
        &self,
        _props: &Self::Props,
        state: &mut StateWriter<'_, Self::State>,
    ) -> Result<(), Self::Error> {
        state.merge(SwitchPatch::off());
        Ok(())
    }
}

/// Waits before switching on or off.
pub(crate) struct Sleep {
    label: Option<String>,
}

impl Sleep {
    pub(crate) fn new(label: Option<String>) -> Self {
        Self { label }
    }
}

#[async_trait]
impl Action for Sleep {
    type Props = Duration;
    type State = SwitchState;
    type Error = DemoError;

    fn name(&self) -> &'static str {
        "sleep"
    }

    async fn apply(
        &self,
        props: &Self::Props,
        state: &mut StateWriter<'_, Self::State>,
    ) -> Result<(), Self::Error> {
        debug!(label = ?self.label, delay = ?props, "sleeping before switching on");
        tokio::time::sleep(*props).await;
        state.merge(SwitchPatch::on());
        Ok(())
    }

    async fn compensate(
        &self,
        props: &Self::Props,
        state: &mut StateWriter<'_, Self::State>,
    ) -> Result<(), Self::Error> {
        tokio::time::sleep(*props).await;
        state.merge(SwitchPatch::off());
        Ok(())
    }

    fn compensation_description(&self) -> String {
        match &self.label {
            Some(label) => format!("switch {label} off"),
            None => "switch off".to_string(),
        }
    }
}
