use serde::{Deserialize, Serialize};

/// Options for [`Saga::commit_with`](crate::Saga::commit_with).
///
/// Deserializes from configuration with every key optional:
///
/// ```
/// let options: snake_saga::CommitOptions = serde_json::from_str(r#"{"forceRollback": true}"#)?;
/// assert!(options.force_rollback());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitOptions {
    /// Compensate every action after a fully successful run.
    #[serde(alias = "forceRollback")]
    force_rollback: bool,
}

impl CommitOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that run every action and then undo all of them.
    #[must_use]
    pub fn forced_rollback() -> Self {
        Self {
            force_rollback: true,
        }
    }

    #[must_use]
    pub fn with_force_rollback(mut self, force_rollback: bool) -> Self {
        self.force_rollback = force_rollback;
        self
    }

    #[must_use]
    pub fn force_rollback(&self) -> bool {
        self.force_rollback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_does_not_force_rollback() {
        assert!(!CommitOptions::default().force_rollback());
        assert_eq!(CommitOptions::new(), CommitOptions::default());
    }

    #[test]
    fn forced_rollback_sets_flag() {
        assert!(CommitOptions::forced_rollback().force_rollback());
        assert!(
            CommitOptions::new()
                .with_force_rollback(true)
                .force_rollback()
        );
    }

    #[test]
    fn deserializes_snake_case_key_from_toml() -> anyhow::Result<()> {
        let options: CommitOptions = toml::from_str("force_rollback = true")?;

        assert!(options.force_rollback());
        Ok(())
    }

    #[test]
    fn deserializes_camel_case_alias() -> anyhow::Result<()> {
        let options: CommitOptions = serde_json::from_str(r#"{"forceRollback": true}"#)?;

        assert!(options.force_rollback());
        Ok(())
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() -> anyhow::Result<()> {
        let options: CommitOptions = toml::from_str("")?;

        assert_eq!(options, CommitOptions::default());
        Ok(())
    }
}
