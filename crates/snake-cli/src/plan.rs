//! TOML plan files describing a saga to run.
//!
//! ```toml
//! force_rollback = false
//!
//! [[action]]
//! kind = "toggle"
//! label = "asd"
//!
//! [[action]]
//! kind = "fail"
//! message = "demo"
//! value = 2
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use snake_saga::{CommitOptions, Saga};

use crate::actions::{Counter, DemoError, Fail, Sleep, Toggle};
use crate::error::{CliError, Result};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Plan {
    #[serde(flatten)]
    pub(crate) options: CommitOptions,
    #[serde(default, rename = "action")]
    pub(crate) actions: Vec<PlanAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub(crate) enum PlanAction {
    Toggle {
        label: String,
    },
    Counter {
        value: i64,
    },
    Fail {
        message: String,
        #[serde(default)]
        value: i64,
    },
    Sleep {
        millis: u64,
        #[serde(default)]
        label: Option<String>,
    },
}

impl Plan {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadPlan {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| CliError::ParsePlan {
            path: path.to_path_buf(),
            source,
        })
    }

    pub(crate) fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub(crate) fn into_saga(self) -> Saga<DemoError> {
        let mut saga = Saga::new();
        for action in self.actions {
            match action {
                PlanAction::Toggle { label } => {
                    saga.add(Toggle, label);
                }
                PlanAction::Counter { value } => {
                    saga.add(Counter, value);
                }
                PlanAction::Fail { message, value } => {
                    saga.add(Fail::new(message), value);
                }
                PlanAction::Sleep { millis, label } => {
                    saga.add(Sleep::new(label), Duration::from_millis(millis));
                }
            }
        }
        saga
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions_in_file_order() -> anyhow::Result<()> {
        let plan = Plan::parse(
            r#"
[[action]]
kind = "toggle"
label = "asd"

[[action]]
kind = "counter"
value = 1

[[action]]
kind = "sleep"
millis = 5
"#,
        )?;

        assert!(!plan.options.force_rollback());
        assert_eq!(
            plan.actions,
            vec![
                PlanAction::Toggle {
                    label: "asd".to_string()
                },
                PlanAction::Counter { value: 1 },
                PlanAction::Sleep {
                    millis: 5,
                    label: None
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn reads_force_rollback_in_either_spelling() -> anyhow::Result<()> {
        let snake = Plan::parse("force_rollback = true")?;
        let camel = Plan::parse("forceRollback = true")?;

        assert!(snake.options.force_rollback());
        assert!(camel.options.force_rollback());
        assert!(snake.actions.is_empty());
        Ok(())
    }

    #[test]
    fn fail_value_defaults_to_zero() -> anyhow::Result<()> {
        let plan = Plan::parse(
            r#"
[[action]]
kind = "fail"
message = "demo"
"#,
        )?;

        assert_eq!(
            plan.actions,
            vec![PlanAction::Fail {
                message: "demo".to_string(),
                value: 0
            }]
        );
        Ok(())
    }

    #[test]
    fn rejects_unknown_kind() {
        let result = Plan::parse(
            r#"
[[action]]
kind = "explode"
"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn into_saga_registers_every_action() {
        let plan = Plan {
            options: CommitOptions::default(),
            actions: vec![
                PlanAction::Toggle {
                    label: "asd".to_string(),
                },
                PlanAction::Fail {
                    message: "demo".to_string(),
                    value: 2,
                },
            ],
        };

        let saga = plan.into_saga();

        let names: Vec<_> = saga.instances().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["toggle", "fail"]);
    }
}
