//! Input guards applied before any upstream call is made.

use serde::{Deserialize, Serialize};

/// Pre-flight check on the caller's text.
///
/// A rejected input is answered with a fixed instruction and never reaches
/// the assistants API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputGuard {
    /// Every non-empty input is accepted.
    #[default]
    None,
    /// Input must start with `prefix` and contain `required` somewhere.
    PrefixAndSubstring {
        prefix: String,
        required: String,
        instruction: String,
    },
}

/// Result of running a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Accept,
    /// Carries the instruction text to return to the caller.
    Reject(String),
}

impl InputGuard {
    /// Checks `text` against the guard.
    pub fn check(&self, text: &str) -> GuardOutcome {
        match self {
            InputGuard::None => GuardOutcome::Accept,
            InputGuard::PrefixAndSubstring {
                prefix,
                required,
                instruction,
            } => {
                if text.starts_with(prefix.as_str()) && text.contains(required.as_str()) {
                    GuardOutcome::Accept
                } else {
                    GuardOutcome::Reject(instruction.clone())
                }
            }
        }
    }

    /// Returns true if this guard can reject anything.
    pub fn is_active(&self) -> bool {
        !matches!(self, InputGuard::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn equation_guard() -> InputGuard {
        InputGuard::PrefixAndSubstring {
            prefix: "Solve:".to_string(),
            required: "=".to_string(),
            instruction: "send `Solve: <equation>`".to_string(),
        }
    }

    #[test]
    fn none_accepts_everything() {
        assert_eq!(InputGuard::None.check("anything"), GuardOutcome::Accept);
        assert!(!InputGuard::None.is_active());
    }

    #[test]
    fn accepts_prefixed_text_with_required_substring() {
        assert_eq!(equation_guard().check("Solve: 2x + 3 = 7"), GuardOutcome::Accept);
    }

    #[test]
    fn rejects_missing_prefix() {
        assert_eq!(
            equation_guard().check("2x + 3 = 7"),
            GuardOutcome::Reject("send `Solve: <equation>`".to_string())
        );
    }

    #[test]
    fn rejects_missing_substring() {
        assert!(matches!(
            equation_guard().check("Solve: 2x + 3"),
            GuardOutcome::Reject(_)
        ));
    }

    #[test]
    fn deserializes_from_tagged_yaml() {
        let yaml = "type: prefix_and_substring\nprefix: 'Solve:'\nrequired: '='\ninstruction: nope\n";
        let guard: InputGuard = serde_yaml::from_str(yaml).unwrap();
        assert!(guard.is_active());
    }

    proptest! {
        #[test]
        fn unprefixed_input_is_always_rejected(text in "[^S].*") {
            prop_assert!(matches!(equation_guard().check(&text), GuardOutcome::Reject(_)));
        }

        #[test]
        fn input_without_equals_is_always_rejected(rest in "[^=]*") {
            let text = format!("Solve:{}", rest);
            prop_assert!(matches!(equation_guard().check(&text), GuardOutcome::Reject(_)));
        }
    }
}
