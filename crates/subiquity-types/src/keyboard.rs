//! Keyboard layouts and the keyboard detection wizard.
//!
//! The wizard is a small state machine run by the backend. Each step is
//! fetched by index; the answer to a step names the index of the next one:
//!
//! - [`StepPressKey`]: the user presses one of `symbols`; the pressed keycode
//!   maps to the next step index through `keycodes`.
//! - [`StepKeyPresent`]: the user says whether `symbol` is on the keyboard;
//!   `yes` and `no` are the next step indices.
//! - [`StepResult`]: terminal, carries the detected layout.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, DecodeError, Tagged, Union, union_serde};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardSetting {
    pub layout: String,
    pub variant: String,
    pub toggle: Option<String>,
}

impl KeyboardSetting {
    pub fn new(layout: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            layout: layout.into(),
            variant: variant.into(),
            toggle: None,
        }
    }

    pub fn with_toggle(self, toggle: impl Into<String>) -> Self {
        Self {
            toggle: Some(toggle.into()),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardVariant {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardLayout {
    pub code: String,
    pub name: String,
    pub variants: Vec<KeyboardVariant>,
}

/// Response of `GET /keyboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardSetup {
    pub setting: KeyboardSetting,
    pub layouts: Vec<KeyboardLayout>,
}

impl KeyboardSetup {
    pub fn layout(&self, code: &str) -> Option<&KeyboardLayout> {
        self.layouts.iter().find(|l| l.code == code)
    }
}

/// Ask the user to press one of `symbols`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPressKey {
    pub symbols: Vec<String>,
    /// Keycode of the pressed key to the index of the next step.
    pub keycodes: BTreeMap<u32, String>,
}

impl Tagged for StepPressKey {
    const TAG: &'static str = "StepPressKey";
}

/// Ask the user whether `symbol` is present on the keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepKeyPresent {
    pub symbol: String,
    /// Next step index if the symbol is present.
    pub yes: String,
    /// Next step index if the symbol is absent.
    pub no: String,
}

impl Tagged for StepKeyPresent {
    const TAG: &'static str = "StepKeyPresent";
}

/// Detection finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub layout: String,
    pub variant: String,
}

impl Tagged for StepResult {
    const TAG: &'static str = "StepResult";
}

impl StepResult {
    /// The detected layout as a setting ready for `POST /keyboard`.
    pub fn to_setting(&self) -> KeyboardSetting {
        KeyboardSetting::new(&self.layout, &self.variant)
    }
}

/// One step of the keyboard detection wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyStep {
    PressKey(StepPressKey),
    KeyPresent(StepKeyPresent),
    Result(StepResult),
}

impl AnyStep {
    pub fn is_result(&self) -> bool {
        matches!(self, AnyStep::Result(_))
    }
}

impl Union for AnyStep {
    const NAME: &'static str = "AnyStep";

    fn tag(&self) -> &'static str {
        match self {
            AnyStep::PressKey(_) => StepPressKey::TAG,
            AnyStep::KeyPresent(_) => StepKeyPresent::TAG,
            AnyStep::Result(_) => StepResult::TAG,
        }
    }

    fn decode_tagged(tag: &str, value: Value) -> Result<Self, DecodeError> {
        match tag {
            "StepPressKey" => codec::decode_variant(value).map(AnyStep::PressKey),
            "StepKeyPresent" => codec::decode_variant(value).map(AnyStep::KeyPresent),
            "StepResult" => codec::decode_variant(value).map(AnyStep::Result),
            _ => Err(DecodeError::unknown_discriminator::<Self>(tag)),
        }
    }
}

union_serde!(AnyStep {
    PressKey,
    KeyPresent,
    Result
});

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_step_round_trip() {
        let steps = [
            AnyStep::PressKey(StepPressKey {
                symbols: vec!["z".to_string(), "y".to_string()],
                keycodes: BTreeMap::from([(29, "3".to_string()), (44, "4".to_string())]),
            }),
            AnyStep::KeyPresent(StepKeyPresent {
                symbol: "ß".to_string(),
                yes: "5".to_string(),
                no: "6".to_string(),
            }),
            AnyStep::Result(StepResult {
                layout: "de".to_string(),
                variant: "nodeadkeys".to_string(),
            }),
        ];
        for step in steps {
            let encoded = serde_json::to_value(&step).unwrap();
            assert_eq!(encoded["$type"], step.tag());
            let decoded: AnyStep = serde_json::from_value(encoded).unwrap();
            assert_eq!(decoded, step);
        }
    }

    #[test]
    fn test_press_key_decodes_string_keycodes() {
        let step = codec::decode_union_str::<AnyStep>(
            r#"{"$type": "StepPressKey", "symbols": ["q", "a"], "keycodes": {"16": "1", "30": "2"}}"#,
        )
        .unwrap();
        let AnyStep::PressKey(step) = step else {
            panic!("expected StepPressKey, got {step:?}");
        };
        assert_eq!(step.keycodes.get(&16).map(String::as_str), Some("1"));
        assert_eq!(step.keycodes.get(&30).map(String::as_str), Some("2"));
        assert_eq!(step.symbols, vec!["q", "a"]);
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        let err = codec::decode_union::<AnyStep>(json!({"$type": "StepGuess"})).unwrap_err();
        match err {
            DecodeError::UnknownDiscriminator { union, value, .. } => {
                assert_eq!(union, "AnyStep");
                assert_eq!(value, "StepGuess");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_only_result_step_is_result() {
        let result = AnyStep::Result(StepResult {
            layout: "us".to_string(),
            variant: String::new(),
        });
        let present = AnyStep::KeyPresent(StepKeyPresent {
            symbol: "é".to_string(),
            yes: "1".to_string(),
            no: "2".to_string(),
        });
        assert!(result.is_result());
        assert!(!present.is_result());
    }

    #[test]
    fn test_setting_with_toggle_and_layout_lookup() {
        let plain = KeyboardSetting::new("ru", "");
        let toggled = plain.clone().with_toggle("alt_shift_toggle");
        assert_eq!(toggled.toggle.as_deref(), Some("alt_shift_toggle"));
        assert_eq!(plain.toggle, None);

        let setup = KeyboardSetup {
            setting: toggled,
            layouts: vec![KeyboardLayout {
                code: "ru".to_string(),
                name: "Russian".to_string(),
                variants: vec![KeyboardVariant {
                    code: "phonetic".to_string(),
                    name: "Russian (phonetic)".to_string(),
                }],
            }],
        };
        assert_eq!(setup.layout("ru").map(|l| l.variants.len()), Some(1));
        assert!(setup.layout("de").is_none());
    }

    #[test]
    fn test_result_to_setting() {
        let result = StepResult {
            layout: "fr".to_string(),
            variant: "oss".to_string(),
        };
        assert_eq!(result.to_setting(), KeyboardSetting::new("fr", "oss"));
    }
}
