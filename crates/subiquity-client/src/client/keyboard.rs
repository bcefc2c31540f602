//! Locale, keyboard layout and the keyboard detection wizard.

use subiquity_types::{
    AnyStep, KeyboardSetting, KeyboardSetup, StepKeyPresent, StepPressKey, StepResult,
};

use super::SubiquityClient;
use crate::error::ClientError;

impl SubiquityClient {
    pub async fn locale(&self) -> Result<String, ClientError> {
        self.get("locale", "/locale").send().await
    }

    pub async fn set_locale(&self, locale: &str) -> Result<(), ClientError> {
        self.post("set_locale", "/locale")
            .json(locale)
            .send_empty()
            .await
    }

    pub async fn keyboard(&self) -> Result<KeyboardSetup, ClientError> {
        self.get("keyboard", "/keyboard").send().await
    }

    pub async fn set_keyboard(&self, setting: &KeyboardSetting) -> Result<(), ClientError> {
        self.post("set_keyboard", "/keyboard")
            .json(setting)
            .send_empty()
            .await
    }

    /// Apply `setting` to the running desktop session of `user`.
    pub async fn set_input_source(
        &self,
        setting: &KeyboardSetting,
        user: Option<&str>,
    ) -> Result<(), ClientError> {
        self.post("set_input_source", "/keyboard/input_source")
            .query_opt("user", user.as_ref())
            .json(setting)
            .send_empty()
            .await
    }

    /// One step of keyboard detection. The first step has index `"0"`.
    pub async fn keyboard_step(&self, index: &str) -> Result<AnyStep, ClientError> {
        self.get("keyboard_step", "/keyboard/steps")
            .query("index", index)
            .send_union()
            .await
    }
}

/// Index of the first detection step.
pub const FIRST_STEP: &str = "0";

/// Where a [`KeyboardWizard`] is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    /// The step at this index has to be fetched.
    AwaitingStep(String),
    /// The user must press one of the step's symbols.
    PressKey(StepPressKey),
    /// The user must say whether the step's symbol is on the keyboard.
    KeyPresent(StepKeyPresent),
    /// Detection finished.
    Done(StepResult),
}

/// The user's answer to the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAnswer {
    /// Keycode of the key pressed, for [`WizardState::PressKey`].
    KeyPressed(u32),
    /// Whether the symbol is present, for [`WizardState::KeyPresent`].
    KeyPresent(bool),
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("keyboard detection already finished")]
    Finished,

    #[error("no step to answer; fetch the next step first")]
    NoStep,

    #[error("answer {answer:?} does not fit the current step")]
    UnexpectedAnswer { answer: WizardAnswer },

    #[error("keycode {0} is not one of the expected keys")]
    UnknownKeycode(u32),
}

/// Client-side driver for the backend's keyboard detection steps.
///
/// Alternate [`fetch`](Self::fetch) and [`answer`](Self::answer) until the
/// state is [`WizardState::Done`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardWizard {
    state: WizardState,
}

impl Default for KeyboardWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardWizard {
    pub fn new() -> Self {
        Self {
            state: WizardState::AwaitingStep(FIRST_STEP.to_string()),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// The detected layout, once finished.
    pub fn result(&self) -> Option<&StepResult> {
        match &self.state {
            WizardState::Done(result) => Some(result),
            _ => None,
        }
    }

    /// Fetch the pending step. Does nothing if a step is already waiting
    /// for an answer.
    pub async fn fetch(&mut self, client: &SubiquityClient) -> Result<&WizardState, WizardError> {
        match &self.state {
            WizardState::AwaitingStep(index) => {
                let index = index.clone();
                self.state = match client.keyboard_step(&index).await? {
                    AnyStep::PressKey(step) => WizardState::PressKey(step),
                    AnyStep::KeyPresent(step) => WizardState::KeyPresent(step),
                    AnyStep::Result(result) => WizardState::Done(result),
                };
            }
            WizardState::Done(_) => return Err(WizardError::Finished),
            WizardState::PressKey(_) | WizardState::KeyPresent(_) => {}
        }
        Ok(&self.state)
    }

    /// Answer the current step, selecting the next step index.
    pub fn answer(&mut self, answer: WizardAnswer) -> Result<(), WizardError> {
        let next = match (&self.state, answer) {
            (WizardState::Done(_), _) => return Err(WizardError::Finished),
            (WizardState::AwaitingStep(_), _) => return Err(WizardError::NoStep),
            (WizardState::PressKey(step), WizardAnswer::KeyPressed(code)) => step
                .keycodes
                .get(&code)
                .cloned()
                .ok_or(WizardError::UnknownKeycode(code))?,
            (WizardState::KeyPresent(step), WizardAnswer::KeyPresent(present)) => {
                if present {
                    step.yes.clone()
                } else {
                    step.no.clone()
                }
            }
            _ => return Err(WizardError::UnexpectedAnswer { answer }),
        };
        self.state = WizardState::AwaitingStep(next);
        Ok(())
    }
}
