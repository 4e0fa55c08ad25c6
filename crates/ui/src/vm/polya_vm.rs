use tutor_core::model::{ChatMessage, PolyaStep, PracticeKind};

use super::chat_vm::{
    ChatBubbleVm, RobotVm, chat_title, completion_label, message_bubble, robot_emotion, robot_vm,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    Done,
    Current,
    Upcoming,
}

impl StepState {
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            StepState::Done => "polya-step polya-step--done",
            StepState::Current => "polya-step polya-step--current",
            StepState::Upcoming => "polya-step",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolyaStepVm {
    pub number: u8,
    pub label: &'static str,
    pub short_label: &'static str,
    pub state: StepState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolyaPanelVm {
    pub title: &'static str,
    pub problem: Option<String>,
    pub counter_label: String,
    pub steps: Vec<PolyaStepVm>,
    pub robot: RobotVm,
    pub bubbles: Vec<ChatBubbleVm>,
    pub loading: bool,
    pub exercise_completed: bool,
    pub completion_label: &'static str,
}

/// The four-step strip; every step is done once the exercise is closed.
#[must_use]
pub fn polya_step_strip(current: PolyaStep, exercise_completed: bool) -> Vec<PolyaStepVm> {
    PolyaStep::ALL
        .iter()
        .map(|&step| {
            let state = if exercise_completed || step < current {
                StepState::Done
            } else if step == current {
                StepState::Current
            } else {
                StepState::Upcoming
            };
            PolyaStepVm {
                number: step.number(),
                label: step.label(),
                short_label: step.short_label(),
                state,
            }
        })
        .collect()
}

fn step_badge(message: &ChatMessage) -> Option<String> {
    let step = message.step?;
    let tick = if message.passed == Some(true) { "✓ " } else { "" };
    Some(format!("{tick}{}", step.label()))
}

#[must_use]
pub fn map_polya_panel(
    kind: PracticeKind,
    problem: Option<&str>,
    current: PolyaStep,
    messages: &[ChatMessage],
    loading: bool,
    exercise_completed: bool,
) -> PolyaPanelVm {
    let bubbles = messages
        .iter()
        .map(|message| {
            let badge = if message.is_ai() {
                step_badge(message)
            } else {
                None
            };
            message_bubble(message, badge)
        })
        .collect();

    PolyaPanelVm {
        title: chat_title(kind),
        problem: problem
            .filter(|text| !text.trim().is_empty())
            .map(str::to_string),
        counter_label: format!("Bước {}/4", current.number()),
        steps: polya_step_strip(current, exercise_completed),
        robot: robot_vm(robot_emotion(messages, loading)),
        bubbles,
        loading,
        exercise_completed,
        completion_label: completion_label(kind),
    }
}
