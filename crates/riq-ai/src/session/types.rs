//! Turn state and outcome types.

/// Where the session is within a turn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    /// History sent; waiting on the model. `round` counts tools run so far.
    AwaitingModel { round: u32 },
    ExecutingTool { round: u32, tool: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The model answered with text.
    Answered,
    /// The model call failed.
    Failed,
    /// The model kept requesting tools past the per-turn cap.
    RoundLimit,
}

/// Result of one `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Text for the user, whether an answer or an error explanation.
    pub text: String,
    pub error: bool,
    /// Tool calls executed during the turn.
    pub rounds: u32,
    pub stop: StopReason,
}

impl TurnOutcome {
    pub(crate) fn answered(text: String, rounds: u32) -> Self {
        Self {
            text,
            error: false,
            rounds,
            stop: StopReason::Answered,
        }
    }

    pub(crate) fn failed(text: impl Into<String>, rounds: u32) -> Self {
        Self {
            text: text.into(),
            error: true,
            rounds,
            stop: StopReason::Failed,
        }
    }

    pub(crate) fn round_limit(text: String, rounds: u32) -> Self {
        Self {
            text,
            error: true,
            rounds,
            stop: StopReason::RoundLimit,
        }
    }
}
