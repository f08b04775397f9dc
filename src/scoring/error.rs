use crate::models::Stage;
use thiserror::Error;

/// Which scheme registry a name was looked up in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeKind {
    Safety,
    Health,
    Environment,
    StageMerge,
    FinalComposite,
    InstrumentStage,
    PreparationStage,
}

impl SchemeKind {
    pub const ALL: [SchemeKind; 7] = [
        SchemeKind::Safety,
        SchemeKind::Health,
        SchemeKind::Environment,
        SchemeKind::StageMerge,
        SchemeKind::FinalComposite,
        SchemeKind::InstrumentStage,
        SchemeKind::PreparationStage,
    ];
}

impl std::fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemeKind::Safety => write!(f, "safety"),
            SchemeKind::Health => write!(f, "health"),
            SchemeKind::Environment => write!(f, "environment"),
            SchemeKind::StageMerge => write!(f, "stage-merge"),
            SchemeKind::FinalComposite => write!(f, "final-composite"),
            SchemeKind::InstrumentStage => write!(f, "instrument-stage"),
            SchemeKind::PreparationStage => write!(f, "preparation-stage"),
        }
    }
}

/// Errors raised by a scoring call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("Invalid {stage} input: {reason}")]
    InvalidInput { stage: Stage, reason: String },

    #[error("Unknown {kind} scheme '{name}'. Valid schemes: {valid}")]
    UnknownScheme {
        kind: SchemeKind,
        name: String,
        valid: String,
    },

    #[error("Invalid reagent '{reagent}': {reason}")]
    InvalidReagent { reagent: String, reason: String },
}

impl ScoreError {
    pub(crate) fn invalid(stage: Stage, reason: impl Into<String>) -> Self {
        ScoreError::InvalidInput {
            stage,
            reason: reason.into(),
        }
    }
}

pub type ScoreResult<T> = Result<T, ScoreError>;
