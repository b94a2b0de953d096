//! Logical action definitions supplied by the application.
//!
//! An action is an opaque target: the crate never interprets what it does, it only conveys a
//! trigger, a boolean or a number to the handler the caller supplied.

use crate::error::{HotbindError, Result};
use crate::range::Span;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Fired once per confirmed activation.
pub type ClickHandler = Arc<dyn Fn() + Send + Sync>;
/// Fired on press (`true`) and release (`false`).
pub type MomentaryHandler = Arc<dyn Fn(bool) + Send + Sync>;
/// Receives a signed step or a ranged value.
pub type ValueHandler = Arc<dyn Fn(f64) + Send + Sync>;

/// Discriminant of [`ActionDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Click,
    Momentary,
    Steps,
    Range,
}

/// One logical action and the handler that receives its values.
#[derive(Clone)]
pub enum ActionDefinition {
    Click {
        id: String,
        handler: ClickHandler,
    },
    Momentary {
        id: String,
        handler: MomentaryHandler,
    },
    /// Two click bindings (`up`, `down`) calling the handler with `+step` / `-step`.
    Steps {
        id: String,
        step: f64,
        handler: ValueHandler,
    },
    /// A value in `range`, fed by an axis and/or an up/down/center click triple.
    Range {
        id: String,
        range: Span,
        step: f64,
        current_value: Option<f64>,
        handler: ValueHandler,
    },
}

impl ActionDefinition {
    pub fn click(id: impl Into<String>, handler: impl Fn() + Send + Sync + 'static) -> Self {
        Self::Click {
            id: id.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn momentary(
        id: impl Into<String>,
        handler: impl Fn(bool) + Send + Sync + 'static,
    ) -> Self {
        Self::Momentary {
            id: id.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn steps(
        id: impl Into<String>,
        step: f64,
        handler: impl Fn(f64) + Send + Sync + 'static,
    ) -> Self {
        Self::Steps {
            id: id.into(),
            step,
            handler: Arc::new(handler),
        }
    }

    pub fn range(
        id: impl Into<String>,
        range: impl Into<Span>,
        step: f64,
        handler: impl Fn(f64) + Send + Sync + 'static,
    ) -> Self {
        Self::Range {
            id: id.into(),
            range: range.into(),
            step,
            current_value: None,
            handler: Arc::new(handler),
        }
    }

    /// Seed value for a range action driven only by clicks. No effect on other kinds.
    pub fn with_current_value(mut self, value: f64) -> Self {
        if let Self::Range { current_value, .. } = &mut self {
            *current_value = Some(value);
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Click { id, .. }
            | Self::Momentary { id, .. }
            | Self::Steps { id, .. }
            | Self::Range { id, .. } => id,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Click { .. } => ActionKind::Click,
            Self::Momentary { .. } => ActionKind::Momentary,
            Self::Steps { .. } => ActionKind::Steps,
            Self::Range { .. } => ActionKind::Range,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::Steps { id, step, .. } if !step.is_finite() => Err(HotbindError::InvalidNumber {
                id: id.clone(),
                message: format!("step {step} is not finite"),
            }),
            Self::Range {
                id, range, step, ..
            } => {
                if !range.min.is_finite() || !range.max.is_finite() || !step.is_finite() {
                    return Err(HotbindError::InvalidNumber {
                        id: id.clone(),
                        message: "range bounds and step must be finite".to_string(),
                    });
                }
                if range.min > range.max {
                    return Err(HotbindError::InvalidRange {
                        id: id.clone(),
                        min: range.min,
                        max: range.max,
                    });
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for ActionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Click { id, .. } => f.debug_struct("Click").field("id", id).finish(),
            Self::Momentary { id, .. } => f.debug_struct("Momentary").field("id", id).finish(),
            Self::Steps { id, step, .. } => f
                .debug_struct("Steps")
                .field("id", id)
                .field("step", step)
                .finish(),
            Self::Range {
                id,
                range,
                step,
                current_value,
                ..
            } => f
                .debug_struct("Range")
                .field("id", id)
                .field("range", range)
                .field("step", step)
                .field("current_value", current_value)
                .finish(),
        }
    }
}

/// Check the invariants of one action set: unique ids, finite numbers, `min <= max`.
pub fn validate_actions(actions: &[ActionDefinition]) -> Result<()> {
    let mut seen = HashSet::new();
    for action in actions {
        if !seen.insert(action.id()) {
            return Err(HotbindError::DuplicateActionId {
                id: action.id().to_string(),
            });
        }
        action.validate()?;
    }
    Ok(())
}
