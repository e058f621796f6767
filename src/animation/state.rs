//! Typed view of an animation player's snapshot.

use crate::animation::error::AnimationError;
use crate::framework::{FieldValue, StateSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const START_TIME: &str = "startTime";
pub const CURRENT_TIME: &str = "currentTime";
pub const PLAY_STATE: &str = "playState";
pub const NAME: &str = "name";
pub const DURATION: &str = "duration";
pub const ITERATION_COUNT: &str = "iterationCount";
pub const IS_RUNNING_ON_COMPOSITOR: &str = "isRunningOnCompositor";

/// Web Animations play state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayState {
    Idle,
    Pending,
    Running,
    Paused,
    Finished,
}

impl PlayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayState::Idle => "idle",
            PlayState::Pending => "pending",
            PlayState::Running => "running",
            PlayState::Paused => "paused",
            PlayState::Finished => "finished",
        }
    }
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayState {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(PlayState::Idle),
            "pending" => Ok(PlayState::Pending),
            "running" => Ok(PlayState::Running),
            "paused" => Ok(PlayState::Paused),
            "finished" => Ok(PlayState::Finished),
            other => Err(AnimationError::MalformedState(format!("unknown play state {other:?}"))),
        }
    }
}

/// How many times an animation is scheduled to run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterationCount {
    Finite(u32),
    Infinite,
}

impl From<IterationCount> for FieldValue {
    fn from(count: IterationCount) -> Self {
        match count {
            IterationCount::Finite(n) => FieldValue::from(n),
            IterationCount::Infinite => FieldValue::from("infinite"),
        }
    }
}

/// The seven fields an animation player actor reports.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    /// `None` while paused or waiting to start.
    pub start_time: Option<f64>,
    pub current_time: Option<f64>,
    pub play_state: PlayState,
    pub name: String,
    /// Milliseconds, from computed styles. `None` if neither an animation nor a
    /// transition duration is set.
    pub duration: Option<f64>,
    pub iteration_count: Option<IterationCount>,
    /// Whether the animation currently runs on the compositor. Always `false` while
    /// paused.
    pub is_running_on_compositor: bool,
}

impl From<&AnimationState> for StateSnapshot {
    fn from(state: &AnimationState) -> Self {
        StateSnapshot::new()
            .with(START_TIME, state.start_time)
            .with(CURRENT_TIME, state.current_time)
            .with(PLAY_STATE, state.play_state.as_str())
            .with(NAME, state.name.as_str())
            .with(DURATION, state.duration)
            .with(ITERATION_COUNT, state.iteration_count)
            .with(IS_RUNNING_ON_COMPOSITOR, state.is_running_on_compositor)
    }
}

fn field<'a>(snapshot: &'a StateSnapshot, name: &str) -> Result<&'a FieldValue, AnimationError> {
    snapshot
        .get(name)
        .ok_or_else(|| AnimationError::MalformedState(format!("missing field {name}")))
}

fn optional_number(snapshot: &StateSnapshot, name: &str) -> Result<Option<f64>, AnimationError> {
    match field(snapshot, name)? {
        FieldValue::Null => Ok(None),
        FieldValue::Number(n) => Ok(Some(*n)),
        other => Err(AnimationError::MalformedState(format!("{name} is {other}"))),
    }
}

impl TryFrom<&StateSnapshot> for AnimationState {
    type Error = AnimationError;

    fn try_from(snapshot: &StateSnapshot) -> Result<Self, Self::Error> {
        let play_state = field(snapshot, PLAY_STATE)?
            .as_str()
            .ok_or_else(|| AnimationError::MalformedState(format!("{PLAY_STATE} is not text")))?
            .parse::<PlayState>()?;
        let name = field(snapshot, NAME)?
            .as_str()
            .ok_or_else(|| AnimationError::MalformedState(format!("{NAME} is not text")))?
            .to_string();
        let iteration_count = match field(snapshot, ITERATION_COUNT)? {
            FieldValue::Null => None,
            FieldValue::Number(n) if *n >= 0.0 && n.fract() == 0.0 => {
                Some(IterationCount::Finite(*n as u32))
            }
            FieldValue::Text(t) if t == "infinite" => Some(IterationCount::Infinite),
            other => {
                return Err(AnimationError::MalformedState(format!(
                    "{ITERATION_COUNT} is {other}"
                )))
            }
        };
        let is_running_on_compositor = field(snapshot, IS_RUNNING_ON_COMPOSITOR)?
            .as_bool()
            .ok_or_else(|| {
                AnimationError::MalformedState(format!("{IS_RUNNING_ON_COMPOSITOR} is not a bool"))
            })?;

        Ok(Self {
            start_time: optional_number(snapshot, START_TIME)?,
            current_time: optional_number(snapshot, CURRENT_TIME)?,
            play_state,
            name,
            duration: optional_number(snapshot, DURATION)?,
            iteration_count,
            is_running_on_compositor,
        })
    }
}
