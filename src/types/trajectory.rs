use crate::types::emitter::EmitterState;
use ndarray::{Array2, ArrayView1};

/// Per-emitter state for every frame, shaped `(emitters, frames)`.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTrajectories {
    pub states: Array2<EmitterState>,
}

impl StateTrajectories {
    pub fn emitters(&self) -> usize {
        self.states.nrows()
    }

    pub fn nframes(&self) -> usize {
        self.states.ncols()
    }

    pub fn state(&self, emitter: usize, frame: usize) -> Option<EmitterState> {
        self.states.get([emitter, frame]).copied()
    }

    /// States of all emitters in one frame
    pub fn frame(&self, frame: usize) -> ArrayView1<'_, EmitterState> {
        self.states.column(frame)
    }

    /// States of one emitter across all frames
    pub fn trajectory(&self, emitter: usize) -> ArrayView1<'_, EmitterState> {
        self.states.row(emitter)
    }

    pub fn count_in_frame(&self, frame: usize, state: EmitterState) -> usize {
        self.frame(frame).iter().filter(|&&s| s == state).count()
    }

    /// First frame in which the emitter is bleached, if any
    pub fn bleach_frame(&self, emitter: usize) -> Option<usize> {
        self.trajectory(emitter)
            .iter()
            .position(|&s| s == EmitterState::Bleached)
    }
}
