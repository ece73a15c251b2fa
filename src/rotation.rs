//! Hero rotation: which news item is featured, and when it advances.
//!
//! The engine is a plain state machine; the runtime owns the timer and calls
//! [`RotationEngine::tick`] once per period while the engine is rotating.

/// Where the rotation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationState {
    /// No items to rotate through; no timer should be armed.
    #[default]
    Idle,
    /// Cycling through `len` items; `index` is the current hero.
    Rotating {
        /// Current hero index, always `< len`.
        index: usize,
        /// Number of items being rotated.
        len: usize,
    },
}

/// Cyclic hero selector.
///
/// Every [`start`](Self::start) or [`stop`](Self::stop) bumps a generation
/// counter so a driver can tell that its timer must be replaced.
#[derive(Debug, Clone, Default)]
pub struct RotationEngine {
    state: RotationState,
    generation: u64,
}

impl RotationEngine {
    /// Creates an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn is_rotating(&self) -> bool {
        matches!(self.state, RotationState::Rotating { .. })
    }

    /// Incremented on every (re)start and stop.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// (Re)starts rotation over `len` items from index 0.
    ///
    /// With `len == 0` the engine goes idle instead. Returns whether it is rotating.
    pub fn start(&mut self, len: usize) -> bool {
        self.generation += 1;
        self.state = if len == 0 {
            RotationState::Idle
        } else {
            RotationState::Rotating { index: 0, len }
        };
        tracing::debug!(len, generation = self.generation, "rotation restarted");
        self.is_rotating()
    }

    /// Goes idle.
    pub fn stop(&mut self) {
        if self.is_rotating() {
            tracing::debug!("rotation stopped");
        }
        self.generation += 1;
        self.state = RotationState::Idle;
    }

    /// Advances to `(index + 1) mod len` and returns the new hero index.
    ///
    /// Idle engines ignore ticks and return `None`.
    pub fn tick(&mut self) -> Option<usize> {
        match &mut self.state {
            RotationState::Idle => None,
            RotationState::Rotating { index, len } => {
                *index = (*index + 1) % *len;
                Some(*index)
            }
        }
    }

    /// The featured item, if rotating.
    pub fn hero_index(&self) -> Option<usize> {
        match self.state {
            RotationState::Idle => None,
            RotationState::Rotating { index, .. } => Some(index),
        }
    }

    /// Every index except the hero's, in order.
    pub fn secondary_indices(&self) -> Vec<usize> {
        match self.state {
            RotationState::Idle => Vec::new(),
            RotationState::Rotating { index, len } => secondary_indices(index, len),
        }
    }
}

/// The list positions shown under hero `hero` among `len` items.
pub fn secondary_indices(hero: usize, len: usize) -> Vec<usize> {
    (0..len).filter(|&i| i != hero).collect()
}
