use crate::LanesError;

/// Tunables for lane collapsing.
#[derive(Debug, Clone, Copy)]
pub struct LanesConfig {
    /// Rows of inactivity after which a lane is pruned from the active set.
    /// Larger values keep stale branches visually present longer at higher
    /// memory cost.
    pub collapse_threshold: u32,

    /// Retained rows rewritten when a collapsed lane is expanded back in;
    /// bounds how far up a reactivated branch is reconnected.
    pub collapse_depth: usize,

    /// Extra quiet rows required after an expansion before the same lane
    /// becomes eligible for collapse again, preventing oscillation.
    pub recollapse_gap: u32,
}

impl Default for LanesConfig {
    fn default() -> Self {
        Self {
            collapse_threshold: 30,
            collapse_depth: 10,
            recollapse_gap: 10,
        }
    }
}

impl LanesConfig {
    /// Maximum number of emitted rows the allocator retains for rewriting.
    pub fn window_capacity(&self) -> usize {
        self.collapse_depth + self.recollapse_gap as usize
    }

    /// Check the tunables for consistency.
    ///
    /// The collapse threshold must cover the whole retained window: only
    /// then is a lane that reaches the threshold guaranteed to be a plain
    /// passthrough in every retained row, which the collapse rewrite relies
    /// on when it chases the lane's column backwards through the window.
    pub fn validate(&self) -> Result<(), LanesError> {
        if self.collapse_depth == 0 {
            return Err(LanesError::Config(
                "collapse_depth must be at least 1".into(),
            ));
        }
        if (self.collapse_threshold as usize) < self.window_capacity() {
            return Err(LanesError::Config(format!(
                "collapse_threshold ({}) must be at least collapse_depth + recollapse_gap ({})",
                self.collapse_threshold,
                self.window_capacity()
            )));
        }
        Ok(())
    }
}
