use std::time::Duration;

/// Simulation constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Length of one trial.
    pub duration: Duration,
    /// Global cooldown triggered by spells that use it.
    pub global_cooldown: Duration,
    /// Time for one rune slot to regenerate at a regen multiplier of 1.0.
    pub rune_cooldown: Duration,
}

impl SimConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of encounter targets.
    pub const MAX_TARGETS: usize = 32;
    /// Number of rune slots on a rune bar (two per base rune type).
    pub const RUNE_SLOTS: usize = 6;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(180);
    pub const DEFAULT_GLOBAL_COOLDOWN: Duration = Duration::from_millis(1500);
    pub const DEFAULT_RUNE_COOLDOWN: Duration = Duration::from_secs(10);

    /// Damage multiplier applied to a critical tick.
    pub const CRIT_MULTIPLIER: f64 = 2.0;

    pub fn new() -> Self {
        Self {
            duration: Self::DEFAULT_DURATION,
            global_cooldown: Self::DEFAULT_GLOBAL_COOLDOWN,
            rune_cooldown: Self::DEFAULT_RUNE_COOLDOWN,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}
