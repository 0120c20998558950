//! Timed power-up effects

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Power-up / effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Survive a fatal collision at the cost of shield time
    Shield,
    /// Lower the step rate
    Slow,
    /// Pull the target toward the head
    Magnet,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Shield, EffectKind::Slow, EffectKind::Magnet];

    /// Full duration granted on pickup (ms)
    pub fn duration_ms(&self) -> f32 {
        EFFECT_DURATION_MS
    }

    fn index(&self) -> usize {
        match self {
            EffectKind::Shield => 0,
            EffectKind::Slow => 1,
            EffectKind::Magnet => 2,
        }
    }
}

/// Remaining time per effect (0 = inactive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectState {
    remaining_ms: [f32; 3],
}

impl EffectState {
    /// Start (or restart) an effect. Always overwrites, never stacks.
    pub fn start(&mut self, kind: EffectKind) {
        self.remaining_ms[kind.index()] = kind.duration_ms();
    }

    pub fn set_remaining(&mut self, kind: EffectKind, ms: f32) {
        self.remaining_ms[kind.index()] = ms.max(0.0);
    }

    pub fn remaining(&self, kind: EffectKind) -> f32 {
        self.remaining_ms[kind.index()]
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.remaining(kind) > 0.0
    }

    /// Burn part of an effect's time, floored at zero
    pub fn consume(&mut self, kind: EffectKind, ms: f32) {
        let slot = &mut self.remaining_ms[kind.index()];
        *slot = (*slot - ms).max(0.0);
    }

    /// Count every effect down by a frame delta
    pub fn tick(&mut self, dt_ms: f32) {
        for slot in &mut self.remaining_ms {
            *slot = (*slot - dt_ms).max(0.0);
        }
    }

    pub fn clear(&mut self) {
        self.remaining_ms = [0.0; 3];
    }

    /// Step rate after effects; only slow changes it
    pub fn effective_steps_per_second(&self, base: u32) -> u32 {
        if self.is_active(EffectKind::Slow) {
            base.saturating_sub(SLOW_STEP_REDUCTION)
                .max(SLOW_MIN_STEPS_PER_SECOND)
        } else {
            base
        }
    }

    /// Active effects with their remaining time, in a stable order
    pub fn active(&self) -> impl Iterator<Item = (EffectKind, f32)> + '_ {
        EffectKind::ALL
            .into_iter()
            .map(|kind| (kind, self.remaining(kind)))
            .filter(|(_, ms)| *ms > 0.0)
    }
}
