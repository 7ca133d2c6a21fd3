//! Temporary status effects.
//!
//! The host owns the real effect system; this module only describes which
//! effects confinement hands out and how a list of them counts down.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Slowness,
    Nausea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: EffectKind,
    pub duration_ticks: u32,
    pub amplifier: u8,
}

impl StatusEffect {
    pub fn new(kind: EffectKind, duration_ticks: u32, amplifier: u8) -> Self {
        Self {
            kind,
            duration_ticks,
            amplifier,
        }
    }
}

/// The pair of debuffs handed to an occupant dragged back into their room.
pub fn confinement_debuffs(duration_ticks: u32, amplifier: u8) -> [StatusEffect; 2] {
    [
        StatusEffect::new(EffectKind::Slowness, duration_ticks, amplifier),
        StatusEffect::new(EffectKind::Nausea, duration_ticks, amplifier),
    ]
}

/// Add an effect to an active list.
///
/// An effect of the same kind is replaced only if the new one is stronger,
/// or equally strong and longer; reapplying never stacks duplicates.
pub fn merge_effect(active: &mut Vec<StatusEffect>, effect: StatusEffect) {
    match active.iter_mut().find(|e| e.kind == effect.kind) {
        Some(existing) => {
            let stronger = effect.amplifier > existing.amplifier;
            let longer = effect.amplifier == existing.amplifier
                && effect.duration_ticks > existing.duration_ticks;
            if stronger || longer {
                *existing = effect;
            }
        }
        None => active.push(effect),
    }
}

/// Count every effect down by `elapsed` ticks and drop the expired ones.
/// Returns the kinds that expired.
pub fn tick_effects(active: &mut Vec<StatusEffect>, elapsed: u32) -> Vec<EffectKind> {
    let mut expired = Vec::new();
    active.retain_mut(|e| {
        e.duration_ticks = e.duration_ticks.saturating_sub(elapsed);
        if e.duration_ticks == 0 {
            expired.push(e.kind);
            false
        } else {
            true
        }
    });
    expired
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debuffs_are_slowness_and_nausea() {
        let [slow, nausea] = confinement_debuffs(200, 5);
        assert_eq!(slow.kind, EffectKind::Slowness);
        assert_eq!(nausea.kind, EffectKind::Nausea);
        assert_eq!(slow.duration_ticks, 200);
        assert_eq!(nausea.amplifier, 5);
    }

    #[test]
    fn reapplying_refreshes_instead_of_stacking() {
        let mut active = Vec::new();
        merge_effect(&mut active, StatusEffect::new(EffectKind::Slowness, 200, 5));
        tick_effects(&mut active, 150);
        merge_effect(&mut active, StatusEffect::new(EffectKind::Slowness, 200, 5));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].duration_ticks, 200);
    }

    #[test]
    fn weaker_effect_does_not_override() {
        let mut active = vec![StatusEffect::new(EffectKind::Nausea, 20, 5)];
        merge_effect(&mut active, StatusEffect::new(EffectKind::Nausea, 400, 1));
        assert_eq!(active[0].amplifier, 5);
        assert_eq!(active[0].duration_ticks, 20);
    }

    #[test]
    fn expired_effects_are_removed() {
        let mut active = confinement_debuffs(10, 5).to_vec();
        active.push(StatusEffect::new(EffectKind::Slowness, 3, 9));
        let expired = tick_effects(&mut active, 10);
        assert_eq!(expired.len(), 3);
        assert!(active.is_empty());
    }
}
