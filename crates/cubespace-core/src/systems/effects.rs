//! Effects system - counts status effects down

use cubespace_logic::effects::tick_effects;
use hecs::World;

use crate::components::ActiveEffects;

/// Advance every running effect by `elapsed` ticks.
pub fn effects_system(world: &mut World, elapsed: u32) {
    let mut finished = Vec::new();

    for (entity, effects) in world.query_mut::<&mut ActiveEffects>() {
        tick_effects(&mut effects.0, elapsed);
        if effects.0.is_empty() {
            finished.push(entity);
        }
    }

    for entity in finished {
        let _ = world.remove_one::<ActiveEffects>(entity);
    }
}
