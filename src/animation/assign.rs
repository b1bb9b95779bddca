use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::animation::AnimationKind;
use crate::config::AnimationAssignment;

/// Resolves the motion for each built scene, in iteration order.
#[derive(Debug)]
pub struct AnimationPicker {
    assignment: AnimationAssignment,
    rng: StdRng,
    previous: Option<AnimationKind>,
}

impl AnimationPicker {
    /// Picker for `assignment`; `seed` makes random mode reproducible.
    pub fn new(assignment: &AnimationAssignment, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random::<u64>);
        Self {
            assignment: assignment.clone(),
            rng: StdRng::seed_from_u64(seed),
            previous: None,
        }
    }

    /// Kind for the next scene to be built.
    ///
    /// Explicit maps return exactly their entry (absent or `null` means static). Random mode draws
    /// uniformly from every kind except the one handed out last.
    pub fn kind_for(&mut self, scene_number: u32) -> Option<AnimationKind> {
        let picked = match &self.assignment {
            AnimationAssignment::Explicit(map) => map.get(&scene_number).copied().flatten(),
            AnimationAssignment::Random => {
                let candidates: Vec<AnimationKind> = AnimationKind::ALL
                    .into_iter()
                    .filter(|k| Some(*k) != self.previous)
                    .collect();
                let pool: &[AnimationKind] = if candidates.is_empty() {
                    &AnimationKind::ALL
                } else {
                    &candidates
                };
                pool.choose(&mut self.rng).copied()
            }
        };
        self.previous = picked;
        picked
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/assign.rs"]
mod tests;
