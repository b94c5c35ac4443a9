use crate::splat::{Sample, Splat};
use log::trace;

// Aggregates the active splats into a fixed number of seed slots per tick.
//
// Splats are kept in spawn order. When more splats are active than there are
// slots, the oldest ones are sampled and the rest wait, untouched, until a
// slot frees up.
#[derive(Debug)]
pub struct SplatField {
    capacity: usize,
    decay: f32,
    splats: Vec<Splat>,
}

impl SplatField {
    #[cfg(test)]
    pub fn new(capacity: usize) -> Self {
        SplatField::with_decay(capacity, 0.0)
    }

    pub fn with_decay(capacity: usize, decay: f32) -> Self {
        SplatField {
            capacity,
            decay,
            splats: vec![],
        }
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Number of splats held, including ones waiting for a slot and finished
    // ones that have not been pruned yet.
    pub(crate) fn len(&self) -> usize {
        self.splats.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.splats.is_empty()
    }

    #[cfg(test)]
    pub fn splats(&self) -> &[Splat] {
        &self.splats
    }

    pub fn splat(&mut self, splat: Splat) {
        self.splats.push(splat);
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    fn remove_finished_splats(&mut self) {
        let before = self.splats.len();
        self.splats.retain(|splat| !splat.has_finished());
        let removed = before - self.splats.len();
        if removed > 0 {
            trace!("Retired {} splats, {} remain", removed, self.splats.len());
        }
    }

    /// Produces exactly `capacity` samples for this tick. Slots that no active
    /// splat claims are zero filled.
    ///
    /// Each sampled splat loses one tick of lifetime, so this must be called
    /// once per simulation step.
    pub fn emit(&mut self) -> Vec<Sample> {
        self.remove_finished_splats();
        let mut samples: Vec<Sample> = self
            .splats
            .iter_mut()
            .take(self.capacity)
            .map(Splat::emit)
            .collect();
        samples.resize(self.capacity, Sample::EMPTY);
        samples
    }
}
