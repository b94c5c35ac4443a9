// A splat is a short lived emitter. Every tick it is asked for one sample,
// which the simulation shader turns into a localized perturbation of the state
// texture.

// Spread of the injected quantity around the sample position.
pub const DEFAULT_SCATTER: f32 = 500.0;

// Everything the simulation shader needs from one emitter for one tick.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Sample {
    pub scatter: f32,
    pub size: f32,
    pub position: [f32; 2],
    pub amount: f32,
}

impl Sample {
    // The value written into unused seed slots.
    pub const EMPTY: Sample = Sample {
        scatter: 0.0,
        size: 0.0,
        position: [0.0, 0.0],
        amount: 0.0,
    };

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        *self == Sample::EMPTY
    }
}

// Construction parameters of a splat.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SplatParams {
    pub start_position: [f32; 2],
    pub velocity: [f32; 2],
    pub size: f32,
    // Lifetime in ticks.
    pub duration: u32,
    // Quantity injected over the whole lifetime.
    pub total_amount: f32,
    pub scatter: f32,
}

impl Default for SplatParams {
    fn default() -> Self {
        SplatParams {
            start_position: [0.5, 0.5],
            velocity: [0.0, 0.0],
            size: 0.05,
            duration: 10,
            total_amount: 1.0,
            scatter: DEFAULT_SCATTER,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Splat {
    params: SplatParams,
    frames_left: u32,
}

impl Splat {
    pub fn new(params: SplatParams) -> Self {
        Splat {
            frames_left: params.duration,
            params,
        }
    }

    #[cfg(test)]
    pub fn params(&self) -> &SplatParams {
        &self.params
    }

    #[cfg(test)]
    pub fn frames_left(&self) -> u32 {
        self.frames_left
    }

    pub fn has_finished(&self) -> bool {
        self.frames_left < 1
    }

    /// Produces the sample for the current tick and consumes one tick of
    /// lifetime.
    ///
    /// Panics if the splat has already finished. Callers must prune finished
    /// splats before asking for samples.
    pub fn emit(&mut self) -> Sample {
        assert!(
            !self.has_finished(),
            "emit called on a finished splat: {:?}",
            self.params
        );
        let elapsed = (self.params.duration - self.frames_left) as f32;
        let [x, y] = self.params.start_position;
        let [vx, vy] = self.params.velocity;
        self.frames_left -= 1;
        Sample {
            scatter: self.params.scatter,
            size: self.params.size,
            position: [x + vx * elapsed, y + vy * elapsed],
            amount: self.params.total_amount / self.params.duration as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_splat(duration: u32, total_amount: f32) -> Splat {
        Splat::new(SplatParams {
            start_position: [0.25, 0.75],
            velocity: [0.01, -0.02],
            size: 0.08,
            duration,
            total_amount,
            scatter: DEFAULT_SCATTER,
        })
    }

    #[test]
    fn frames_left_counts_down_by_one() {
        let mut splat = make_splat(3, 1.0);
        assert_eq!(splat.frames_left(), 3);
        for expected in (0..3).rev() {
            assert!(!splat.has_finished());
            splat.emit();
            assert_eq!(splat.frames_left(), expected);
        }
        assert!(splat.has_finished());
    }

    #[test]
    fn amount_is_spread_evenly_over_lifetime() {
        let mut splat = make_splat(5, 1.0);
        let mut total = 0.0;
        while !splat.has_finished() {
            let sample = splat.emit();
            assert!((sample.amount - 0.2).abs() < 1e-6);
            total += sample.amount;
        }
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn position_follows_velocity() {
        let mut splat = make_splat(4, 1.0);
        let positions: Vec<[f32; 2]> = (0..4).map(|_| splat.emit().position).collect();
        for (tick, position) in positions.iter().enumerate() {
            let tick = tick as f32;
            assert!((position[0] - (0.25 + 0.01 * tick)).abs() < 1e-6);
            assert!((position[1] - (0.75 - 0.02 * tick)).abs() < 1e-6);
        }
    }

    #[test]
    fn sample_carries_size_and_scatter() {
        let mut splat = make_splat(2, 0.5);
        let first = splat.emit();
        let second = splat.emit();
        assert_eq!(first.size, 0.08);
        assert_eq!(second.size, 0.08);
        assert_eq!(first.scatter, DEFAULT_SCATTER);
        assert!(!first.is_empty());
    }

    #[test]
    fn zero_duration_is_born_finished() {
        let splat = make_splat(0, 1.0);
        assert!(splat.has_finished());
    }

    #[test]
    #[should_panic(expected = "finished splat")]
    fn emitting_finished_splat_panics() {
        let mut splat = make_splat(1, 1.0);
        splat.emit();
        splat.emit();
    }
}
