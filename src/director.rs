use crate::effect_params::DirectorParams;
use crate::error::{EffectError, Result};
use crate::shutdown::ShutdownSignal;
use crate::splat::{Splat, SplatParams};
use crossbeam_channel::Sender;
use log::{debug, info, trace};
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

// Spawns one randomized splat per elapsed period of wall clock time. The
// director's clock is independent of the frame clock.
pub struct Director<R> {
    params: DirectorParams,
    rng: R,
    period: Duration,
    // Wall clock time accumulated towards the next spawn.
    spawn_progress: Duration,
    last_tick: Instant,
}

fn sample_range<R: Rng>(rng: &mut R, [min, max]: [f32; 2]) -> f32 {
    if min < max {
        rng.gen_range(min..max)
    } else {
        min
    }
}

impl Director<rand::rngs::StdRng> {
    pub fn from_entropy(params: DirectorParams) -> Result<Self> {
        Director::new(params, rand::rngs::StdRng::from_entropy())
    }
}

impl<R: Rng> Director<R> {
    /// Fails on a zero period or an empty duration range.
    pub fn new(params: DirectorParams, rng: R) -> Result<Self> {
        params.validate()?;
        Ok(Director {
            period: params.period(),
            params,
            rng,
            spawn_progress: Duration::from_secs(0),
            last_tick: Instant::now(),
        })
    }

    pub fn make_splat(&mut self) -> Splat {
        let params = &self.params;
        let rng = &mut self.rng;
        let splat_params = SplatParams {
            duration: rng.gen_range(params.duration[0]..=params.duration[1]),
            size: sample_range(rng, params.size),
            start_position: [
                sample_range(rng, params.position),
                sample_range(rng, params.position),
            ],
            velocity: [
                sample_range(rng, params.velocity),
                sample_range(rng, params.velocity),
            ],
            total_amount: sample_range(rng, params.total_amount),
            scatter: params.scatter,
        };
        trace!("New splat: {:?}", splat_params);
        Splat::new(splat_params)
    }

    /// Advances the director's clock by `dt` and returns the splats that came
    /// due, one per whole period elapsed.
    pub fn update(&mut self, dt: Duration) -> Vec<Splat> {
        self.spawn_progress += dt;
        let due = self.spawn_progress.as_nanos() / self.period.as_nanos();
        if due == 0 {
            return vec![];
        }
        let due = due as u32;
        self.spawn_progress -= self.period * due;
        if due > 1 {
            debug!("Director fell behind, spawning {} splats at once", due);
        }
        (0..due).map(|_| self.make_splat()).collect()
    }

    // Restarts the wall clock at `now` with nothing accumulated. Must not be
    // later than the epoch of the ticker driving `on_tick`.
    pub fn reset_clock(&mut self, now: Instant) {
        self.last_tick = now;
        self.spawn_progress = Duration::from_secs(0);
    }

    pub fn on_tick(&mut self, now: Instant) -> Vec<Splat> {
        let dt = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        self.update(dt)
    }
}

impl<R: Rng + Send + 'static> Director<R> {
    /// Runs the director on its own thread until `signal` stops it or the
    /// receiving side of `sink` goes away.
    pub fn start(mut self, sink: Sender<Splat>, signal: ShutdownSignal) -> Result<DirectorHandle> {
        // The clock starts before the ticker so the first tick is a full period.
        self.reset_clock(Instant::now());
        let ticker = crossbeam_channel::tick(self.period);
        info!("Starting director with period {:?}", self.period);
        let thread = std::thread::Builder::new()
            .name("director".into())
            .spawn(move || loop {
                crossbeam_channel::select! {
                    recv(ticker) -> tick => {
                        let now = tick.unwrap_or_else(|_| Instant::now());
                        for splat in self.on_tick(now) {
                            if sink.send(splat).is_err() {
                                info!("Splat queue closed, director exiting");
                                return;
                            }
                        }
                    }
                    recv(signal.receiver()) -> _ => {
                        info!("Director stopped");
                        return;
                    }
                }
            })
            .map_err(EffectError::DirectorSpawn)?;
        Ok(DirectorHandle {
            thread: Some(thread),
        })
    }
}

pub struct DirectorHandle {
    thread: Option<std::thread::JoinHandle<()>>,
}

impl DirectorHandle {
    // False once the thread has exited, whether or not it was joined.
    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .map_or(false, |thread| !thread.is_finished())
    }

    // Blocks until the director thread exits. Trigger shutdown first.
    pub fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Director thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown::Shutdown;
    use rand::rngs::StdRng;

    fn seeded(params: DirectorParams) -> Director<StdRng> {
        Director::new(params, StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn five_splats_per_second_at_200ms() {
        let mut director = seeded(DirectorParams::default());
        let spawned: usize = (0..10)
            .map(|_| director.update(Duration::from_millis(100)).len())
            .sum();
        assert_eq!(spawned, 5);
    }

    #[test]
    fn catches_up_after_a_long_gap() {
        let mut director = seeded(DirectorParams::default());
        assert_eq!(director.update(Duration::from_millis(1000)).len(), 5);
        assert_eq!(director.update(Duration::from_millis(199)).len(), 0);
        assert_eq!(director.update(Duration::from_millis(1)).len(), 1);
    }

    #[test]
    fn jittered_ticks_do_not_drift() {
        let mut director = seeded(DirectorParams::default());
        let jitter = [201, 199, 203, 197, 200];
        let spawned: usize = jitter
            .iter()
            .map(|ms| director.update(Duration::from_millis(*ms)).len())
            .sum();
        assert_eq!(spawned, 5);
    }

    #[test]
    fn splats_stay_within_ranges() {
        let params = DirectorParams::default();
        let mut director = seeded(params);
        for _ in 0..1000 {
            let splat = director.make_splat();
            let p = splat.params();
            assert!(p.duration >= params.duration[0] && p.duration <= params.duration[1]);
            assert!(p.size >= params.size[0] && p.size < params.size[1]);
            for axis in 0..2 {
                assert!(p.start_position[axis] >= 0.0 && p.start_position[axis] < 1.0);
                assert!(p.velocity[axis] >= -0.05 && p.velocity[axis] < 0.05);
            }
            assert!(p.total_amount >= 0.3 && p.total_amount < 1.0);
            assert_eq!(p.scatter, params.scatter);
            assert!(!splat.has_finished());
        }
    }

    #[test]
    fn degenerate_ranges_are_constant() {
        let params = DirectorParams {
            duration: [5, 5],
            size: [0.05, 0.05],
            ..DirectorParams::default()
        };
        let mut director = seeded(params);
        let splat = director.make_splat();
        assert_eq!(splat.params().duration, 5);
        assert_eq!(splat.params().size, 0.05);
    }

    #[test]
    fn same_seed_same_splats() {
        let mut a = seeded(DirectorParams::default());
        let mut b = seeded(DirectorParams::default());
        for _ in 0..10 {
            assert_eq!(a.make_splat().params(), b.make_splat().params());
        }
    }

    #[test]
    fn thread_delivers_and_stops() {
        let params = DirectorParams {
            period_ms: 5,
            ..DirectorParams::default()
        };
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut shutdown = Shutdown::new();
        let mut handle = seeded(params).start(sender, shutdown.signal()).unwrap();
        assert!(handle.is_running());
        let first = receiver.recv_timeout(Duration::from_secs(5));
        assert!(first.is_ok());
        shutdown.trigger();
        handle.join();
        assert!(!handle.is_running());
        // The sender is dropped with the thread.
        let drained: Vec<Splat> = receiver.iter().collect();
        println!("Drained {} splats after shutdown", drained.len());
    }

    #[test]
    fn thread_exits_when_queue_closes() {
        let params = DirectorParams {
            period_ms: 1,
            ..DirectorParams::default()
        };
        let (sender, receiver) = crossbeam_channel::unbounded();
        let shutdown = Shutdown::new();
        let mut handle = seeded(params).start(sender, shutdown.signal()).unwrap();
        drop(receiver);
        let deadline = Instant::now() + Duration::from_secs(5);
        while handle.is_running() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        // Exited on its own, before anyone joined it.
        assert!(!handle.is_running());
        handle.join();
        assert!(!shutdown.signal().is_stopped());
    }

    #[test]
    fn first_tick_spawns_the_first_splat() {
        let mut director = seeded(DirectorParams::default());
        let started = Instant::now();
        director.reset_clock(started);
        // The ticker is created just after the clock starts.
        let epoch = started + Duration::from_micros(75);
        let period = Duration::from_millis(200);
        let spawned: Vec<usize> = (1..=5)
            .map(|k| director.on_tick(epoch + period * k).len())
            .collect();
        assert_eq!(spawned, vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn running_thread_spawns_on_its_first_tick() {
        let params = DirectorParams {
            period_ms: 100,
            ..DirectorParams::default()
        };
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut shutdown = Shutdown::new();
        let started = Instant::now();
        let mut handle = seeded(params).start(sender, shutdown.signal()).unwrap();
        assert!(receiver.recv_timeout(Duration::from_secs(5)).is_ok());
        let elapsed = started.elapsed();
        println!("First splat after {:?}", elapsed);
        // A missed first tick would push this to the second period.
        assert!(elapsed < Duration::from_millis(190));
        shutdown.trigger();
        handle.join();
    }

    #[test]
    fn rejects_params_that_cannot_spawn() {
        let stopped = DirectorParams {
            period_ms: 0,
            ..DirectorParams::default()
        };
        assert!(Director::new(stopped, StdRng::seed_from_u64(1)).is_err());
        let empty = DirectorParams {
            duration: [20, 1],
            ..DirectorParams::default()
        };
        match Director::new(empty, StdRng::seed_from_u64(1)) {
            Err(EffectError::InvalidConfig(message)) => assert!(message.contains("duration")),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("accepted an empty duration range"),
        }
    }
}
