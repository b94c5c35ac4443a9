use crate::shutdown::ShutdownSignal;
use log::trace;

// The two per-frame stages driven by the scheduler. `mode` is the role flag
// of the ping-pong state buffers, see `PingPong`.
pub trait FrameStages {
    // Run the simulation shader into the slot named by `mode`.
    fn advance(&mut self, mode: bool, time: f32);
    // Composite the slot named by `mode` onto the screen.
    fn draw(&mut self, mode: bool, time: f32);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    Stopped,
}

// Drives simulate -> render -> advance clock once per display refresh. Pacing
// comes from the caller, which steps once per redraw.
#[derive(Debug)]
pub struct FrameScheduler {
    mode: bool,
    time: f64,
    time_step: f64,
    frame: u64,
    signal: ShutdownSignal,
}

impl FrameScheduler {
    pub fn new(time_step: f32, signal: ShutdownSignal) -> Self {
        FrameScheduler {
            mode: false,
            time: 0.0,
            time_step: time_step as f64,
            frame: 0,
            signal,
        }
    }

    #[cfg(test)]
    pub fn mode(&self) -> bool {
        self.mode
    }

    pub fn time(&self) -> f32 {
        self.time as f32
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_stopped(&self) -> bool {
        self.signal.is_stopped()
    }

    pub fn step<S: FrameStages>(&mut self, stages: &mut S) -> FrameOutcome {
        if self.signal.is_stopped() {
            return FrameOutcome::Stopped;
        }
        self.mode = !self.mode;
        let time = self.time();
        trace!("Frame {}: mode {}, time {}", self.frame, self.mode, time);
        stages.advance(self.mode, time);
        stages.draw(self.mode, time);
        self.time += self.time_step;
        self.frame += 1;
        FrameOutcome::Presented
    }
}
