// Two slots that swap read and write roles every frame.
//
// The role flag names the slot being written this frame. The other slot holds
// the previous frame's result and is the only one read by the simulation, so
// a slot is never read and written in the same frame. After the simulation
// runs, the written slot is the latest state and is what gets displayed.
#[derive(Debug)]
pub struct PingPong<T> {
    slots: [T; 2],
}

impl<T> PingPong<T> {
    fn new(first: T, second: T) -> Self {
        PingPong {
            slots: [first, second],
        }
    }

    pub fn from_fn(mut make: impl FnMut(usize) -> T) -> Self {
        PingPong::new(make(0), make(1))
    }

    pub fn write_index(mode: bool) -> usize {
        mode as usize
    }

    pub fn read_index(mode: bool) -> usize {
        (!mode) as usize
    }

    // Slot written by the simulation this frame, then read by the renderer.
    pub fn current(&self, mode: bool) -> &T {
        &self.slots[Self::write_index(mode)]
    }

    // Slot written last frame, read by the simulation this frame.
    pub fn previous(&self, mode: bool) -> &T {
        &self.slots[Self::read_index(mode)]
    }

    pub fn slots(&self) -> &[T; 2] {
        &self.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_disjoint() {
        for mode in [false, true].iter().copied() {
            assert_ne!(
                PingPong::<()>::write_index(mode),
                PingPong::<()>::read_index(mode)
            );
        }
    }

    #[test]
    fn previous_is_last_frames_current() {
        let slots = PingPong::from_fn(|i| i);
        let mut mode = false;
        let mut last_written = *slots.current(mode);
        for _ in 0..6 {
            mode = !mode;
            assert_eq!(*slots.previous(mode), last_written);
            last_written = *slots.current(mode);
        }
        assert_eq!(slots.slots(), &[0, 1]);
    }
}
