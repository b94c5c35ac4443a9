use crossbeam_channel::{Receiver, Sender, TryRecvError};

// Cooperative stop signal shared by the frame loop and the director thread.
//
// Nothing is ever sent on the channel. Triggering drops the only sender, which
// disconnects every receiver at once, so a listener can either poll it or
// block on it inside `crossbeam_channel::select!`.
pub struct Shutdown {
    trigger: Option<Sender<()>>,
    signal: ShutdownSignal,
}

#[derive(Clone, Debug)]
pub struct ShutdownSignal {
    receiver: Receiver<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(0);
        Shutdown {
            trigger: Some(sender),
            signal: ShutdownSignal { receiver },
        }
    }

    pub fn signal(&self) -> ShutdownSignal {
        self.signal.clone()
    }

    pub fn trigger(&mut self) {
        if self.trigger.take().is_some() {
            log::info!("Shutdown requested");
        }
    }

    #[cfg(test)]
    pub fn is_triggered(&self) -> bool {
        self.trigger.is_none()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Shutdown::new()
    }
}

impl ShutdownSignal {
    pub fn is_stopped(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected))
    }

    // For use in `select!`; becomes ready once shutdown is triggered.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.receiver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_follows_trigger() {
        let mut shutdown = Shutdown::new();
        let signal = shutdown.signal();
        let other = signal.clone();
        assert!(!signal.is_stopped());
        assert!(!shutdown.is_triggered());
        shutdown.trigger();
        assert!(signal.is_stopped());
        assert!(other.is_stopped());
        assert!(shutdown.is_triggered());
        // Triggering twice is harmless.
        shutdown.trigger();
        assert!(signal.is_stopped());
    }

    #[test]
    fn select_wakes_on_trigger() {
        let mut shutdown = Shutdown::new();
        let signal = shutdown.signal();
        let waiter = std::thread::spawn(move || {
            crossbeam_channel::select! {
                recv(signal.receiver()) -> message => message.is_err(),
            }
        });
        shutdown.trigger();
        assert!(waiter.join().unwrap());
    }
}
