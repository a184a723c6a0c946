use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use agency_core::collaborators::TickTimer;

const DAY_YIELD: Duration = Duration::from_millis(20);

/// Interval timer polled by the input loop. Every `start` begins a new generation, so
/// a restarted timer never keeps the old deadline.
#[derive(Clone, Default)]
pub struct LoopTimer {
    interval: Rc<Cell<Option<Duration>>>,
    generation: Rc<Cell<u64>>,
}

impl LoopTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watch(&self) -> TimerWatch {
        TimerWatch {
            timer: self.clone(),
            generation: self.generation.get(),
            deadline: self.interval.get().map(|interval| Instant::now() + interval),
        }
    }
}

impl TickTimer for LoopTimer {
    fn start(&mut self, interval: Duration) {
        self.interval.set(Some(interval));
        self.generation.set(self.generation.get() + 1);
    }

    fn stop(&mut self) {
        self.interval.set(None);
    }

    fn yield_between_days(&mut self) {
        thread::sleep(DAY_YIELD);
    }
}

/// The input loop's view of the timer.
pub struct TimerWatch {
    timer: LoopTimer,
    generation: u64,
    deadline: Option<Instant>,
}

impl TimerWatch {
    /// Picks up a restart or a stop since the last call.
    fn sync(&mut self) {
        let generation = self.timer.generation.get();
        match self.timer.interval.get() {
            None => self.deadline = None,
            Some(interval) if generation != self.generation || self.deadline.is_none() => {
                self.generation = generation;
                self.deadline = Some(Instant::now() + interval);
            }
            Some(_) => {}
        }
    }

    /// How long the loop may block before the next tick is due. `None` while stopped.
    pub fn time_left(&mut self) -> Option<Duration> {
        self.sync();
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// True once per elapsed interval; re-arms the deadline when it fires.
    pub fn fire_if_due(&mut self) -> bool {
        self.sync();
        match (self.deadline, self.timer.interval.get()) {
            (Some(deadline), Some(interval)) if Instant::now() >= deadline => {
                self.deadline = Some(Instant::now() + interval);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_timer_never_fires() {
        let mut timer = LoopTimer::new();
        let mut watch = timer.watch();
        assert_eq!(watch.time_left(), None);
        timer.start(Duration::from_millis(0));
        assert!(watch.fire_if_due());
        timer.stop();
        assert!(!watch.fire_if_due());
        assert_eq!(watch.time_left(), None);
    }

    #[test]
    fn restart_replaces_the_deadline() {
        let mut timer = LoopTimer::new();
        let mut watch = timer.watch();
        timer.start(Duration::from_secs(60));
        assert!(watch.time_left().unwrap() > Duration::from_secs(30));
        timer.stop();
        timer.start(Duration::from_millis(0));
        assert!(watch.fire_if_due());
    }
}
