use std::time::Instant;

/// Frame clock - delta between ticks plus time since start
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    last_tick: Instant,
    frames: u64,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frames: 0,
        }
    }

    /// Seconds since the previous tick; advances the clock
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.frames += 1;
        delta
    }

    /// Seconds since the clock was created or reset
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Restart from the current instant. Used after long stalls such as
    /// initialization so the first frame does not see a huge delta.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_tick = now;
        self.frames = 0;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
