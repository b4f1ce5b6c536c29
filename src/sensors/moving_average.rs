//! Fixed-window ring-buffer average.
//!
//! The buffer is always full: every slot is seeded with a neutral value at
//! construction, so the mean is meaningful from the first read and the
//! first few samples cannot produce a startup transient.

#[derive(Debug, Clone)]
pub struct MovingAverage<const N: usize> {
    ring: [f32; N],
    head: usize,
}

impl<const N: usize> MovingAverage<N> {
    pub fn new(seed: f32) -> Self {
        assert!(N > 0, "window must hold at least one sample");
        Self {
            ring: [seed; N],
            head: 0,
        }
    }

    /// Overwrite the oldest slot and return the new mean.
    pub fn push(&mut self, sample: f32) -> f32 {
        self.ring[self.head] = sample;
        self.head = (self.head + 1) % N;
        self.mean()
    }

    /// Accumulated in `f64` so a full window of one value returns exactly
    /// that value.
    pub fn mean(&self) -> f32 {
        let sum: f64 = self.ring.iter().map(|&x| f64::from(x)).sum();
        (sum / N as f64) as f32
    }
}
