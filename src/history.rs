use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 25;

/// Sliding window over the most recent angle samples, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl AngleHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a sample, evicting the oldest once the window is full.
    pub fn push(&mut self, angle: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(angle);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Contiguous copy of the window, oldest first.
    pub fn to_vec(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

}

impl Default for AngleHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
