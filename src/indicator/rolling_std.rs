/// Trailing sample standard deviation (ddof = 1) over a fixed window.
///
/// Values are kept in a ring buffer; the deviation is recomputed from the
/// buffered values on each push so no rounding error accumulates.
#[derive(Debug, Clone)]
pub struct RollingStd {
    window: usize,
    buffer: Vec<f64>,
    head: usize,
    count: usize,
}

impl RollingStd {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "RollingStd window must be > 0");
        Self {
            window,
            buffer: vec![0.0; window],
            head: 0,
            count: 0,
        }
    }

    /// Push a new value, return the current deviation once the window is full.
    ///
    /// A window of one yields NaN, as does any window holding a non-finite value.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.buffer[self.head] = value;
        self.head = (self.head + 1) % self.window;
        if self.count < self.window {
            self.count += 1;
        }
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        if !self.is_ready() {
            return None;
        }
        if self.window < 2 {
            return Some(f64::NAN);
        }
        let n = self.window as f64;
        let mean = self.buffer.iter().sum::<f64>() / n;
        let ss: f64 = self.buffer.iter().map(|v| (v - mean) * (v - mean)).sum();
        Some((ss / (n - 1.0)).sqrt())
    }

    pub fn is_ready(&self) -> bool {
        self.count >= self.window
    }

    pub fn window(&self) -> usize {
        self.window
    }
}
