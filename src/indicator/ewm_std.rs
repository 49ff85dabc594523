/// Exponentially-weighted standard deviation with adjusted weights.
///
/// The observation `i` steps back carries weight `(1 - alpha)^i`, with
/// `alpha = 2 / (span + 1)`. The weighted variance is bias-corrected by
/// `W^2 / (W^2 - sum(w^2))`, so a single observation has no defined value.
///
/// NaN inputs are skipped but still count as elapsed steps, so older
/// observations keep decaying across the gap.
#[derive(Debug, Clone)]
pub struct EwmStd {
    span: usize,
    decay: f64,
    sum_w: f64,
    sum_w2: f64,
    sum_wx: f64,
    sum_wx2: f64,
    count: usize,
}

impl EwmStd {
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "EwmStd span must be > 0");
        let alpha = 2.0 / (span as f64 + 1.0);
        Self {
            span,
            decay: 1.0 - alpha,
            sum_w: 0.0,
            sum_w2: 0.0,
            sum_wx: 0.0,
            sum_wx2: 0.0,
            count: 0,
        }
    }

    /// Push a new value, return the current deviation (NaN while undefined).
    pub fn push(&mut self, value: f64) -> f64 {
        let d = self.decay;
        self.sum_w *= d;
        self.sum_w2 *= d * d;
        self.sum_wx *= d;
        self.sum_wx2 *= d;
        if !value.is_nan() {
            self.sum_w += 1.0;
            self.sum_w2 += 1.0;
            self.sum_wx += value;
            self.sum_wx2 += value * value;
            self.count += 1;
        }
        self.value()
    }

    pub fn value(&self) -> f64 {
        let denom = self.sum_w * self.sum_w - self.sum_w2;
        if self.count < 2 || denom <= 0.0 {
            return f64::NAN;
        }
        let mean = self.sum_wx / self.sum_w;
        let biased = (self.sum_wx2 / self.sum_w - mean * mean).max(0.0);
        let corrected = biased * (self.sum_w * self.sum_w) / denom;
        corrected.sqrt()
    }

    pub fn span(&self) -> usize {
        self.span
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
