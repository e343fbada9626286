// SPDX-FileCopyrightText: 2025 2025 Contributors to the Media eXchange Layer project.
// SPDX-License-Identifier: Apache-2.0

//! Self-modulating chirp oscillator.
//!
//! Four accumulators drive the waveform. `c` and `d` form a slow rotation
//! that sweeps the frequency once per chunk; `a` and `b` form the audible
//! rotation whose step size depends on that frequency:
//!
//! ```text
//! per chunk:   c += d;  d -= c / 1000;  freq = 1100 + 1000 * d
//! per sample:  a += b;  b -= a / freq;  sample = trunc(500 * a) mod 2^16
//! ```

/// Oscillator state `(a, b, c, d)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Default for Oscillator {
    /// Starts at `(a=0, b=1, c=0, d=1)`.
    fn default() -> Self {
        Oscillator::new(0.0, 1.0, 0.0, 1.0)
    }
}

impl Oscillator {
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Oscillator { a, b, c, d }
    }

    /// Current `(a, b, c, d)`.
    pub fn state(&self) -> (f64, f64, f64, f64) {
        (self.a, self.b, self.c, self.d)
    }

    /// Advances the frequency sweep by one chunk and returns the new frequency.
    fn sweep(&mut self) -> f64 {
        self.c += self.d;
        self.d -= self.c / 1000.0;
        1100.0 + 1000.0 * self.d
    }

    /// Fills `out` with one chunk of samples.
    pub fn fill(&mut self, out: &mut [u16]) {
        let freq = self.sweep();
        for sample in out.iter_mut() {
            self.a += self.b;
            self.b -= self.a / freq;
            *sample = quantize(self.a);
        }
    }
}

/// Scales by 500 and wraps modulo 2^16.
fn quantize(a: f64) -> u16 {
    (500.0 * a) as i64 as u16
}
