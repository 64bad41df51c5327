//! Constant-time rolling checksum over a fixed-size window.
//!
//! `a = (Σxᵢ) mod 2^16`, `b = (Σ(L−i+1)·xᵢ) mod 2^16` (1-indexed),
//! `H = a + 2^16·b`. `add` replaces the oldest buffered octet and updates
//! both accumulators in constant time; `add_buffer` is repeated `add`, so
//! the sliding-window invariant (`add_buffer(prefix)` then `add(x)` equals
//! `add_buffer(prefix[1:] ++ [x])` once the window is full) holds by
//! construction.

use crate::error::{Error, Result};

const MODULO: u32 = 1 << 16;

/// Rolling checksum state over a fixed-size window of recently absorbed
/// octets.
#[derive(Debug, Clone)]
pub struct RollingHash {
    window: Box<[u8]>,
    /// Index of the oldest octet currently buffered.
    head: usize,
    /// Octets absorbed since the last reset, saturating at `window.len()`.
    /// Used only to tell a partially-filled window apart from a full one.
    absorbed: usize,
    a: u32,
    b: u32,
}

impl RollingHash {
    /// Creates a rolling hash over a window of `window_size` octets.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `window_size` is zero.
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::config("rolling hash window size must be non-zero"));
        }
        Ok(Self {
            window: vec![0u8; window_size].into_boxed_slice(),
            head: 0,
            absorbed: 0,
            a: 0,
            b: 0,
        })
    }

    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window.len()
    }

    /// Whether the window has absorbed at least `window_size` octets since
    /// the last reset.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.absorbed >= self.window.len()
    }

    /// Replaces the oldest buffered octet with `new`, shifting the window
    /// one position, and updates `a`/`b` in constant time.
    pub fn add(&mut self, new: u8) {
        let l = self.window.len() as u32;
        let old = u32::from(self.window[self.head]);

        self.a = (self.a + MODULO - old + u32::from(new)) % MODULO;
        let l_old = (l * old) % MODULO;
        self.b = (self.b + MODULO - l_old + self.a) % MODULO;

        self.window[self.head] = new;
        self.head = (self.head + 1) % self.window.len();
        self.absorbed = self.absorbed.saturating_add(1);
    }

    /// Applies [`Self::add`] for each octet in order.
    pub fn add_buffer(&mut self, octets: &[u8]) {
        for &byte in octets {
            self.add(byte);
        }
    }

    /// Zeroes the buffer, `a`, `b`, and the absorbed-octet counter.
    pub fn reset(&mut self) {
        self.window.fill(0);
        self.head = 0;
        self.absorbed = 0;
        self.a = 0;
        self.b = 0;
    }

    /// Returns `a + 2^16·b`, wrapping — this is a checksum, not a number.
    #[must_use]
    pub fn hash(&self) -> u32 {
        self.a.wrapping_add(MODULO.wrapping_mul(self.b))
    }

    /// Convenience: the hash of `data` computed from a freshly loaded
    /// window the same size as `data`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `data` is empty.
    pub fn compute(data: &[u8]) -> Result<u32> {
        let mut rolling = Self::new(data.len())?;
        rolling.add_buffer(data);
        Ok(rolling.hash())
    }
}
