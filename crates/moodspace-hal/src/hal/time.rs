// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

/// Time and delay abstraction for embedded platforms
pub trait TimeProvider {
    /// Get current time in microseconds since system boot
    ///
    /// # Returns
    /// Monotonic timestamp in microseconds
    fn get_time_us(&self) -> u64;

    /// Block for the specified number of microseconds
    fn delay_us(&self, us: u32);

    /// Block for the specified number of milliseconds
    fn delay_ms(&self, ms: u32) {
        self.delay_us(ms.saturating_mul(1000));
    }

    /// Milliseconds elapsed since `start_us` (a value from [`get_time_us`](Self::get_time_us))
    fn elapsed_ms_since(&self, start_us: u64) -> u64 {
        self.get_time_us().saturating_sub(start_us) / 1000
    }
}

impl<T: TimeProvider + ?Sized> TimeProvider for &T {
    fn get_time_us(&self) -> u64 {
        (**self).get_time_us()
    }

    fn delay_us(&self, us: u32) {
        (**self).delay_us(us)
    }
}
