//! Per-file decode outcome accumulators

/// Running counters over all buffers of one imagefile
///
/// Owned by the per-file driver and passed by reference through every
/// buffer decode call. Structural problems and rejected particles are
/// recorded here instead of being raised as errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BufferCounters {
    /// Particles accepted and handed to the caller
    pub particles: u32,
    /// Buffers aborted due to header bit errors
    pub bit_errors: u32,
    /// Particles rejected for having no foreground pixels
    pub zero_pixel: u32,
    /// Particles whose foreground touches a sensor edge
    pub truncated: u32,
}

impl BufferCounters {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters, typically at the start of a file
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
