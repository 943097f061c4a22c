//! Decode configuration

use crate::filters::RangeFilter;

/// Configuration for decoding one imagefile
///
/// All analyses are off and all filters empty by default; a plain
/// [`DecodeOptions::default`] decodes and reconstructs every non-truncated
/// particle without further processing.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecodeOptions {
    /// Keep particles that touch a sensor edge
    pub include_truncated: bool,
    /// Shift accepted images so the barycenter sits on the center diode
    pub center_particle: bool,
    /// Detect and measure enclosed Poisson spots
    pub poisson_spots: bool,
    /// Fit principal components and an ellipse to each particle
    pub principal_components: bool,
    /// Count connected particle clusters
    pub cluster_count: bool,
    /// Accepted time-of-day windows in seconds since midnight
    pub timeframes: RangeFilter,
    /// Accepted image heights in slices
    pub heights: RangeFilter,
    /// Accepted particle widths in diodes
    pub widths: RangeFilter,
}

impl DecodeOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep truncated particles
    pub fn with_truncated(mut self, include: bool) -> Self {
        self.include_truncated = include;
        self
    }

    /// Center accepted particle images
    pub fn with_centering(mut self, center: bool) -> Self {
        self.center_particle = center;
        self
    }

    /// Enable Poisson spot detection
    pub fn with_poisson_spots(mut self, detect: bool) -> Self {
        self.poisson_spots = detect;
        self
    }

    /// Enable the principal component and ellipse fit
    pub fn with_principal_components(mut self, fit: bool) -> Self {
        self.principal_components = fit;
        self
    }

    /// Enable connected-cluster counting
    pub fn with_cluster_count(mut self, count: bool) -> Self {
        self.cluster_count = count;
        self
    }

    /// Restrict decoding to the given time-of-day windows
    pub fn with_timeframes(mut self, timeframes: RangeFilter) -> Self {
        self.timeframes = timeframes;
        self
    }

    /// Restrict decoding to the given image heights
    pub fn with_heights(mut self, heights: RangeFilter) -> Self {
        self.heights = heights;
        self
    }

    /// Restrict decoding to the given particle widths
    pub fn with_widths(mut self, widths: RangeFilter) -> Self {
        self.widths = widths;
        self
    }
}
