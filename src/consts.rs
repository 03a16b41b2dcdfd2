//! Project constants.

/// Duration of the animated hide and reveal transitions, in seconds.
pub const TRANSITION_DURATION: f64 = 0.4;

/// Duration of the hide transition when the indicator is stopped without
/// animation (e.g. a configuration applied while stopped).
pub const INSTANT_TRANSITION_DURATION: f64 = 0.01;

/// Pie: smallest wedge scale of the pulse.
pub const PIE_MIN_SCALE: f64 = 0.9;

/// Pie: largest wedge scale of the pulse.
pub const PIE_MAX_SCALE: f64 = 1.2;

/// Ring growth: scale reached by the active ring before it fades out.
pub const RING_MAX_SCALE: f64 = 1.2;

/// Equalizer: lowest bar level, as a fraction of the full bar height.
pub const EQUALIZER_MIN_SCALE: f64 = 0.2;

/// Equalizer: horizontal gap between two bars, in region units.
pub const EQUALIZER_GAP: f64 = 0.0;

/// Radial fade: opacity of a dash at rest.
pub const RADIAL_MIN_FADE: f64 = 0.01;

/// Radial fade: opacity of the highlighted dash.
pub const RADIAL_MAX_FADE: f64 = 1.0;

/// Radial fade: the inner empty disc has radius `outer radius / RADIAL_CENTER_RATIO`.
pub const RADIAL_CENTER_RATIO: f64 = 2.5;

/// Default number of segments.
pub const DEFAULT_SEGMENT_COUNT: usize = 15;

/// Default loop duration, in seconds.
pub const DEFAULT_LOOP_DURATION: f64 = 12.0;

/// Default region side, in region units.
pub const DEFAULT_REGION_SIDE: f64 = 100.0;

/// Default palette.
pub const DEFAULT_PALETTE: [u32; 5] = [0xDB5C65, 0xA7405D, 0x3B1C57, 0xF59155, 0x733633];

/// Default log level when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";
