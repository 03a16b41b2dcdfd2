//! Keyframe timelines.
//!
//! A [`KeyframeTimeline`] describes one animated property the way a retained
//! compositor consumes it: an ordered list of values spread over `duration`
//! seconds, optionally at explicit normalized key times, with repeat and fill
//! policies and a time offset. The offset is what staggers the segments of an
//! indicator: every segment shares one value sequence and only its offset
//! differs.
//!
//! Timelines are evaluated in the local time of the layer they are attached
//! to, counted from the moment they were attached. [`KeyframeTimeline::sample`]
//! implements this evaluation for hosts without a native timeline engine.

use crate::geometry::{lerp, Path};
use serde::{Deserialize, Serialize};

/// Animated value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Scalar property: opacity, scale, rotation, z-order.
    Scalar(f64),
    /// Shape property.
    Path(Path),
}

/// How many times a timeline plays.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Repeat {
    /// Loops forever.
    Infinite,
    /// Plays the given (possibly fractional) number of cycles.
    Count(f64),
}

/// Which value is shown outside of the active interval.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fill {
    /// Nothing is shown outside of the active interval.
    Removed,
    /// The first value is held before the start.
    Backwards,
    /// The last value is held after the end.
    Forwards,
    /// Both of the above.
    Both,
}

/// Pacing of the whole cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimingFunction {
    /// Constant pace.
    Linear,
    /// Cubic bézier `(0.42, 0.0) (0.58, 1.0)`.
    EaseInEaseOut,
}

/// How values between two keyframes are computed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationMode {
    /// Interpolated.
    Linear,
    /// Each value is held until the next key time.
    Discrete,
}

/// Declarative animation of one property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTimeline {
    values: Vec<Value>,
    key_times: Option<Vec<f64>>,
    duration: f64,
    time_offset: f64,
    repeat: Repeat,
    fill: Fill,
    removed_on_completion: bool,
    timing: TimingFunction,
    calculation: CalculationMode,
    period: Option<f64>,
}

/// Time offset of segment `index` in a staggered set: `loop_duration -
/// loop_duration / segment_count * index`. Segment `i` starts its cycle
/// `i / segment_count` of a loop after segment 0.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn stagger_offset(loop_duration: f64, segment_count: usize, index: usize) -> f64 {
    loop_duration - loop_duration / segment_count as f64 * index as f64
}

impl Value {
    /// Returns the scalar, if any.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match *self {
            Value::Scalar(value) => Some(value),
            Value::Path(_) => None,
        }
    }

    /// Returns the path, if any.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::Path(path) => Some(path),
            Value::Scalar(_) => None,
        }
    }

    fn interpolate(&self, other: &Value, t: f64) -> Value {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(lerp(*a, *b, t)),
            (Value::Path(a), Value::Path(b)) => {
                Value::Path(a.lerp(b, t).unwrap_or_else(|| (if t < 1.0 { a } else { b }).clone()))
            }
            _ => (if t < 1.0 { self } else { other }).clone(),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(value)
    }
}

impl From<Path> for Value {
    fn from(path: Path) -> Self {
        Value::Path(path)
    }
}

impl KeyframeTimeline {
    /// Creates a timeline playing `values` once over `duration` seconds.
    ///
    /// # Panics
    ///
    /// In debug builds, if fewer than two values are given or `duration` isn't
    /// positive. Release builds keep the timeline, which then samples to `None`.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = impl Into<Value>>, duration: f64) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        debug_assert!(values.len() >= 2, "a timeline needs at least two values");
        debug_assert!(duration > 0.0, "a timeline needs a positive duration");
        Self {
            values,
            key_times: None,
            duration,
            time_offset: 0.0,
            repeat: Repeat::Count(1.0),
            fill: Fill::Removed,
            removed_on_completion: true,
            timing: TimingFunction::Linear,
            calculation: CalculationMode::Linear,
            period: None,
        }
    }

    /// Creates a two-value timeline.
    #[must_use]
    pub fn basic(from: impl Into<Value>, to: impl Into<Value>, duration: f64) -> Self {
        Self::new([from.into(), to.into()], duration)
    }

    /// Loops the timeline forever.
    #[must_use]
    pub fn repeat_forever(mut self) -> Self {
        self.repeat = Repeat::Infinite;
        self
    }

    /// Sets the time offset.
    #[must_use]
    pub fn with_time_offset(mut self, time_offset: f64) -> Self {
        self.time_offset = time_offset;
        self
    }

    /// Sets explicit normalized key times, one per value.
    ///
    /// # Panics
    ///
    /// In debug builds, if the key times don't match the values or aren't a
    /// non-decreasing sequence from 0 to 1.
    #[must_use]
    pub fn with_key_times(mut self, key_times: Vec<f64>) -> Self {
        debug_assert_eq!(key_times.len(), self.values.len());
        debug_assert!(key_times.windows(2).all(|w| w[0] <= w[1]));
        debug_assert!(key_times.first() == Some(&0.0) && key_times.last() == Some(&1.0));
        self.key_times = Some(key_times);
        self
    }

    /// Sets the timing function.
    #[must_use]
    pub fn with_timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }

    /// Holds each value until the next key time.
    #[must_use]
    pub fn discrete(mut self) -> Self {
        self.calculation = CalculationMode::Discrete;
        self
    }

    /// Sets the fill policy and keeps the timeline attached once finished.
    #[must_use]
    pub fn retained(mut self, fill: Fill) -> Self {
        self.fill = fill;
        self.removed_on_completion = false;
        self
    }

    /// Declares the values periodic, e.g. `2π` for a rotation.
    #[must_use]
    pub fn periodic(mut self, period: f64) -> Self {
        self.period = Some(period);
        self
    }

    /// Keyframe values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Explicit key times, if any.
    #[must_use]
    pub fn key_times(&self) -> Option<&[f64]> {
        self.key_times.as_deref()
    }

    /// Cycle duration, in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Raw time offset, as handed to the compositor.
    #[must_use]
    pub fn time_offset(&self) -> f64 {
        self.time_offset
    }

    /// Time offset folded into `[0, duration)`.
    #[must_use]
    pub fn phase_offset(&self) -> f64 {
        let phase = self.time_offset.rem_euclid(self.duration);
        if phase >= self.duration {
            0.0
        } else {
            phase
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn fill(&self) -> Fill {
        self.fill
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn removed_on_completion(&self) -> bool {
        self.removed_on_completion
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn timing(&self) -> TimingFunction {
        self.timing
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn calculation(&self) -> CalculationMode {
        self.calculation
    }

    /// Returns `true` if the timeline loops forever.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.repeat == Repeat::Infinite
    }

    /// Returns `true` if the last value leads back to the first one without a
    /// jump. Periodic values are compared modulo their period.
    #[must_use]
    pub fn is_loop_continuous(&self) -> bool {
        const EPSILON: f64 = 1e-9;
        let (Some(first), Some(last)) = (self.values.first(), self.values.last()) else {
            return false;
        };
        match (first, last, self.period) {
            (Value::Scalar(first), Value::Scalar(last), Some(period)) => {
                let delta = (last - first).rem_euclid(period);
                delta < EPSILON || period - delta < EPSILON
            }
            (Value::Scalar(first), Value::Scalar(last), None) => (last - first).abs() < EPSILON,
            _ => first == last,
        }
    }

    /// Returns `true` if the timeline can be evaluated: at least two values,
    /// a positive finite duration and, when present, one key time per value.
    /// Timelines built through the constructors always are; deserialized ones
    /// may not be.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.values.len() >= 2
            && self.duration.is_finite()
            && self.duration > 0.0
            && self.key_times.as_ref().map_or(true, |key_times| key_times.len() == self.values.len())
    }

    /// Evaluates the timeline `time` seconds after it was attached. Returns
    /// `None` when the timeline has no effect at that time, or when it isn't
    /// [well formed](Self::is_well_formed).
    #[must_use]
    pub fn sample(&self, time: f64) -> Option<Value> {
        if !self.is_well_formed() {
            return None;
        }
        let t = time + self.time_offset;
        let progress = match self.repeat {
            Repeat::Infinite => {
                if t < 0.0 && !self.fills_backwards() {
                    return None;
                }
                t.max(0.0).rem_euclid(self.duration) / self.duration
            }
            Repeat::Count(count) => {
                let active = self.duration * count;
                if t < 0.0 {
                    if !self.fills_backwards() {
                        return None;
                    }
                    0.0
                } else if t >= active {
                    if self.removed_on_completion || !self.fills_forwards() {
                        return None;
                    }
                    let end = count.fract();
                    if end == 0.0 {
                        1.0
                    } else {
                        end
                    }
                } else {
                    t.rem_euclid(self.duration) / self.duration
                }
            }
        };
        Some(self.value_at(self.timing.apply(progress.clamp(0.0, 1.0))))
    }

    /// Scalar shortcut for [`Self::sample`].
    #[must_use]
    pub fn sample_scalar(&self, time: f64) -> Option<f64> {
        self.sample(time).and_then(|value| value.as_scalar())
    }

    fn fills_backwards(&self) -> bool {
        matches!(self.fill, Fill::Backwards | Fill::Both)
    }

    fn fills_forwards(&self) -> bool {
        matches!(self.fill, Fill::Forwards | Fill::Both)
    }

    #[allow(clippy::cast_precision_loss)]
    fn key_time(&self, index: usize) -> f64 {
        match &self.key_times {
            Some(key_times) => key_times[index],
            None => index as f64 / (self.values.len() - 1) as f64,
        }
    }

    fn value_at(&self, progress: f64) -> Value {
        let last = self.values.len() - 1;
        if progress >= 1.0 {
            return self.values[last].clone();
        }
        // Last keyframe starting at or before `progress`, so that zero-length
        // intervals resolve to their right-hand value.
        let index = (0..last).rev().find(|&i| self.key_time(i) <= progress).unwrap_or(0);
        let (start, end) = (self.key_time(index), self.key_time(index + 1));
        match self.calculation {
            CalculationMode::Discrete => self.values[index].clone(),
            CalculationMode::Linear => {
                let local = if end > start { (progress - start) / (end - start) } else { 1.0 };
                self.values[index].interpolate(&self.values[index + 1], local)
            }
        }
    }
}

impl TimingFunction {
    /// Maps linear progress in `[0, 1]` to paced progress.
    #[must_use]
    pub fn apply(self, progress: f64) -> f64 {
        match self {
            TimingFunction::Linear => progress,
            TimingFunction::EaseInEaseOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, progress),
        }
    }
}

/// Solves a CSS-style cubic bézier easing curve for `x`.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let curve = |a: f64, b: f64, t: f64| {
        let u = 1.0 - t;
        3.0 * u * u * t * a + 3.0 * u * t * t * b + t * t * t
    };
    let (mut low, mut high) = (0.0, 1.0);
    let mut t = x;
    for _ in 0..64 {
        let estimate = curve(x1, x2, t);
        if (estimate - x).abs() < 1e-12 {
            break;
        }
        if estimate < x {
            low = t;
        } else {
            high = t;
        }
        t = (low + high) / 2.0;
    }
    curve(y1, y2, t)
}
