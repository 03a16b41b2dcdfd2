//! Style generators.

mod equalizer;
mod pie;
mod radial_fade;
mod random_equalizer;
mod ring_growth;
mod rotation;

pub use self::{
    equalizer::EqualizerBars, pie::Pie, radial_fade::RadialFade,
    random_equalizer::RandomEqualizer, ring_growth::RingGrowth, rotation::{group_rotation, Rotating},
};

use super::IndicatorConfig;
use crate::timeline::{stagger_offset, KeyframeTimeline, Value};

/// Infinite timeline over one loop, delayed by `index / segment_count` of a
/// loop relative to segment 0.
fn staggered(
    values: impl IntoIterator<Item = impl Into<Value>>,
    config: &IndicatorConfig,
    index: usize,
) -> KeyframeTimeline {
    KeyframeTimeline::new(values, config.loop_duration)
        .repeat_forever()
        .with_time_offset(stagger_offset(config.loop_duration, config.segment_count, index))
}
