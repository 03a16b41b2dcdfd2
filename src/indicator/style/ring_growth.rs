use super::staggered;
use crate::{
    consts::RING_MAX_SCALE,
    geometry::{ring_radius, Path},
    indicator::{
        Error, IndicatorConfig, Property, SegmentDescriptor, SegmentSet, Style, StyleGenerator,
    },
};
use log::debug;
use rand::RngCore;

/// Concentric rings taking turns to swell, die and grow back.
///
/// Ring `i` has radius `base * (i + 1)` around the region center, so the
/// innermost ring is visible and the outermost one reaches the bounding radius
/// divided by `max_scale`. Smaller rings rest on top of larger ones.
///
/// One loop is split into `n` turns. During its own turn a ring runs a three
/// step sequence:
///
/// 1. grows to `max_scale` and moves in front of every other ring;
/// 2. fades out at full size;
/// 3. restarts from a zero scale and grows back to rest while fading in.
///
/// For the rest of the loop it holds its resting values. The turns are
/// staggered with the usual phase offsets.
#[derive(Clone, Debug)]
pub struct RingGrowth {
    /// Scale reached by the active ring.
    pub max_scale: f64,
}

impl Default for RingGrowth {
    fn default() -> Self {
        Self { max_scale: RING_MAX_SCALE }
    }
}

impl RingGrowth {
    #[allow(clippy::cast_precision_loss)]
    fn key_times(segment_count: usize) -> Vec<f64> {
        let turn = 1.0 / segment_count as f64;
        let mut key_times = vec![0.0, turn / 3.0, turn * 2.0 / 3.0, turn * 2.0 / 3.0, turn];
        if segment_count > 1 {
            key_times.push(1.0);
        }
        key_times
    }

    fn track(segment_count: usize, turn: [f64; 5], rest: f64) -> Vec<f64> {
        let mut values = turn.to_vec();
        if segment_count > 1 {
            values.push(rest);
        }
        values
    }
}

impl StyleGenerator for RingGrowth {
    fn style(&self) -> Style {
        Style::RingGrowth
    }

    fn hide_property(&self) -> Property {
        Property::Scale
    }

    #[allow(clippy::cast_precision_loss)]
    fn generate(&self, config: &IndicatorConfig, _rng: &mut dyn RngCore) -> Result<SegmentSet, Error> {
        config.validate()?;
        let n = config.segment_count;
        let center = config.region.mid();
        let key_times = Self::key_times(n);
        let front = n as f64;
        let segments = (0..n)
            .map(|i| {
                let rest = (n - 1 - i) as f64;
                let max = self.max_scale;
                let scale = staggered(Self::track(n, [1.0, max, max, 0.0, 1.0], 1.0), config, i)
                    .with_key_times(key_times.clone());
                let opacity = staggered(Self::track(n, [1.0, 1.0, 0.0, 0.0, 1.0], 1.0), config, i)
                    .with_key_times(key_times.clone());
                let z_order =
                    staggered(Self::track(n, [rest, front, front, rest, rest], rest), config, i)
                        .with_key_times(key_times.clone())
                        .discrete();
                let radius = ring_radius(&config.region, n, i, self.max_scale);
                SegmentDescriptor::new(i, Path::circle(radius), config.color(i), center)
                    .with_z_order(rest)
                    .with_timeline(Property::Scale, scale)
                    .with_timeline(Property::Opacity, opacity)
                    .with_timeline(Property::ZOrder, z_order)
            })
            .collect();
        debug!("Generated {n} growing rings");
        Ok(SegmentSet::new(Style::RingGrowth, self.hide_property(), segments))
    }
}
