use crate::{
    indicator::{Error, IndicatorConfig, Property, SegmentSet, Style, StyleGenerator},
    timeline::KeyframeTimeline,
};
use rand::RngCore;
use std::f64::consts::PI;

/// Adds a continuous rotation of the whole group to another style.
///
/// The group turns linearly from `0` to `2π` once per loop, forever, without
/// autoreversing. It runs independently of the per-segment timelines.
#[derive(Clone, Debug, Default)]
pub struct Rotating<G> {
    inner: G,
}

impl<G: StyleGenerator> Rotating<G> {
    /// Creates a new [`Rotating`] around `inner`.
    #[must_use]
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    /// Returns the wrapped generator.
    #[must_use]
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

/// One full turn per `loop_duration`.
#[must_use]
pub fn group_rotation(loop_duration: f64) -> KeyframeTimeline {
    KeyframeTimeline::basic(0.0, 2.0 * PI, loop_duration).repeat_forever().periodic(2.0 * PI)
}

impl<G: StyleGenerator> StyleGenerator for Rotating<G> {
    fn style(&self) -> Style {
        self.inner.style()
    }

    fn hide_property(&self) -> Property {
        self.inner.hide_property()
    }

    fn generate(&self, config: &IndicatorConfig, rng: &mut dyn RngCore) -> Result<SegmentSet, Error> {
        let set = self.inner.generate(config, rng)?;
        Ok(set.with_group_transform(group_rotation(config.loop_duration)))
    }
}
