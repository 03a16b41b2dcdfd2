use super::staggered;
use crate::{
    consts::{PIE_MAX_SCALE, PIE_MIN_SCALE},
    geometry::sector,
    indicator::{
        Error, IndicatorConfig, Property, SegmentDescriptor, SegmentSet, Style, StyleGenerator,
    },
    timeline::TimingFunction,
};
use log::debug;
use rand::RngCore;

/// Pie wedges pulsing one after another.
///
/// Each wedge spans `2π / n` around the region center and breathes between
/// `min_scale` and `max_scale`. The radius is reduced by `max_scale`, so the
/// wedges never leave the region at the top of the pulse. Wrap in
/// [`super::Rotating`] to turn the whole pie.
#[derive(Clone, Debug)]
pub struct Pie {
    /// Scale at rest.
    pub min_scale: f64,
    /// Scale at the top of the pulse.
    pub max_scale: f64,
}

impl Default for Pie {
    fn default() -> Self {
        Self { min_scale: PIE_MIN_SCALE, max_scale: PIE_MAX_SCALE }
    }
}

impl StyleGenerator for Pie {
    fn style(&self) -> Style {
        Style::Pie
    }

    fn hide_property(&self) -> Property {
        Property::Scale
    }

    fn generate(&self, config: &IndicatorConfig, _rng: &mut dyn RngCore) -> Result<SegmentSet, Error> {
        config.validate()?;
        let center = config.region.mid();
        let segments = (0..config.segment_count)
            .map(|i| {
                let pulse = staggered([self.min_scale, self.max_scale, self.min_scale], config, i)
                    .with_timing(TimingFunction::EaseInEaseOut);
                SegmentDescriptor::new(
                    i,
                    sector(&config.region, config.segment_count, i, self.max_scale),
                    config.color(i),
                    center,
                )
                .stroked()
                .with_timeline(Property::Scale, pulse)
            })
            .collect();
        debug!("Generated {} pie wedges", config.segment_count);
        Ok(SegmentSet::new(Style::Pie, self.hide_property(), segments))
    }
}
