use super::staggered;
use crate::{
    consts::{RADIAL_CENTER_RATIO, RADIAL_MAX_FADE, RADIAL_MIN_FADE},
    geometry::{dash, Point},
    indicator::{
        Error, IndicatorConfig, Property, SegmentDescriptor, SegmentSet, Style, StyleGenerator,
    },
};
use log::debug;
use rand::RngCore;

/// Radiating dashes with a highlight traveling around the circle, like a
/// classic activity indicator.
#[derive(Clone, Debug)]
pub struct RadialFade {
    /// Opacity at rest.
    pub min_fade: f64,
    /// Opacity of the highlighted dash.
    pub max_fade: f64,
    /// Ratio between the outer radius and the inner empty disc.
    pub center_ratio: f64,
}

impl Default for RadialFade {
    fn default() -> Self {
        Self {
            min_fade: RADIAL_MIN_FADE,
            max_fade: RADIAL_MAX_FADE,
            center_ratio: RADIAL_CENTER_RATIO,
        }
    }
}

impl StyleGenerator for RadialFade {
    fn style(&self) -> Style {
        Style::RadialFade
    }

    fn hide_property(&self) -> Property {
        Property::Opacity
    }

    fn generate(&self, config: &IndicatorConfig, _rng: &mut dyn RngCore) -> Result<SegmentSet, Error> {
        config.validate()?;
        let n = config.segment_count;
        let center = config.region.mid();
        let (min, max) = (self.min_fade, self.max_fade);
        let segments = (0..n)
            .map(|i| {
                // Comet tail: dark for most of the loop, lit at 3/4.
                let fade = staggered([min, min, min, max, min], config, i);
                SegmentDescriptor::new(
                    i,
                    dash(&config.region, n, i, self.center_ratio),
                    config.color(i),
                    center,
                )
                .stroked()
                .with_anchor_point(Point::ZERO)
                .with_timeline(Property::Opacity, fade)
            })
            .collect();
        debug!("Generated {n} radial dashes");
        Ok(SegmentSet::new(Style::RadialFade, self.hide_property(), segments))
    }
}
