use super::staggered;
use crate::{
    consts::{EQUALIZER_GAP, EQUALIZER_MIN_SCALE},
    geometry::{bar_path, bar_position, bar_width, Point},
    indicator::{
        Error, IndicatorConfig, Property, SegmentDescriptor, SegmentSet, Style, StyleGenerator,
    },
    timeline::TimingFunction,
};
use log::debug;
use rand::RngCore;
use std::f64::consts::PI;

/// Equalizer bars pulsing as a traveling wave.
///
/// Bars split the region width into equal columns and stand on the bottom
/// edge. Each one scales vertically from `min_scale` up to its peak and back,
/// staggered along the row. The peaks follow a sine envelope sampled at the
/// middle of each column, `sin(π (i + 0.5) / n)`, so the center bars swing
/// the most.
#[derive(Clone, Debug)]
pub struct EqualizerBars {
    /// Level at rest, as a fraction of the full bar height.
    pub min_scale: f64,
    /// Horizontal gap between bars.
    pub gap: f64,
}

impl Default for EqualizerBars {
    fn default() -> Self {
        Self { min_scale: EQUALIZER_MIN_SCALE, gap: EQUALIZER_GAP }
    }
}

impl EqualizerBars {
    /// Peak level of bar `index`.
    ///
    /// The envelope is sampled at the middle of each column,
    /// `sin(π (index + 0.5) / n)`, deliberately not at its left edge, so that
    /// the first bar does not collapse to `min_scale` alone.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn peak(&self, segment_count: usize, index: usize) -> f64 {
        let envelope = (PI * (index as f64 + 0.5) / segment_count as f64).sin();
        self.min_scale + (1.0 - self.min_scale) * envelope
    }
}

impl StyleGenerator for EqualizerBars {
    fn style(&self) -> Style {
        Style::EqualizerBars
    }

    fn hide_property(&self) -> Property {
        Property::ScaleY
    }

    fn generate(&self, config: &IndicatorConfig, _rng: &mut dyn RngCore) -> Result<SegmentSet, Error> {
        config.validate()?;
        let n = config.segment_count;
        let height = config.region.min_side();
        let width = bar_width(&config.region, n, self.gap);
        let segments = (0..n)
            .map(|i| {
                let level = staggered([self.min_scale, self.peak(n, i), self.min_scale], config, i)
                    .with_timing(TimingFunction::EaseInEaseOut);
                SegmentDescriptor::new(
                    i,
                    bar_path(width, height),
                    config.color(i),
                    bar_position(&config.region, n, i),
                )
                .stroked()
                .with_anchor_point(Point::new(0.5, 1.0))
                .with_timeline(Property::ScaleY, level)
            })
            .collect();
        debug!("Generated {n} equalizer bars");
        Ok(SegmentSet::new(Style::EqualizerBars, self.hide_property(), segments))
    }
}
