use crate::{
    consts::{EQUALIZER_GAP, EQUALIZER_MIN_SCALE},
    geometry::{bar_path, bar_position, bar_width, Point},
    indicator::{
        Error, IndicatorConfig, Property, SegmentDescriptor, SegmentSet, Style, StyleGenerator,
    },
    timeline::{Fill, KeyframeTimeline, Value},
};
use log::debug;
use rand::{distributions::Uniform, Rng, RngCore};

/// Equalizer bars jumping between random levels.
///
/// Every bar draws `n + 1` independent levels in `[min_scale, 1]` and morphs
/// its outline through them over one loop, then through the first level again
/// so the loop closes without a jump. Bars are not staggered.
///
/// Levels come from the `rng` handed to [`StyleGenerator::generate`]: two
/// calls only produce the same bars when given identically seeded generators.
#[derive(Clone, Debug)]
pub struct RandomEqualizer {
    /// Lowest level, as a fraction of the full bar height.
    pub min_scale: f64,
    /// Horizontal gap between bars.
    pub gap: f64,
}

impl Default for RandomEqualizer {
    fn default() -> Self {
        Self { min_scale: EQUALIZER_MIN_SCALE, gap: EQUALIZER_GAP }
    }
}

impl StyleGenerator for RandomEqualizer {
    fn style(&self) -> Style {
        Style::RandomEqualizer
    }

    fn hide_property(&self) -> Property {
        Property::ScaleY
    }

    fn generate(&self, config: &IndicatorConfig, rng: &mut dyn RngCore) -> Result<SegmentSet, Error> {
        config.validate()?;
        let n = config.segment_count;
        let height = config.region.min_side();
        let width = bar_width(&config.region, n, self.gap);
        let levels = Uniform::new_inclusive(self.min_scale.min(1.0), 1.0);
        let segments = (0..n)
            .map(|i| {
                let mut paths: Vec<Value> = (0..=n)
                    .map(|_| Value::Path(bar_path(width, height * rng.sample(levels))))
                    .collect();
                paths.push(paths[0].clone());
                let initial = paths[0].as_path().cloned().unwrap_or_default();
                let timeline = KeyframeTimeline::new(paths, config.loop_duration)
                    .repeat_forever()
                    .retained(Fill::Forwards);
                SegmentDescriptor::new(i, initial, config.color(i), bar_position(&config.region, n, i))
                    .stroked()
                    .with_anchor_point(Point::new(0.5, 1.0))
                    .with_timeline(Property::Path, timeline)
            })
            .collect();
        debug!("Generated {n} random equalizer bars");
        Ok(SegmentSet::new(Style::RandomEqualizer, self.hide_property(), segments))
    }
}
