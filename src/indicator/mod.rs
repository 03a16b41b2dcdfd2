//! Indicator styles.
//!
//! Every style implements [`StyleGenerator`]: given an [`IndicatorConfig`] it
//! builds the full [`SegmentSet`] in one pass. Generation is pure, except for
//! [`Style::RandomEqualizer`] which draws its bar levels from the injected
//! random number generator.

pub mod registry;
pub mod style;

pub use self::registry::StyleRegistry;

use crate::{
    color::Rgba,
    consts::{DEFAULT_LOOP_DURATION, DEFAULT_REGION_SIDE, DEFAULT_SEGMENT_COUNT},
    geometry::{Path, Point, Rect, Size},
    timeline::KeyframeTimeline,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Indicator errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The configuration can't produce a segment set.
    #[error("invalid indicator configuration: {0}")]
    InvalidConfiguration(String),
    /// The registry has no generator for the requested style.
    #[error("no generator registered for style {0}")]
    UnregisteredStyle(Style),
}

/// Indicator styles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Style {
    /// Rotating pie whose wedges pulse one after another.
    Pie,
    /// Concentric rings taking turns to swell and fade.
    RingGrowth,
    /// Bars pulsing as a traveling wave under a sine envelope.
    EqualizerBars,
    /// Bars jumping between random levels.
    RandomEqualizer,
    /// Radiating dashes with a rotating highlight.
    RadialFade,
}

/// Animated segment properties.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Property {
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Uniform scale around the segment position.
    Scale,
    /// Vertical scale around the segment position.
    ScaleY,
    /// Segment outline.
    Path,
    /// Stacking order, higher is on top.
    ZOrder,
    /// Rotation around the segment position, in radians.
    Rotation,
}

/// Indicator configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndicatorConfig {
    /// Number of segments.
    pub segment_count: usize,
    /// Segment colors, cycled when shorter than the segment count.
    pub colors: Vec<Rgba>,
    /// Period of the main loop, in seconds.
    pub loop_duration: f64,
    /// Drawing region.
    pub region: Rect,
    /// Indicator style.
    pub style: Style,
}

/// Static geometry and timelines of one segment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SegmentDescriptor {
    index: usize,
    path: Path,
    fill: Rgba,
    stroke: Option<Rgba>,
    position: Point,
    anchor_point: Point,
    z_order: f64,
    timelines: BTreeMap<Property, KeyframeTimeline>,
}

/// Generated segments of an indicator.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SegmentSet {
    style: Style,
    hide_property: Property,
    segments: Vec<SegmentDescriptor>,
    group_transform: Option<KeyframeTimeline>,
}

/// Generator of a segment set for one style.
pub trait StyleGenerator: Send + Sync {
    /// Style produced by this generator.
    fn style(&self) -> Style;

    /// Property ramped by the hide and reveal transitions.
    fn hide_property(&self) -> Property;

    /// Builds the segment set for `config`. Only randomized styles draw from
    /// `rng`.
    fn generate(&self, config: &IndicatorConfig, rng: &mut dyn RngCore) -> Result<SegmentSet, Error>;
}

impl Style {
    /// All styles.
    pub const ALL: [Style; 5] =
        [Style::Pie, Style::RingGrowth, Style::EqualizerBars, Style::RandomEqualizer, Style::RadialFade];

    /// Stable name, as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Style::Pie => "pie",
            Style::RingGrowth => "ring-growth",
            Style::EqualizerBars => "equalizer-bars",
            Style::RandomEqualizer => "random-equalizer",
            Style::RadialFade => "radial-fade",
        }
    }

    /// Showcase configuration for the style.
    #[must_use]
    pub fn demo_config(self, region: Rect) -> IndicatorConfig {
        let (segment_count, loop_duration, palette): (usize, f64, &[u32]) = match self {
            Style::RingGrowth => (3, 5.0, &[0x3498db, 0xecf0f1, 0xe74c3c]),
            Style::Pie => (18, 12.0, &[0xdb5c65, 0xa7405d, 0x3b1c57, 0xf59155, 0x733633]),
            Style::EqualizerBars | Style::RandomEqualizer => (
                14,
                4.0,
                &[0x2ecc71, 0x3498db, 0x9b59b6, 0xe67e22, 0xc0392b, 0xe74c3c, 0xe74c8c],
            ),
            Style::RadialFade => (12, 1.2, &[0x34495e]),
        };
        IndicatorConfig {
            segment_count,
            colors: palette.iter().copied().map(Rgba::from_rgb).collect(),
            loop_duration,
            region,
            style: self,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| Error::InvalidConfiguration(format!("unknown style `{s}`")))
    }
}

impl Property {
    /// Compositor key path of the property.
    #[must_use]
    pub fn key_path(self) -> &'static str {
        match self {
            Property::Opacity => "opacity",
            Property::Scale => "transform.scale",
            Property::ScaleY => "transform.scale.y",
            Property::Path => "path",
            Property::ZOrder => "zPosition",
            Property::Rotation => "transform.rotation.z",
        }
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            segment_count: DEFAULT_SEGMENT_COUNT,
            colors: Rgba::default_palette(),
            loop_duration: DEFAULT_LOOP_DURATION,
            region: Rect::from_size(Size::new(DEFAULT_REGION_SIDE, DEFAULT_REGION_SIDE)),
            style: Style::RingGrowth,
        }
    }
}

impl IndicatorConfig {
    /// Checks that the configuration can produce a segment set.
    pub fn validate(&self) -> Result<(), Error> {
        if self.segment_count == 0 {
            return Err(Error::InvalidConfiguration("segment count must be positive".into()));
        }
        if self.colors.is_empty() {
            return Err(Error::InvalidConfiguration("at least one color is required".into()));
        }
        if !(self.loop_duration.is_finite() && self.loop_duration > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "loop duration must be positive, got {}",
                self.loop_duration
            )));
        }
        if self.region.is_degenerate() {
            return Err(Error::InvalidConfiguration(format!(
                "region {}x{} has no area",
                self.region.size.width, self.region.size.height
            )));
        }
        Ok(())
    }

    /// Fill color of segment `index`.
    #[must_use]
    pub fn color(&self, index: usize) -> Rgba {
        self.colors[index % self.colors.len()]
    }

    /// Returns the same configuration drawn into another region.
    #[must_use]
    pub fn with_region(&self, region: Rect) -> Self {
        Self { region, ..self.clone() }
    }
}

impl SegmentDescriptor {
    /// Creates a new [`SegmentDescriptor`] filled with `fill`, placed at
    /// `position` and anchored at its center.
    #[must_use]
    pub fn new(index: usize, path: Path, fill: Rgba, position: Point) -> Self {
        Self {
            index,
            path,
            fill,
            stroke: None,
            position,
            anchor_point: Point::new(0.5, 0.5),
            z_order: 0.0,
            timelines: BTreeMap::new(),
        }
    }

    /// Strokes the outline with the fill color.
    #[must_use]
    pub fn stroked(mut self) -> Self {
        self.stroke = Some(self.fill);
        self
    }

    /// Sets the anchor point, in unit coordinates of the shape bounds.
    #[must_use]
    pub fn with_anchor_point(mut self, anchor_point: Point) -> Self {
        self.anchor_point = anchor_point;
        self
    }

    /// Sets the resting stacking order.
    #[must_use]
    pub fn with_z_order(mut self, z_order: f64) -> Self {
        self.z_order = z_order;
        self
    }

    /// Animates `property` with `timeline`.
    #[must_use]
    pub fn with_timeline(mut self, property: Property, timeline: KeyframeTimeline) -> Self {
        self.timelines.insert(property, timeline);
        self
    }

    /// Segment index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Resting outline, in local coordinates.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn fill(&self) -> Rgba {
        self.fill
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn stroke(&self) -> Option<Rgba> {
        self.stroke
    }

    /// Position of the local origin, in region coordinates.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn anchor_point(&self) -> Point {
        self.anchor_point
    }

    /// Resting stacking order.
    #[must_use]
    pub fn z_order(&self) -> f64 {
        self.z_order
    }

    /// Timeline animating `property`, if any.
    #[must_use]
    pub fn timeline(&self, property: Property) -> Option<&KeyframeTimeline> {
        self.timelines.get(&property)
    }

    /// All animated properties with their timelines.
    pub fn timelines(&self) -> impl Iterator<Item = (Property, &KeyframeTimeline)> {
        self.timelines.iter().map(|(&property, timeline)| (property, timeline))
    }
}

impl SegmentSet {
    /// Creates a new [`SegmentSet`] without a group transform.
    #[must_use]
    pub fn new(style: Style, hide_property: Property, segments: Vec<SegmentDescriptor>) -> Self {
        Self { style, hide_property, segments, group_transform: None }
    }

    /// Sets the whole-group transform.
    #[must_use]
    pub fn with_group_transform(mut self, timeline: KeyframeTimeline) -> Self {
        self.group_transform = Some(timeline);
        self
    }

    /// Style which generated the set.
    #[must_use]
    pub fn style(&self) -> Style {
        self.style
    }

    /// Property ramped by the hide and reveal transitions.
    #[must_use]
    pub fn hide_property(&self) -> Property {
        self.hide_property
    }

    /// Segments, ordered by index.
    #[must_use]
    pub fn segments(&self) -> &[SegmentDescriptor] {
        &self.segments
    }

    /// Rotation timeline applied to the whole group, if any.
    #[must_use]
    pub fn group_transform(&self) -> Option<&KeyframeTimeline> {
        self.group_transform.as_ref()
    }

    /// Every timeline of the set: per-segment ones, then the group transform.
    pub fn all_timelines(&self) -> impl Iterator<Item = &KeyframeTimeline> {
        self.segments
            .iter()
            .flat_map(|segment| segment.timelines.values())
            .chain(self.group_transform.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let config = IndicatorConfig::default();
        assert!(config.validate().is_ok());
        let invalid = [
            IndicatorConfig { segment_count: 0, ..config.clone() },
            IndicatorConfig { colors: Vec::new(), ..config.clone() },
            IndicatorConfig { loop_duration: 0.0, ..config.clone() },
            IndicatorConfig { loop_duration: -1.0, ..config.clone() },
            IndicatorConfig { loop_duration: f64::NAN, ..config.clone() },
            config.with_region(Rect::new(0.0, 0.0, 100.0, 0.0)),
        ];
        for config in invalid {
            assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn test_color_cycles() {
        let config = IndicatorConfig {
            colors: vec![Rgba::RED, Rgba::GREEN, Rgba::BLUE],
            ..IndicatorConfig::default()
        };
        assert_eq!(config.color(0), Rgba::RED);
        assert_eq!(config.color(4), Rgba::GREEN);
        assert_eq!(config.color(8), Rgba::BLUE);
    }

    #[test]
    fn test_style_names_round_trip() {
        for style in Style::ALL {
            assert_eq!(style.name().parse::<Style>().unwrap(), style);
        }
        assert!("default".parse::<Style>().is_err());
    }

    #[test]
    fn test_demo_configs_are_valid() {
        for style in Style::ALL {
            let config = style.demo_config(Rect::new(0.0, 0.0, 200.0, 200.0));
            assert_eq!(config.style, style);
            assert!(config.validate().is_ok());
        }
    }
}
