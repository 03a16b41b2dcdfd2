//! Style lookup.

use super::{
    style::{EqualizerBars, Pie, RadialFade, RandomEqualizer, RingGrowth, Rotating},
    Error, IndicatorConfig, SegmentSet, Style, StyleGenerator,
};
use log::debug;
use rand::RngCore;
use std::collections::BTreeMap;

/// Maps each [`Style`] to its generator.
pub struct StyleRegistry {
    generators: BTreeMap<Style, Box<dyn StyleGenerator>>,
}

impl Default for StyleRegistry {
    /// Registry with the stock generator of every style.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Rotating::new(Pie::default()));
        registry.register(RingGrowth::default());
        registry.register(EqualizerBars::default());
        registry.register(RandomEqualizer::default());
        registry.register(RadialFade::default());
        registry
    }
}

impl StyleRegistry {
    /// Creates a registry without any generator.
    #[must_use]
    pub fn empty() -> Self {
        Self { generators: BTreeMap::new() }
    }

    /// Registers `generator` for its style, replacing the previous one.
    pub fn register(&mut self, generator: impl StyleGenerator + 'static) {
        let style = generator.style();
        if self.generators.insert(style, Box::new(generator)).is_some() {
            debug!("Replaced the generator of style {style}");
        }
    }

    /// Returns the generator of `style`.
    #[must_use]
    pub fn get(&self, style: Style) -> Option<&dyn StyleGenerator> {
        self.generators.get(&style).map(AsRef::as_ref)
    }

    /// Generates the segment set of `config` with the generator of its style.
    pub fn generate(
        &self,
        config: &IndicatorConfig,
        rng: &mut dyn RngCore,
    ) -> Result<SegmentSet, Error> {
        self.get(config.style).ok_or(Error::UnregisteredStyle(config.style))?.generate(config, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::Property;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_default_registry_covers_all_styles() {
        let registry = StyleRegistry::default();
        for style in Style::ALL {
            assert_eq!(registry.get(style).unwrap().style(), style);
        }
    }

    #[test]
    fn test_hide_properties() {
        let registry = StyleRegistry::default();
        let hide = |style| registry.get(style).unwrap().hide_property();
        assert_eq!(hide(Style::Pie), Property::Scale);
        assert_eq!(hide(Style::RingGrowth), Property::Scale);
        assert_eq!(hide(Style::EqualizerBars), Property::ScaleY);
        assert_eq!(hide(Style::RandomEqualizer), Property::ScaleY);
        assert_eq!(hide(Style::RadialFade), Property::Opacity);
    }

    #[test]
    fn test_unregistered_style() {
        let config = IndicatorConfig::default();
        let result = StyleRegistry::empty().generate(&config, &mut StdRng::seed_from_u64(0));
        assert_eq!(result, Err(Error::UnregisteredStyle(config.style)));
    }
}
