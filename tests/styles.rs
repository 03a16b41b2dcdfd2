use approx::assert_abs_diff_eq;
use cocarde::{
    color::Rgba,
    geometry::{PathElement, Point, Rect},
    indicator::{Error, IndicatorConfig, Property, SegmentDescriptor, SegmentSet, Style, StyleRegistry},
    timeline::{KeyframeTimeline, Repeat, Value},
};
use rand::{rngs::StdRng, SeedableRng};
use std::f64::consts::PI;

const EPSILON: f64 = 1e-9;
const SAMPLES: usize = 500;

fn config(style: Style, segment_count: usize) -> IndicatorConfig {
    IndicatorConfig {
        segment_count,
        colors: vec![Rgba::RED, Rgba::GREEN, Rgba::BLUE],
        loop_duration: 5.0,
        region: Rect::new(10.0, 20.0, 120.0, 90.0),
        style,
    }
}

fn generate(config: &IndicatorConfig, seed: u64) -> Result<SegmentSet, Error> {
    StyleRegistry::default().generate(config, &mut StdRng::seed_from_u64(seed))
}

fn main_property(style: Style) -> Property {
    match style {
        Style::Pie | Style::RingGrowth => Property::Scale,
        Style::EqualizerBars => Property::ScaleY,
        Style::RandomEqualizer => Property::Path,
        Style::RadialFade => Property::Opacity,
    }
}

#[allow(clippy::cast_precision_loss)]
fn sample_times(duration: f64) -> impl Iterator<Item = f64> {
    (0..SAMPLES).map(move |k| duration * k as f64 / SAMPLES as f64)
}

#[test]
fn test_segment_count_and_colors() {
    for style in Style::ALL {
        for segment_count in [1, 2, 7, 15] {
            let config = config(style, segment_count);
            let set = generate(&config, 3).unwrap();
            assert_eq!(set.style(), style);
            assert_eq!(set.segments().len(), segment_count);
            for (i, segment) in set.segments().iter().enumerate() {
                assert_eq!(segment.index(), i);
                assert_eq!(segment.fill(), config.colors[i % config.colors.len()]);
            }
        }
    }
}

#[test]
fn test_infinite_timelines_loop_continuously() {
    for style in Style::ALL {
        for segment_count in [1, 3, 14] {
            let set = generate(&config(style, segment_count), 11).unwrap();
            let infinite: Vec<&KeyframeTimeline> =
                set.all_timelines().filter(|timeline| timeline.repeat() == Repeat::Infinite).collect();
            assert!(!infinite.is_empty(), "{style} has no looping timeline");
            for timeline in infinite {
                assert!(timeline.is_loop_continuous(), "{style}: {:?}", timeline.values());
            }
        }
    }
}

#[test]
fn test_phase_offsets_are_evenly_spaced() {
    for style in [Style::Pie, Style::RingGrowth, Style::EqualizerBars, Style::RadialFade] {
        let config = config(style, 9);
        let set = generate(&config, 0).unwrap();
        let offsets: Vec<f64> = set
            .segments()
            .iter()
            .map(|segment| segment.timeline(main_property(style)).unwrap().phase_offset())
            .collect();
        for pair in offsets.windows(2) {
            let spacing = (pair[0] - pair[1]).rem_euclid(config.loop_duration);
            assert_abs_diff_eq!(spacing, config.loop_duration / 9.0, epsilon = EPSILON);
        }
    }
}

#[test]
fn test_single_segment_has_no_phase_offset() {
    for style in Style::ALL {
        let set = generate(&config(style, 1), 5).unwrap();
        assert_eq!(set.segments().len(), 1);
        for (_, timeline) in set.segments()[0].timelines() {
            assert_abs_diff_eq!(timeline.phase_offset(), 0.0, epsilon = EPSILON);
        }
    }
}

fn displayed_bounds(segment: &SegmentDescriptor, time: f64) -> Rect {
    let path = match segment.timeline(Property::Path) {
        Some(timeline) => match timeline.sample(time) {
            Some(Value::Path(path)) => path,
            _ => segment.path().clone(),
        },
        None => segment.path().clone(),
    };
    let scale = |property| {
        segment.timeline(property).and_then(|timeline| timeline.sample_scalar(time)).unwrap_or(1.0)
    };
    let (sx, sy) = (scale(Property::Scale), scale(Property::Scale) * scale(Property::ScaleY));
    let bounds = path.bounds();
    let Point { x, y } = segment.position();
    Rect::new(
        x + bounds.min_x() * sx,
        y + bounds.min_y() * sy,
        bounds.width() * sx,
        bounds.height() * sy,
    )
}

#[test]
fn test_segments_stay_inside_region() {
    for style in Style::ALL {
        for segment_count in [1, 4, 15] {
            let config = config(style, segment_count);
            let region = config.region;
            let set = generate(&config, 21).unwrap();
            for segment in set.segments() {
                for time in sample_times(config.loop_duration) {
                    let bounds = displayed_bounds(segment, time);
                    assert!(bounds.min_x() >= region.min_x() - 1e-6, "{style} at {time}");
                    assert!(bounds.max_x() <= region.max_x() + 1e-6, "{style} at {time}");
                    assert!(bounds.min_y() >= region.min_y() - 1e-6, "{style} at {time}");
                    assert!(bounds.max_y() <= region.max_y() + 1e-6, "{style} at {time}");
                }
            }
        }
    }
}

#[test]
fn test_pie_scenario() {
    let config = IndicatorConfig {
        segment_count: 3,
        colors: vec![Rgba::RED, Rgba::GREEN, Rgba::BLUE],
        loop_duration: 5.0,
        region: Rect::new(0.0, 0.0, 100.0, 100.0),
        style: Style::Pie,
    };
    let set = generate(&config, 0).unwrap();
    assert_eq!(set.segments().len(), 3);
    let expected_offsets = [5.0, 5.0 - 5.0 / 3.0, 5.0 - 10.0 / 3.0];
    for (segment, expected) in set.segments().iter().zip(expected_offsets) {
        let pulse = segment.timeline(Property::Scale).unwrap();
        assert_abs_diff_eq!(pulse.time_offset(), expected, epsilon = EPSILON);
        assert_eq!(segment.position(), Point::new(50.0, 50.0));
        let span = segment
            .path()
            .elements()
            .iter()
            .find_map(|element| match *element {
                PathElement::Arc { start_angle, end_angle, .. } => Some(end_angle - start_angle),
                _ => None,
            })
            .unwrap();
        assert_abs_diff_eq!(span, 2.0 * PI / 3.0, epsilon = EPSILON);
    }
    assert_eq!(set.segments()[0].fill(), Rgba::RED);
    assert_eq!(set.segments()[2].fill(), Rgba::BLUE);

    let rotation = set.group_transform().unwrap();
    assert_eq!(rotation.repeat(), Repeat::Infinite);
    assert_abs_diff_eq!(rotation.duration(), 5.0);
    assert_abs_diff_eq!(rotation.time_offset(), 0.0);
    assert_eq!(rotation.values(), &[Value::Scalar(0.0), Value::Scalar(2.0 * PI)]);
    assert_abs_diff_eq!(rotation.sample_scalar(2.5).unwrap(), PI, epsilon = EPSILON);
}

#[test]
fn test_only_pie_rotates() {
    for style in Style::ALL {
        let set = generate(&config(style, 5), 0).unwrap();
        assert_eq!(set.group_transform().is_some(), style == Style::Pie);
    }
}

#[test]
fn test_zero_segments_is_rejected() {
    for style in Style::ALL {
        let result = generate(&config(style, 0), 0);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))), "{style}");
    }
}

#[test]
fn test_invalid_configurations_are_rejected() {
    for style in Style::ALL {
        let base = config(style, 4);
        let invalid = [
            IndicatorConfig { colors: Vec::new(), ..base.clone() },
            IndicatorConfig { loop_duration: 0.0, ..base.clone() },
            IndicatorConfig { loop_duration: -1.0, ..base.clone() },
            IndicatorConfig { loop_duration: f64::NAN, ..base.clone() },
            IndicatorConfig { region: Rect::new(0.0, 0.0, 0.0, 50.0), ..base.clone() },
        ];
        for config in invalid {
            assert!(matches!(generate(&config, 0), Err(Error::InvalidConfiguration(_))));
        }
    }
}

#[test]
fn test_random_equalizer_levels_are_bounded() {
    let config = config(Style::RandomEqualizer, 8);
    let full = config.region.min_side();
    let mut heights = Vec::new();
    for seed in 0..20 {
        let set = generate(&config, seed).unwrap();
        for segment in set.segments() {
            let timeline = segment.timeline(Property::Path).unwrap();
            assert_eq!(timeline.values().len(), config.segment_count + 2);
            for value in timeline.values() {
                heights.push(value.as_path().unwrap().bounds().height() / full);
            }
        }
    }
    assert!(heights.iter().all(|h| (0.2 - EPSILON..=1.0 + EPSILON).contains(h)));
    #[allow(clippy::cast_precision_loss)]
    let mean = heights.iter().sum::<f64>() / heights.len() as f64;
    assert!((mean - 0.6).abs() < 0.05, "mean level {mean}");
}

#[test]
fn test_random_equalizer_differs_between_seeds() {
    let config = config(Style::RandomEqualizer, 6);
    assert_eq!(generate(&config, 9).unwrap(), generate(&config, 9).unwrap());
    assert_ne!(generate(&config, 9).unwrap(), generate(&config, 10).unwrap());
}
