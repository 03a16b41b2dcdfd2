use approx::assert_abs_diff_eq;
use cocarde::{
    compositor::{Compositor, Fake, Target, TimelineKey},
    consts::TRANSITION_DURATION,
    controller::{IndicatorController, State},
    geometry::Rect,
    indicator::{IndicatorConfig, Property, Style},
};
use rand::{rngs::StdRng, SeedableRng};

const REGION: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

fn controller() -> IndicatorController<Fake> {
    IndicatorController::with_rng(Fake::default(), StdRng::seed_from_u64(2024))
}

fn pie() -> IndicatorConfig {
    IndicatorConfig { segment_count: 5, loop_duration: 5.0, ..Style::Pie.demo_config(REGION) }
}

fn hide_key() -> TimelineKey {
    TimelineKey::Hide(Property::Scale)
}

fn reveal_key() -> TimelineKey {
    TimelineKey::Reveal(Property::Scale)
}

/// Asserts that every segment sits `elapsed` seconds into its own timelines,
/// as if it had been animating without interruption.
fn assert_segments_at(controller: &IndicatorController<Fake>, elapsed: f64) {
    let fake = controller.compositor();
    for handle in controller.handles() {
        let target = Target::Segment(handle);
        let local = fake.local_time(target).unwrap();
        assert_abs_diff_eq!(local, elapsed, epsilon = 1e-9);
        let descriptor = fake.descriptor(handle).unwrap();
        for (property, timeline) in descriptor.timelines() {
            assert_eq!(fake.value(target, TimelineKey::Property(property)), timeline.sample(local));
        }
    }
}

#[test]
fn test_stop_then_start_resumes_in_place() {
    let mut controller = controller();
    controller.set_hides_when_stopped(false);
    controller.start();
    controller.configure(pie()).unwrap();
    assert_eq!(controller.state(), State::Running);

    controller.compositor_mut().advance(1.3);
    controller.stop(false);
    assert_eq!(controller.state(), State::Paused);
    controller.compositor_mut().advance(4.0);
    assert_segments_at(&controller, 1.3);

    controller.start();
    assert_eq!(controller.state(), State::Running);
    controller.compositor_mut().advance(0.9);
    assert_segments_at(&controller, 2.2);

    let rotation = controller.segment_set().unwrap().group_transform().unwrap().clone();
    let key = TimelineKey::Property(Property::Rotation);
    let value = controller.compositor().scalar(Target::Group, key).unwrap();
    assert_abs_diff_eq!(value, rotation.sample_scalar(2.2).unwrap(), epsilon = 1e-9);
}

#[test]
fn test_hide_then_reveal() {
    let mut controller = controller();
    controller.start();
    controller.configure(pie()).unwrap();
    controller.compositor_mut().advance(2.0);

    controller.stop(true);
    assert_eq!(controller.state(), State::Hiding);
    assert_abs_diff_eq!(controller.compositor().scalar(Target::Group, hide_key()).unwrap(), 1.0);
    controller.compositor_mut().advance(TRANSITION_DURATION / 2.0);
    assert!(controller.tick());
    let halfway = controller.compositor().scalar(Target::Group, hide_key()).unwrap();
    assert!(halfway > 0.0 && halfway < 1.0);

    controller.compositor_mut().advance(TRANSITION_DURATION);
    assert!(!controller.tick());
    assert_eq!(controller.state(), State::Idle);
    // The final frame of the hide stays in place.
    assert_abs_diff_eq!(controller.compositor().scalar(Target::Group, hide_key()).unwrap(), 0.0);

    controller.start();
    assert_eq!(controller.state(), State::Revealing);
    let fake = controller.compositor();
    assert!(fake.timeline(Target::Group, hide_key()).is_none());
    assert_abs_diff_eq!(fake.scalar(Target::Group, reveal_key()).unwrap(), 0.0);
    controller.compositor_mut().advance(TRANSITION_DURATION * 1.5);
    controller.tick();
    assert_eq!(controller.state(), State::Running);
    assert!(controller.compositor().timeline(Target::Group, reveal_key()).is_none());
}

#[test]
fn test_stop_during_hide_freezes_it_in_place() {
    let mut controller = controller();
    controller.start();
    controller.configure(pie()).unwrap();
    controller.compositor_mut().advance(1.0);
    controller.stop(true);
    controller.compositor_mut().advance(0.1);
    let held = controller.compositor().scalar(Target::Group, hide_key()).unwrap();
    assert!(held > 0.0 && held < 1.0);

    controller.stop(false);
    assert_eq!(controller.state(), State::Paused);
    assert!(controller.compositor().is_frozen(Target::Group));
    controller.compositor_mut().advance(TRANSITION_DURATION * 2.0);
    assert!(!controller.tick());
    assert_eq!(controller.state(), State::Paused);
    let fake = controller.compositor();
    assert_abs_diff_eq!(fake.scalar(Target::Group, hide_key()).unwrap(), held, epsilon = 1e-9);
    for handle in controller.handles() {
        assert!(fake.is_frozen(Target::Segment(handle)));
    }
    assert_segments_at(&controller, 1.1);

    // Starting again reveals from the held value.
    controller.start();
    assert_eq!(controller.state(), State::Revealing);
    let fake = controller.compositor();
    assert!(fake.timeline(Target::Group, hide_key()).is_none());
    assert_abs_diff_eq!(fake.scalar(Target::Group, reveal_key()).unwrap(), held, epsilon = 1e-9);
    controller.compositor_mut().advance(TRANSITION_DURATION * 1.5);
    assert!(!controller.tick());
    assert_eq!(controller.state(), State::Running);
    assert_segments_at(&controller, 1.1 + TRANSITION_DURATION * 1.5);
}

#[test]
fn test_stop_during_reveal_holds_its_value() {
    let mut controller = controller();
    controller.configure(pie()).unwrap();
    assert_eq!(controller.state(), State::Idle);
    controller.start();
    controller.compositor_mut().advance(0.1);
    let held = controller.compositor().scalar(Target::Group, reveal_key()).unwrap();
    assert!(held > 0.0 && held < 1.0);

    controller.stop(false);
    assert_eq!(controller.state(), State::Paused);
    controller.compositor_mut().advance(3.0);
    assert!(!controller.tick());
    let fake = controller.compositor();
    assert!(fake.timeline(Target::Group, hide_key()).is_none());
    assert_abs_diff_eq!(fake.scalar(Target::Group, reveal_key()).unwrap(), held, epsilon = 1e-9);

    // The reveal carries on where it stopped.
    controller.start();
    assert_eq!(controller.state(), State::Revealing);
    controller.compositor_mut().advance(0.1);
    assert!(controller.tick());
    let value = controller.compositor().scalar(Target::Group, reveal_key()).unwrap();
    assert!(value > held && value < 1.0);
    controller.compositor_mut().advance(TRANSITION_DURATION);
    assert!(!controller.tick());
    assert_eq!(controller.state(), State::Running);
    assert!(controller.compositor().timeline(Target::Group, reveal_key()).is_none());
}

#[test]
fn test_hide_after_frozen_reveal_starts_from_held_value() {
    let mut controller = controller();
    controller.configure(pie()).unwrap();
    controller.start();
    controller.compositor_mut().advance(0.15);
    controller.stop(false);
    let held = controller.compositor().scalar(Target::Group, reveal_key()).unwrap();
    controller.compositor_mut().advance(1.0);

    controller.stop(true);
    assert_eq!(controller.state(), State::Hiding);
    let fake = controller.compositor();
    assert!(!fake.is_frozen(Target::Group));
    assert!(fake.timeline(Target::Group, reveal_key()).is_none());
    assert_abs_diff_eq!(fake.scalar(Target::Group, hide_key()).unwrap(), held, epsilon = 1e-9);
    controller.compositor_mut().advance(TRANSITION_DURATION * 1.5);
    assert!(!controller.tick());
    assert_eq!(controller.state(), State::Idle);
}

#[test]
fn test_hidden_segments_keep_their_phase() {
    let mut controller = controller();
    controller.start();
    controller.configure(pie()).unwrap();
    controller.compositor_mut().advance(1.0);
    controller.stop(true);
    controller.compositor_mut().advance(3.0);
    controller.tick();
    controller.start();
    assert_segments_at(&controller, 4.0);
}

#[test]
fn test_start_during_hide_cancels_it() {
    let mut controller = controller();
    controller.start();
    controller.configure(pie()).unwrap();
    controller.stop(true);
    controller.compositor_mut().advance(TRANSITION_DURATION / 4.0);
    controller.start();
    assert_eq!(controller.state(), State::Revealing);
    let fake = controller.compositor();
    assert!(fake.timeline(Target::Group, hide_key()).is_none());
    assert!(fake.timeline(Target::Group, reveal_key()).is_some());

    controller.stop(true);
    let fake = controller.compositor();
    assert!(fake.timeline(Target::Group, reveal_key()).is_none());
    assert!(fake.timeline(Target::Group, hide_key()).is_some());
}

#[test]
fn test_configure_replaces_segments_and_transitions() {
    let mut controller = controller();
    controller.start();
    controller.configure(pie()).unwrap();
    let old = controller.handles();
    controller.stop(true);

    let config = IndicatorConfig { style: Style::RadialFade, ..pie() };
    controller.configure(config).unwrap();
    let fake = controller.compositor();
    assert_eq!(fake.segment_count(), 5);
    assert!(controller.handles().iter().all(|handle| !old.contains(handle)));
    assert!(fake.timeline(Target::Group, hide_key()).is_none());
    assert!(fake.timeline(Target::Group, TimelineKey::Property(Property::Rotation)).is_none());
    // Not animating any more, so the new set is hidden right away.
    assert_eq!(controller.state(), State::Idle);
    let key = TimelineKey::Hide(Property::Opacity);
    assert!(fake.timeline(Target::Group, key).is_some());
    assert!(fake.timeline(Target::Group, TimelineKey::Reveal(Property::Opacity)).is_none());
}

#[test]
fn test_failed_configure_keeps_paused_set() {
    let mut controller = controller();
    controller.set_hides_when_stopped(false);
    controller.start();
    controller.configure(pie()).unwrap();
    controller.compositor_mut().advance(0.7);
    controller.stop(false);
    let handles = controller.handles();

    let invalid = IndicatorConfig { loop_duration: 0.0, ..pie() };
    assert!(controller.configure(invalid).is_err());
    assert_eq!(controller.state(), State::Paused);
    assert_eq!(controller.handles(), handles);
    assert_eq!(controller.config(), Some(&pie()));
    assert_segments_at(&controller, 0.7);
}

#[test]
fn test_resize_keeps_phase_and_sequences() {
    let mut controller = controller();
    controller.start();
    let config = IndicatorConfig {
        segment_count: 6,
        loop_duration: 4.0,
        ..Style::RandomEqualizer.demo_config(REGION)
    };
    controller.configure(config).unwrap();
    let before = controller.segment_set().unwrap().clone();
    controller.compositor_mut().advance(1.7);

    let region = Rect::new(0.0, 0.0, 240.0, 50.0);
    controller.resize(region).unwrap();
    assert_eq!(controller.state(), State::Running);
    assert_eq!(controller.config().unwrap().region, region);
    for time in controller.local_times() {
        assert_abs_diff_eq!(time, 1.7, epsilon = 1e-9);
    }
    assert_segments_at(&controller, 1.7);

    let after = controller.segment_set().unwrap();
    for (old, new) in before.segments().iter().zip(after.segments()) {
        assert_ne!(old.position(), new.position());
        let heights = |segment: &cocarde::indicator::SegmentDescriptor, side: f64| {
            segment
                .timeline(Property::Path)
                .unwrap()
                .values()
                .iter()
                .map(|value| value.as_path().unwrap().bounds().height() / side)
                .collect::<Vec<_>>()
        };
        for (a, b) in heights(old, REGION.min_side()).iter().zip(heights(new, region.min_side())) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_resize_while_paused_stays_frozen() {
    let mut controller = controller();
    controller.set_hides_when_stopped(false);
    controller.start();
    controller.configure(pie()).unwrap();
    controller.compositor_mut().advance(3.1);
    controller.stop(false);
    controller.resize(Rect::new(0.0, 0.0, 60.0, 60.0)).unwrap();
    controller.compositor_mut().advance(2.0);
    assert_eq!(controller.state(), State::Paused);
    for handle in controller.handles() {
        assert!(controller.compositor().is_frozen(Target::Segment(handle)));
    }
    assert_segments_at(&controller, 3.1);
}

#[test]
fn test_hides_when_stopped_toggle_reapplies_stop() {
    let mut controller = controller();
    controller.set_hides_when_stopped(false);
    controller.configure(pie()).unwrap();
    assert_eq!(controller.state(), State::Paused);

    controller.set_hides_when_stopped(true);
    assert_eq!(controller.state(), State::Hiding);
    assert!(!controller.compositor().is_frozen(Target::Group));
    controller.compositor_mut().advance(TRANSITION_DURATION);
    controller.tick();
    assert_eq!(controller.state(), State::Idle);
}

#[test]
fn test_unconfigured_controller_ignores_commands() {
    let mut controller = controller();
    controller.stop(true);
    controller.stop(false);
    assert!(!controller.tick());
    controller.resize(REGION).unwrap();
    assert_eq!(controller.state(), State::Idle);
    assert_eq!(controller.compositor().segment_count(), 0);
    assert_eq!(controller.compositor().now(), 0.0);
}
