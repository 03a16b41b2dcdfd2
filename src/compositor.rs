//! Host compositor interface.
//!
//! The compositor owns the actual layers and runs the timelines on its own
//! monotonic clock. Every layer has a local clock: a freshly added segment
//! starts at local time `0` and runs; timelines are evaluated relative to the
//! local time they were attached at. [`Compositor::freeze`] pins a layer's
//! local time, [`Compositor::resume`] lets it run again from a given local
//! time.

use crate::{
    indicator::{Property, SegmentDescriptor},
    timeline::{KeyframeTimeline, Value},
};
use std::collections::BTreeMap;

/// Handle of a segment layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentHandle(pub u64);

/// Layer addressed by a command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    /// Container of all segments.
    Group,
    /// One segment.
    Segment(SegmentHandle),
}

/// Slot a timeline is attached to. Setting a slot replaces its timeline.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimelineKey {
    /// Regular animation of a property.
    Property(Property),
    /// Hide transition, ramping the given property to `0`.
    Hide(Property),
    /// Reveal transition, ramping the given property back to `1`.
    Reveal(Property),
}

/// Retained-mode compositor driven by the indicator controller.
#[cfg_attr(test, mockall::automock)]
pub trait Compositor: Send {
    /// Current time of the monotonic host clock, in seconds.
    fn now(&self) -> f64;

    /// Adds a segment layer to the group.
    fn add_segment(&mut self, segment: &SegmentDescriptor) -> SegmentHandle;

    /// Removes a segment layer with all its timelines.
    fn remove_segment(&mut self, handle: SegmentHandle);

    /// Attaches `timeline` to the slot `key` of `target`.
    fn set_timeline(&mut self, target: Target, key: TimelineKey, timeline: &KeyframeTimeline);

    /// Detaches the timeline in slot `key` of `target`, if any.
    fn remove_timeline(&mut self, target: Target, key: TimelineKey);

    /// Pins the local time of `target` to `at_time`.
    fn freeze(&mut self, target: Target, at_time: f64);

    /// Runs the local clock of `target` again, starting from `from_time`.
    fn resume(&mut self, target: Target, from_time: f64);
}

/// Local clock of a layer, as seen from the host clock.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LayerClock {
    anchor: f64,
    local: f64,
    running: bool,
}

impl LayerClock {
    /// Clock of a layer added at host time `now`.
    #[must_use]
    pub fn started(now: f64) -> Self {
        Self { anchor: now, local: 0.0, running: true }
    }

    /// Local time at host time `now`.
    #[must_use]
    pub fn local_time(&self, now: f64) -> f64 {
        if self.running {
            self.local + (now - self.anchor)
        } else {
            self.local
        }
    }

    /// Pins the local time to `at_time`.
    pub fn freeze(&mut self, now: f64, at_time: f64) {
        *self = Self { anchor: now, local: at_time, running: false };
    }

    /// Runs again from local time `from_time`.
    pub fn resume(&mut self, now: f64, from_time: f64) {
        *self = Self { anchor: now, local: from_time, running: true };
    }

    /// Returns `true` if the clock is pinned.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        !self.running
    }
}

/// In-memory compositor with a manually advanced clock.
///
/// Keeps every layer and timeline it is given and evaluates them on demand,
/// which makes it usable both as a test double and as a headless host.
#[derive(Debug)]
pub struct Fake {
    time: f64,
    next_handle: u64,
    group: FakeLayer,
    segments: BTreeMap<SegmentHandle, FakeLayer>,
}

#[derive(Debug)]
struct FakeLayer {
    descriptor: Option<SegmentDescriptor>,
    clock: LayerClock,
    timelines: BTreeMap<TimelineKey, (KeyframeTimeline, f64)>,
}

impl Default for Fake {
    fn default() -> Self {
        Self {
            time: 0.0,
            next_handle: 0,
            group: FakeLayer::new(None, 0.0),
            segments: BTreeMap::new(),
        }
    }
}

impl FakeLayer {
    fn new(descriptor: Option<SegmentDescriptor>, now: f64) -> Self {
        Self { descriptor, clock: LayerClock::started(now), timelines: BTreeMap::new() }
    }
}

impl Fake {
    /// Moves the clock forward by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.time += dt;
    }

    /// Handles of the live segments, in insertion order.
    #[must_use]
    pub fn handles(&self) -> Vec<SegmentHandle> {
        self.segments.keys().copied().collect()
    }

    /// Number of live segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Descriptor a live segment was added with.
    #[must_use]
    pub fn descriptor(&self, handle: SegmentHandle) -> Option<&SegmentDescriptor> {
        self.segments.get(&handle).and_then(|layer| layer.descriptor.as_ref())
    }

    /// Current local time of `target`.
    #[must_use]
    pub fn local_time(&self, target: Target) -> Option<f64> {
        self.layer(target).map(|layer| layer.clock.local_time(self.time))
    }

    /// Returns `true` if the local clock of `target` is pinned.
    #[must_use]
    pub fn is_frozen(&self, target: Target) -> bool {
        self.layer(target).map_or(false, |layer| layer.clock.is_frozen())
    }

    /// Timeline attached to the slot `key` of `target`.
    #[must_use]
    pub fn timeline(&self, target: Target, key: TimelineKey) -> Option<&KeyframeTimeline> {
        self.layer(target).and_then(|layer| layer.timelines.get(&key)).map(|(timeline, _)| timeline)
    }

    /// Evaluates the timeline in slot `key` of `target` at the current time.
    #[must_use]
    pub fn value(&self, target: Target, key: TimelineKey) -> Option<Value> {
        let layer = self.layer(target)?;
        let (timeline, attached_at) = layer.timelines.get(&key)?;
        timeline.sample(layer.clock.local_time(self.time) - attached_at)
    }

    /// Scalar shortcut for [`Self::value`].
    #[must_use]
    pub fn scalar(&self, target: Target, key: TimelineKey) -> Option<f64> {
        self.value(target, key).and_then(|value| value.as_scalar())
    }

    fn layer(&self, target: Target) -> Option<&FakeLayer> {
        match target {
            Target::Group => Some(&self.group),
            Target::Segment(handle) => self.segments.get(&handle),
        }
    }

    fn layer_mut(&mut self, target: Target) -> Option<&mut FakeLayer> {
        match target {
            Target::Group => Some(&mut self.group),
            Target::Segment(handle) => self.segments.get_mut(&handle),
        }
    }
}

impl Compositor for Fake {
    fn now(&self) -> f64 {
        self.time
    }

    fn add_segment(&mut self, segment: &SegmentDescriptor) -> SegmentHandle {
        let handle = SegmentHandle(self.next_handle);
        self.next_handle += 1;
        self.segments.insert(handle, FakeLayer::new(Some(segment.clone()), self.time));
        handle
    }

    fn remove_segment(&mut self, handle: SegmentHandle) {
        self.segments.remove(&handle);
    }

    fn set_timeline(&mut self, target: Target, key: TimelineKey, timeline: &KeyframeTimeline) {
        let now = self.time;
        if let Some(layer) = self.layer_mut(target) {
            let attached_at = layer.clock.local_time(now);
            layer.timelines.insert(key, (timeline.clone(), attached_at));
        }
    }

    fn remove_timeline(&mut self, target: Target, key: TimelineKey) {
        if let Some(layer) = self.layer_mut(target) {
            layer.timelines.remove(&key);
        }
    }

    fn freeze(&mut self, target: Target, at_time: f64) {
        let now = self.time;
        if let Some(layer) = self.layer_mut(target) {
            layer.clock.freeze(now, at_time);
        }
    }

    fn resume(&mut self, target: Target, from_time: f64) {
        let now = self.time;
        if let Some(layer) = self.layer_mut(target) {
            layer.clock.resume(now, from_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_layer_clock() {
        let mut clock = LayerClock::started(10.0);
        assert_abs_diff_eq!(clock.local_time(12.5), 2.5);
        clock.freeze(12.5, 2.5);
        assert_abs_diff_eq!(clock.local_time(100.0), 2.5);
        assert!(clock.is_frozen());
        clock.resume(100.0, 2.5);
        assert_abs_diff_eq!(clock.local_time(101.0), 3.5);
    }

    #[test]
    fn test_fake_samples_from_attachment() {
        let mut fake = Fake::default();
        fake.advance(3.0);
        let timeline = KeyframeTimeline::basic(0.0, 1.0, 2.0).repeat_forever();
        fake.set_timeline(Target::Group, TimelineKey::Property(Property::Opacity), &timeline);
        fake.advance(1.0);
        let key = TimelineKey::Property(Property::Opacity);
        assert_abs_diff_eq!(fake.scalar(Target::Group, key).unwrap(), 0.5);
        fake.freeze(Target::Group, fake.local_time(Target::Group).unwrap());
        fake.advance(10.0);
        assert_abs_diff_eq!(fake.scalar(Target::Group, key).unwrap(), 0.5);
    }
}
