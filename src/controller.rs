//! Indicator lifecycle.
//!
//! [`IndicatorController`] owns the live segment set of one indicator and
//! translates `configure`/`start`/`stop`/`resize` into compositor commands.
//! It mirrors the local clock of every layer it created, so that freezing
//! captures each segment's own position in its cycle rather than a single
//! global offset.

use crate::{
    compositor::{Compositor, LayerClock, SegmentHandle, Target, TimelineKey},
    consts::{INSTANT_TRANSITION_DURATION, TRANSITION_DURATION},
    geometry::Rect,
    indicator::{registry::StyleRegistry, Error, IndicatorConfig, Property, SegmentSet},
    timeline::{Fill, KeyframeTimeline, TimingFunction},
};
use log::{debug, trace, warn};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use serde::Serialize;

/// Lifecycle state of an indicator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum State {
    /// Nothing visible: never configured, or hidden.
    Idle,
    /// Timelines are playing.
    Running,
    /// Timelines are frozen in place.
    Paused,
    /// The hide transition is in flight.
    Hiding,
    /// The reveal transition is in flight.
    Revealing,
}

impl State {
    /// Returns `true` while a hide or reveal transition is in flight.
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Hiding | Self::Revealing)
    }
}

/// Drives the segment set of one indicator on a host [`Compositor`].
pub struct IndicatorController<C: Compositor> {
    compositor: C,
    registry: StyleRegistry,
    rng: Box<dyn RngCore + Send>,
    hides_when_stopped: bool,
    animating: bool,
    state: State,
    live: Option<Live>,
    transition: Option<Transition>,
}

struct Live {
    config: IndicatorConfig,
    seed: u64,
    set: SegmentSet,
    layers: Vec<Layer>,
    group: LayerClock,
    hidden: bool,
}

struct Layer {
    handle: SegmentHandle,
    clock: LayerClock,
}

/// Hide or reveal ramp on the group layer. `since` is in the group's local
/// time, so a frozen group holds the ramp where it is.
#[derive(Copy, Clone, Debug)]
struct Transition {
    key: TimelineKey,
    since: f64,
    duration: f64,
    timeline_from: f64,
}

impl Transition {
    fn target(&self) -> f64 {
        match self.key {
            TimelineKey::Hide(_) => 0.0,
            TimelineKey::Reveal(_) | TimelineKey::Property(_) => 1.0,
        }
    }

    fn timeline(&self) -> KeyframeTimeline {
        let timeline = KeyframeTimeline::basic(self.timeline_from, self.target(), self.duration)
            .with_timing(TimingFunction::EaseInEaseOut);
        match self.key {
            TimelineKey::Hide(_) => timeline.retained(Fill::Both),
            TimelineKey::Reveal(_) | TimelineKey::Property(_) => timeline,
        }
    }

    fn elapsed(&self, group_time: f64) -> f64 {
        group_time - self.since
    }

    fn value(&self, group_time: f64) -> f64 {
        self.timeline().sample_scalar(self.elapsed(group_time)).unwrap_or_else(|| self.target())
    }
}

impl<C: Compositor> IndicatorController<C> {
    /// Creates a new idle controller with an entropy-seeded random source.
    pub fn new(compositor: C) -> Self {
        Self::with_rng(compositor, StdRng::from_entropy())
    }

    /// Creates a new idle controller drawing style seeds from `rng`.
    pub fn with_rng(compositor: C, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            compositor,
            registry: StyleRegistry::default(),
            rng: Box::new(rng),
            hides_when_stopped: true,
            animating: false,
            state: State::Idle,
            live: None,
            transition: None,
        }
    }

    /// Replaces the style registry. Takes effect on the next
    /// [`Self::configure`].
    #[must_use]
    pub fn with_registry(mut self, registry: StyleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether the indicator should be animating.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Whether stopping hides the indicator.
    #[must_use]
    pub fn hides_when_stopped(&self) -> bool {
        self.hides_when_stopped
    }

    /// Applied configuration.
    #[must_use]
    pub fn config(&self) -> Option<&IndicatorConfig> {
        self.live.as_ref().map(|live| &live.config)
    }

    /// Segment set handed to the compositor.
    #[must_use]
    pub fn segment_set(&self) -> Option<&SegmentSet> {
        self.live.as_ref().map(|live| &live.set)
    }

    /// Handles of the live segments, by segment index.
    #[must_use]
    pub fn handles(&self) -> Vec<SegmentHandle> {
        self.live.iter().flat_map(|live| live.layers.iter().map(|layer| layer.handle)).collect()
    }

    /// Local time of every live segment, by segment index.
    #[must_use]
    pub fn local_times(&self) -> Vec<f64> {
        let now = self.compositor.now();
        self.live
            .iter()
            .flat_map(|live| live.layers.iter().map(move |layer| layer.clock.local_time(now)))
            .collect()
    }

    /// Host compositor.
    #[must_use]
    pub fn compositor(&self) -> &C {
        &self.compositor
    }

    /// Host compositor, mutably. Meant for advancing a host-owned clock.
    pub fn compositor_mut(&mut self) -> &mut C {
        &mut self.compositor
    }

    /// Regenerates the whole segment set for `config` and replaces the live
    /// one. On error nothing changes.
    pub fn configure(&mut self, config: IndicatorConfig) -> Result<(), Error> {
        let seed = self.rng.next_u64();
        let set = self.registry.generate(&config, &mut StdRng::seed_from_u64(seed))?;
        debug!(
            "Configuring {} indicator with {} segments over {}s",
            config.style, config.segment_count, config.loop_duration
        );
        self.teardown();
        self.install(config, seed, set);
        self.state = State::Running;
        if !self.animating {
            if self.hides_when_stopped {
                self.hide(INSTANT_TRANSITION_DURATION);
                self.finish_transition();
            } else {
                self.pause();
            }
        }
        Ok(())
    }

    /// Starts animating. Cancels an in-flight hide and reveals the indicator
    /// instead, from wherever the hide got to. A reveal frozen by
    /// [`Self::stop`] carries on.
    pub fn start(&mut self) {
        self.animating = true;
        if matches!(self.state, State::Running | State::Revealing) {
            debug!("Indicator is already running");
            return;
        }
        let Some(live) = self.live.as_mut() else {
            warn!("Starting an indicator that was never configured");
            return;
        };
        let now = self.compositor.now();
        for layer in &mut live.layers {
            if layer.clock.is_frozen() {
                let local = layer.clock.local_time(now);
                self.compositor.resume(Target::Segment(layer.handle), local);
                layer.clock.resume(now, local);
            }
        }
        if live.group.is_frozen() {
            let local = live.group.local_time(now);
            self.compositor.resume(Target::Group, local);
            live.group.resume(now, local);
        }
        let group_time = live.group.local_time(now);
        if live.hidden {
            let property = live.set.hide_property();
            live.hidden = false;
            let from = self.transition.take().map_or(0.0, |hide| hide.value(group_time));
            self.compositor.remove_timeline(Target::Group, TimelineKey::Hide(property));
            let reveal = Transition {
                key: TimelineKey::Reveal(property),
                since: group_time,
                duration: TRANSITION_DURATION,
                timeline_from: from,
            };
            self.compositor.set_timeline(Target::Group, reveal.key, &reveal.timeline());
            self.transition = Some(reveal);
            self.set_state(State::Revealing);
        } else if self.transition.is_some() {
            trace!("Resuming reveal at {group_time}");
            self.set_state(State::Revealing);
        } else {
            self.set_state(State::Running);
        }
    }

    /// Stops animating: freezes every timeline in place, including a hide or
    /// reveal in flight, or plays the hide transition when `hide` is set.
    pub fn stop(&mut self, hide: bool) {
        self.animating = false;
        if hide {
            self.hide(TRANSITION_DURATION);
        } else {
            self.pause();
        }
    }

    /// Flips between [`Self::start`] and [`Self::stop`].
    pub fn toggle(&mut self) {
        if self.animating {
            self.stop(self.hides_when_stopped);
        } else {
            self.start();
        }
    }

    /// Changes whether stopping hides the indicator, re-applying the stop
    /// when not animating.
    pub fn set_hides_when_stopped(&mut self, hides_when_stopped: bool) {
        self.hides_when_stopped = hides_when_stopped;
        if !self.animating {
            self.stop(hides_when_stopped);
        }
    }

    /// Recomputes the geometry for `region`, keeping every value sequence and
    /// every segment's phase.
    pub fn resize(&mut self, region: Rect) -> Result<(), Error> {
        let Some(live) = self.live.as_mut() else {
            debug!("Ignoring resize of an unconfigured indicator");
            return Ok(());
        };
        let config = live.config.with_region(region);
        let set = self.registry.generate(&config, &mut StdRng::seed_from_u64(live.seed))?;
        debug!("Resizing indicator to {}x{}", region.width(), region.height());
        let now = self.compositor.now();
        let mut layers = Vec::with_capacity(live.layers.len());
        for (old, segment) in live.layers.iter().zip(set.segments()) {
            let local = old.clock.local_time(now);
            self.compositor.remove_segment(old.handle);
            let handle = self.compositor.add_segment(segment);
            let target = Target::Segment(handle);
            for (property, timeline) in segment.timelines() {
                self.compositor.set_timeline(target, TimelineKey::Property(property), timeline);
            }
            let mut clock = LayerClock::started(now);
            if old.clock.is_frozen() {
                self.compositor.freeze(target, local);
                clock.freeze(now, local);
            } else {
                self.compositor.resume(target, local);
                clock.resume(now, local);
            }
            layers.push(Layer { handle, clock });
        }
        live.layers = layers;
        live.config = config;
        live.set = set;
        Ok(())
    }

    /// Completes the in-flight transition once its duration elapsed. Returns
    /// `true` while a transition is still in flight.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_transient() {
            return false;
        }
        let (Some(transition), Some(live)) = (self.transition, self.live.as_ref()) else {
            return false;
        };
        if transition.elapsed(live.group.local_time(self.compositor.now())) < transition.duration {
            return true;
        }
        self.finish_transition();
        false
    }

    fn finish_transition(&mut self) {
        let Some(transition) = self.transition.take() else {
            return;
        };
        match transition.key {
            TimelineKey::Hide(_) => self.set_state(State::Idle),
            TimelineKey::Reveal(_) => {
                self.compositor.remove_timeline(Target::Group, transition.key);
                self.set_state(State::Running);
            }
            TimelineKey::Property(_) => {}
        }
    }

    // The group layer carries the hide/reveal ramp, so freezing it holds the
    // ramp at its current value.
    fn pause(&mut self) {
        if !matches!(self.state, State::Running | State::Revealing | State::Hiding) {
            debug!("Nothing to pause in state {:?}", self.state);
            return;
        }
        let Some(live) = self.live.as_mut() else {
            return;
        };
        let now = self.compositor.now();
        for layer in &mut live.layers {
            let local = layer.clock.local_time(now);
            trace!("Freezing segment {:?} at {local}", layer.handle);
            self.compositor.freeze(Target::Segment(layer.handle), local);
            layer.clock.freeze(now, local);
        }
        let local = live.group.local_time(now);
        if let Some(transition) = self.transition {
            trace!("Freezing {:?} at {}", transition.key, transition.value(local));
        }
        self.compositor.freeze(Target::Group, local);
        live.group.freeze(now, local);
        self.set_state(State::Paused);
    }

    fn hide(&mut self, duration: f64) {
        if !matches!(self.state, State::Running | State::Paused | State::Revealing) {
            debug!("Nothing to hide in state {:?}", self.state);
            return;
        }
        let Some(live) = self.live.as_mut() else {
            return;
        };
        let now = self.compositor.now();
        let group_time = live.group.local_time(now);
        if live.group.is_frozen() {
            self.compositor.resume(Target::Group, group_time);
            live.group.resume(now, group_time);
        }
        let mut from = 1.0;
        if let Some(transition) = self.transition.take() {
            from = transition.value(group_time);
            self.compositor.remove_timeline(Target::Group, transition.key);
        }
        let hide = Transition {
            key: TimelineKey::Hide(live.set.hide_property()),
            since: group_time,
            duration,
            timeline_from: from,
        };
        self.compositor.set_timeline(Target::Group, hide.key, &hide.timeline());
        live.hidden = true;
        self.transition = Some(hide);
        self.set_state(State::Hiding);
    }

    fn install(&mut self, config: IndicatorConfig, seed: u64, set: SegmentSet) {
        let now = self.compositor.now();
        self.compositor.resume(Target::Group, 0.0);
        if let Some(rotation) = set.group_transform() {
            let key = TimelineKey::Property(Property::Rotation);
            self.compositor.set_timeline(Target::Group, key, rotation);
        }
        let layers = set
            .segments()
            .iter()
            .map(|segment| {
                let handle = self.compositor.add_segment(segment);
                trace!("Added segment {} as {handle:?}", segment.index());
                for (property, timeline) in segment.timelines() {
                    self.compositor.set_timeline(
                        Target::Segment(handle),
                        TimelineKey::Property(property),
                        timeline,
                    );
                }
                Layer { handle, clock: LayerClock::started(now) }
            })
            .collect();
        self.live = Some(Live {
            config,
            seed,
            set,
            layers,
            group: LayerClock::started(now),
            hidden: false,
        });
    }

    fn teardown(&mut self) {
        self.transition = None;
        let Some(live) = self.live.take() else {
            return;
        };
        let property = live.set.hide_property();
        self.compositor.remove_timeline(Target::Group, TimelineKey::Hide(property));
        self.compositor.remove_timeline(Target::Group, TimelineKey::Reveal(property));
        self.compositor.remove_timeline(Target::Group, TimelineKey::Property(Property::Rotation));
        for layer in live.layers {
            self.compositor.remove_segment(layer.handle);
        }
        self.state = State::Idle;
    }

    fn set_state(&mut self, state: State) {
        if self.state != state {
            debug!("Indicator state: {:?} -> {state:?}", self.state);
            self.state = state;
        }
    }
}
