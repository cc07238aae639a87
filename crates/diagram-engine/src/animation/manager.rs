// animation/manager.rs
//
// Per-target registry of active animations.
//
// Usage:
//   let mut manager = AnimationManager::new();
//   manager.new_animation().position(TweenOptions::to(end)).start();
//   manager.next_frame(now, &mut target);  // Advances, prunes finished

use std::fmt;
use crate::config::AnimationConfig;
use super::builder::AnimationBuilder;
use super::step::{CancelForce, StartTime, Step, StepState};
use super::target::AnimationTarget;

/// Animations whose name starts with this prefix survive an unforced
/// `cancel_all`.
pub const NO_STOP_PREFIX: &str = "_noStop_";

/// Handle to an animation within its manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u32);

/// A root serial step plus its identity.
pub struct Animation {
    pub(crate) id: AnimationId,
    pub(crate) name: Option<String>,
    pub(crate) root: Step,
    pub(crate) remove_on_finish: bool,
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("root", &self.root)
            .field("remove_on_finish", &self.remove_on_finish)
            .finish()
    }
}

impl Animation {
    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The serial step holding every step added to this animation.
    pub fn root(&self) -> &Step {
        &self.root
    }

    pub fn state(&self) -> StepState {
        self.root.state()
    }

    /// Whether the manager drops this animation once it finishes.
    pub fn removes_on_finish(&self) -> bool {
        self.remove_on_finish
    }

    fn is_no_stop(&self) -> bool {
        self.name.as_deref().is_some_and(|n| n.starts_with(NO_STOP_PREFIX))
    }

    pub fn total_duration(&self) -> f64 {
        self.root.total_duration()
    }

    pub fn remaining_time(&self, now: f64) -> f64 {
        self.root.remaining_time(now)
    }

    fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("`{}` ({})", name, self.id.0),
            None => format!("#{}", self.id.0),
        }
    }
}

/// Aggregate manager state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManagerState {
    #[default]
    Idle,
    Animating,
}

/// Owns every animation running against one target.
pub struct AnimationManager {
    animations: Vec<Animation>,
    state: ManagerState,
    next_id: u32,
    config: AnimationConfig,
    on_idle: Option<Box<dyn FnMut()>>,
    paused_at: Option<f64>,
}

impl fmt::Debug for AnimationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationManager")
            .field("state", &self.state)
            .field("animations", &self.animations)
            .field("paused_at", &self.paused_at)
            .finish()
    }
}

impl Default for AnimationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationManager {
    pub fn new() -> Self {
        Self::with_config(AnimationConfig::default())
    }

    pub fn with_config(config: AnimationConfig) -> Self {
        Self {
            animations: Vec::new(),
            state: ManagerState::Idle,
            next_id: 0,
            config,
            on_idle: None,
            paused_at: None,
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Replace the defaults used by builders created from now on.
    pub fn set_config(&mut self, config: AnimationConfig) {
        self.config = config;
    }

    // -- Building --

    /// Builder for a new, unnamed animation.
    pub fn new_animation(&mut self) -> AnimationBuilder<'_> {
        AnimationBuilder::new(self, None)
    }

    /// Builder for the animation called `name`. If one is already
    /// registered its steps are kept and the new ones are appended.
    pub fn named(&mut self, name: impl Into<String>) -> AnimationBuilder<'_> {
        AnimationBuilder::new(self, Some(name.into()))
    }

    /// Builder that appends to the animation called `name`, creating it if
    /// it does not exist. Steps already in flight keep their progress.
    pub fn add_to(&mut self, name: impl Into<String>) -> AnimationBuilder<'_> {
        self.named(name)
    }

    pub(crate) fn find_mut(&mut self, name: &str) -> Option<&mut Animation> {
        self.animations
            .iter_mut()
            .find(|a| a.name.as_deref() == Some(name))
    }

    /// Register a new animation, optionally starting it.
    pub(crate) fn insert(
        &mut self,
        name: Option<String>,
        mut root: Step,
        when: Option<StartTime>,
        remove_on_finish: bool,
    ) -> AnimationId {
        let id = AnimationId(self.next_id);
        self.next_id += 1;
        if let Some(when) = when {
            root.start(when);
        }
        let animation = Animation { id, name, root, remove_on_finish };
        log::debug!(
            "animation {} {} with {} step(s)",
            animation.label(),
            if when.is_some() { "started" } else { "registered" },
            animation.root.children().map_or(0, <[Step]>::len),
        );
        self.animations.push(animation);
        self.refresh_state();
        id
    }

    /// Fire `callback` each time the manager goes from animating to idle.
    pub fn on_idle(&mut self, callback: impl FnMut() + 'static) {
        self.on_idle = Some(Box::new(callback));
    }

    // -- Driving --

    /// Advance every started animation to `now`, then drop the finished
    /// ones that remove on finish. Returns how many finished this frame.
    pub fn next_frame(&mut self, now: f64, target: &mut dyn AnimationTarget) -> usize {
        if self.paused_at.is_some() {
            return 0;
        }
        let mut finished = 0;
        for animation in &mut self.animations {
            if animation.root.state().is_active() {
                animation.root.next_frame(now, target);
                if animation.root.is_finished() {
                    finished += 1;
                }
            }
        }
        self.prune();
        log::trace!(
            "manager frame at {:.4}: {} active, {} finished",
            now,
            self.animations.len(),
            finished
        );
        finished
    }

    /// Start every registered animation that has not started yet.
    pub fn start_all(&mut self, when: StartTime) {
        for animation in &mut self.animations {
            if animation.root.state() == StepState::Idle {
                animation.root.start(when);
                log::debug!("animation {} started", animation.label());
            }
        }
        self.refresh_state();
    }

    /// Start the registered animation called `name`, or restart it if it
    /// was kept after finishing. Returns false if there is none or it is
    /// already running.
    pub fn start(&mut self, name: &str, when: StartTime) -> bool {
        let Some(animation) = self.find_mut(name) else {
            return false;
        };
        if animation.root.state().is_active() {
            return false;
        }
        animation.root.start(when);
        log::debug!("animation {} started", animation.label());
        self.refresh_state();
        true
    }

    // -- Cancelling --

    /// Resolve every started animation now. `force` overrides each step's
    /// own cancel policy. Without a force, animations named with
    /// [`NO_STOP_PREFIX`] keep running.
    pub fn cancel_all(&mut self, force: Option<CancelForce>, target: &mut dyn AnimationTarget) {
        for animation in &mut self.animations {
            if force.is_none() && animation.is_no_stop() {
                continue;
            }
            if animation.root.state().is_active() {
                log::debug!("animation {} cancelled ({:?})", animation.label(), force);
                animation.root.cancel(force, target);
            }
        }
        self.prune();
    }

    /// Like [`cancel_all`](Self::cancel_all) with the force given by name.
    /// Unknown names fall back to each step's own policy.
    pub fn cancel_all_str(&mut self, force: &str, target: &mut dyn AnimationTarget) {
        let force = match force.parse::<CancelForce>() {
            Ok(force) => Some(force),
            Err(err) => {
                log::warn!("{}; using each step's own policy", err);
                None
            }
        };
        self.cancel_all(force, target);
    }

    /// Cancel the animation called `name`. Returns false if there is none.
    pub fn cancel(&mut self, name: &str, force: Option<CancelForce>, target: &mut dyn AnimationTarget) -> bool {
        let Some(animation) = self.find_mut(name) else {
            return false;
        };
        log::debug!("animation {} cancelled ({:?})", animation.label(), force);
        animation.root.cancel(force, target);
        self.prune();
        true
    }

    /// Drop the animation called `name` without resolving it. Mostly for
    /// animations kept after finishing.
    pub fn remove(&mut self, name: &str) -> Option<Animation> {
        let idx = self.animations.iter().position(|a| a.name.as_deref() == Some(name))?;
        let animation = self.animations.remove(idx);
        self.refresh_state();
        Some(animation)
    }

    // -- Pause --

    /// Freeze every animation at `now`. Frames are ignored until resumed.
    pub fn pause(&mut self, now: f64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Continue from where [`pause`](Self::pause) left off. Start times are
    /// shifted by the paused span.
    pub fn resume(&mut self, now: f64) {
        let Some(paused_at) = self.paused_at.take() else {
            return;
        };
        let delta = (now - paused_at).max(0.0);
        for animation in &mut self.animations {
            animation.root.shift_start_time(delta);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    // -- Introspection --

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        self.state == ManagerState::Animating
    }

    /// Registered animations, oldest first.
    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    pub fn get(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name.as_deref() == Some(name))
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Longest total duration among registered animations.
    pub fn total_duration(&self) -> f64 {
        self.animations
            .iter()
            .map(Animation::total_duration)
            .fold(0.0, f64::max)
    }

    /// Time until the last started animation finishes.
    pub fn remaining_time(&self, now: f64) -> f64 {
        let now = self.paused_at.unwrap_or(now);
        self.animations
            .iter()
            .map(|a| a.remaining_time(now))
            .fold(0.0, f64::max)
    }

    /// Absolute time at which the next started animation finishes.
    pub fn next_finish_time(&self, now: f64) -> Option<f64> {
        let at = self.paused_at.unwrap_or(now);
        self.animations
            .iter()
            .filter(|a| a.state().is_active())
            .map(|a| now + a.remaining_time(at))
            .reduce(f64::min)
    }

    /// Drop finished animations that remove on finish and update the
    /// aggregate state.
    fn prune(&mut self) {
        self.animations.retain(|a| {
            let drop = a.root.is_finished() && a.remove_on_finish;
            if drop {
                log::debug!("animation {} finished", a.label());
            }
            !drop
        });
        self.refresh_state();
    }

    pub(crate) fn refresh_state(&mut self) {
        let was = self.state;
        self.state = if self.animations.iter().any(|a| a.state().is_active()) {
            ManagerState::Animating
        } else {
            ManagerState::Idle
        };
        if was == ManagerState::Animating && self.state == ManagerState::Idle {
            if let Some(callback) = self.on_idle.as_mut() {
                callback();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use glam::Vec2;
    use crate::animation::options::TweenOptions;
    use crate::animation::progression::Progression;
    use crate::components::element::ElementProps;
    use super::*;

    fn to_x(x: f32, d: f64) -> TweenOptions<Vec2> {
        TweenOptions::to(Vec2::new(x, 0.0)).duration(d).progression(Progression::Linear)
    }

    #[test]
    fn finished_animations_are_pruned() {
        let mut target = ElementProps::default();
        let mut manager = AnimationManager::new();
        manager.new_animation().position(to_x(1.0, 1.0)).start_at(0.0);
        manager.new_animation().rotation(TweenOptions::to(1.0).duration(2.0)).start_at(0.0);
        assert_eq!(manager.len(), 2);
        assert!(manager.is_animating());

        assert_eq!(manager.next_frame(1.5, &mut target), 1);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.next_frame(2.5, &mut target), 1);
        assert!(manager.is_empty());
        assert_eq!(manager.state(), ManagerState::Idle);
    }

    #[test]
    fn on_idle_fires_once_per_transition() {
        let mut target = ElementProps::default();
        let mut manager = AnimationManager::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        manager.on_idle(move || c.set(c.get() + 1));

        manager.new_animation().delay(1.0).start_at(0.0);
        manager.next_frame(0.5, &mut target);
        assert_eq!(count.get(), 0);
        manager.next_frame(1.0, &mut target);
        manager.next_frame(2.0, &mut target);
        assert_eq!(count.get(), 1);

        manager.new_animation().delay(1.0).start_at(2.0);
        manager.cancel_all(None, &mut target);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn registered_animations_wait_for_start() {
        let mut target = ElementProps::default();
        let mut manager = AnimationManager::new();
        manager.named("later").position(to_x(4.0, 1.0)).register();
        assert!(!manager.is_animating());
        manager.next_frame(1.0, &mut target);
        assert_eq!(target.position.x, 0.0);

        assert!(manager.start("later", StartTime::At(1.0)));
        assert!(!manager.start("missing", StartTime::NextFrame));
        manager.next_frame(1.5, &mut target);
        assert!((target.position.x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn start_all_starts_idle_only() {
        let mut target = ElementProps::default();
        let mut manager = AnimationManager::new();
        manager.new_animation().position(to_x(2.0, 2.0)).start_at(0.0);
        manager.new_animation().scale(TweenOptions::to(Vec2::splat(3.0)).duration(1.0)).register();
        manager.next_frame(1.0, &mut target);
        manager.start_all(StartTime::At(1.0));
        manager.next_frame(2.0, &mut target);
        assert_eq!(target.position.x, 2.0);
        assert_eq!(target.scale, Vec2::splat(3.0));
    }

    #[test]
    fn cancel_by_name() {
        let mut target = ElementProps::default();
        let mut manager = AnimationManager::new();
        manager.named("move").position(to_x(10.0, 1.0)).start_at(0.0);
        manager.named("spin").rotation(TweenOptions::to(1.0).duration(1.0)).start_at(0.0);
        manager.next_frame(0.5, &mut target);
        assert!(manager.cancel("move", Some(CancelForce::Complete), &mut target));
        assert_eq!(target.position.x, 10.0);
        assert!(manager.get("move").is_none());
        assert!(manager.get("spin").is_some());
        assert!(!manager.cancel("move", None, &mut target));
    }

    #[test]
    fn cancel_all_str_falls_back_to_own_policy() {
        let mut target = ElementProps::default();
        let mut manager = AnimationManager::new();
        manager.new_animation().position(to_x(10.0, 1.0)).if_canceled_then_complete().start_at(0.0);
        manager.next_frame(0.5, &mut target);
        manager.cancel_all_str("sideways", &mut target);
        assert_eq!(target.position.x, 10.0);
        assert!(manager.is_empty());
    }

    #[test]
    fn pause_keeps_progress() {
        let mut target = ElementProps::default();
        let mut manager = AnimationManager::new();
        manager.new_animation().position(to_x(2.0, 2.0)).start_at(0.0);
        manager.next_frame(1.0, &mut target);
        manager.pause(1.0);
        manager.next_frame(5.0, &mut target);
        assert!((target.position.x - 1.0).abs() < 1e-4);
        assert!((manager.remaining_time(5.0) - 1.0).abs() < 1e-9);

        manager.resume(11.0);
        manager.next_frame(11.5, &mut target);
        assert!((target.position.x - 1.5).abs() < 1e-4);
    }

    #[test]
    fn timing_queries() {
        let mut target = ElementProps::default();
        let mut manager = AnimationManager::new();
        manager.new_animation().delay(1.0).delay(2.0).start_at(0.0);
        manager.new_animation().delay(1.5).start_at(0.0);
        assert_eq!(manager.total_duration(), 3.0);
        manager.next_frame(0.5, &mut target);
        assert!((manager.remaining_time(0.5) - 2.5).abs() < 1e-9);
        assert_eq!(manager.next_finish_time(0.5), Some(1.5));
    }

    #[test]
    fn finish_callbacks_fire_in_order() {
        let mut target = ElementProps::default();
        let mut manager = AnimationManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (log.clone(), log.clone());
        manager.new_animation().delay(1.0).when_finished(move |_| a.borrow_mut().push("short")).start_at(0.0);
        manager.new_animation().delay(2.0).when_finished(move |_| b.borrow_mut().push("long")).start_at(0.0);
        manager.next_frame(5.0, &mut target);
        assert_eq!(*log.borrow(), vec!["short", "long"]);
    }

    #[test]
    fn no_stop_animations_survive_unforced_cancel() {
        let mut target = ElementProps::default();
        let mut manager = AnimationManager::new();
        let name = format!("{}spin", NO_STOP_PREFIX);
        manager.named(name.as_str()).rotation(TweenOptions::to(1.0).duration(2.0)).start_at(0.0);
        manager.new_animation().position(to_x(4.0, 2.0)).start_at(0.0);
        manager.next_frame(1.0, &mut target);

        manager.cancel_all(None, &mut target);
        assert_eq!(manager.len(), 1);
        assert!(manager.is_animating());
        assert_eq!(manager.animations()[0].name(), Some(name.as_str()));

        manager.cancel_all(Some(CancelForce::Complete), &mut target);
        assert!(manager.is_empty());
        assert_eq!(target.rotation, 1.0);
    }

    #[test]
    fn kept_animation_can_restart() {
        let mut target = ElementProps::default();
        let mut manager = AnimationManager::new();
        manager
            .named("blink")
            .position(to_x(2.0, 1.0))
            .remove_on_finish(false)
            .start_at(0.0);
        assert!(!manager.get("blink").unwrap().removes_on_finish());

        assert_eq!(manager.next_frame(1.0, &mut target), 1);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.get("blink").unwrap().state(), StepState::Finished);
        assert!(!manager.is_animating());
        assert_eq!(manager.next_frame(2.0, &mut target), 0);

        target.position = Vec2::ZERO;
        assert!(manager.start("blink", StartTime::At(2.0)));
        assert!(!manager.start("blink", StartTime::At(2.0)));
        manager.next_frame(2.5, &mut target);
        assert!((target.position.x - 1.0).abs() < 1e-4);
        manager.next_frame(3.0, &mut target);
        assert_eq!(target.position.x, 2.0);

        assert!(manager.remove("blink").is_some());
        assert!(manager.is_empty());
    }
}
