use std::collections::HashMap;
use glam::Vec2;
use crate::animation::builder::AnimationBuilder;
use crate::animation::manager::AnimationManager;
use crate::animation::scenario::ScenarioState;
use crate::animation::step::CancelForce;
use crate::animation::target::AnimationTarget;
use crate::api::types::{Color, ElementId, Property, DIM_GREY, WHITE};
use crate::config::AnimationConfig;

/// Drawable state of a diagram element. This is what animations mutate.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementProps {
    /// Position in diagram space.
    pub position: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Persisted scale.
    pub scale: Vec2,
    pub color: Color,
    /// Color `dim` fades to.
    pub dim_color: Color,
    /// Color `undim` fades back to.
    pub default_color: Color,
    pub opacity: f32,
    pub shown: bool,
    /// Transient draw-time multiplier written by pulses. Never persisted
    /// into `scale`.
    pub pulse_scale: f32,
    /// Named states scenario steps can target.
    pub scenarios: HashMap<String, ScenarioState>,
}

impl Default for ElementProps {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            color: WHITE,
            dim_color: DIM_GREY,
            default_color: WHITE,
            opacity: 1.0,
            shown: true,
            pulse_scale: 1.0,
            scenarios: HashMap::new(),
        }
    }
}

impl AnimationTarget for ElementProps {
    fn position(&self) -> Vec2 {
        self.position
    }
    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }
    fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    fn scale(&self) -> Vec2 {
        self.scale
    }
    fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    fn color(&self) -> Color {
        self.color
    }
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
    fn dim_color(&self) -> Color {
        self.dim_color
    }
    fn default_color(&self) -> Color {
        self.default_color
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }
    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    fn is_shown(&self) -> bool {
        self.shown
    }
    fn show(&mut self) {
        self.shown = true;
    }
    fn hide(&mut self) {
        self.shown = false;
    }

    fn set_pulse_scale(&mut self, multiplier: f32) {
        self.pulse_scale = multiplier;
    }

    fn scenario(&self, name: &str) -> Option<ScenarioState> {
        self.scenarios.get(name).copied()
    }

    fn changed(&mut self, property: Property) {
        log::trace!("element property {:?} changed", property);
    }
}

/// A diagram element: drawable props plus the manager animating them.
/// Each element owns exactly one manager, so animations live and die with
/// the element.
#[derive(Debug)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// String tag for finding elements by name.
    pub tag: String,
    pub props: ElementProps,
    pub animations: AnimationManager,
}

impl Element {
    /// Create an element at the origin with default props.
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            tag: String::new(),
            props: ElementProps::default(),
            animations: AnimationManager::new(),
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.props.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.props.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.props.scale = scale;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.props.color = color;
        self.props.default_color = color;
        self
    }

    pub fn with_dim_color(mut self, color: Color) -> Self {
        self.props.dim_color = color;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.props.shown = false;
        self
    }

    pub fn with_scenario(mut self, name: impl Into<String>, state: ScenarioState) -> Self {
        self.props.scenarios.insert(name.into(), state);
        self
    }

    pub fn with_config(mut self, config: AnimationConfig) -> Self {
        self.animations.set_config(config);
        self
    }

    // -- Animation --

    /// Start building a new animation for this element.
    pub fn animate(&mut self) -> AnimationBuilder<'_> {
        self.animations.new_animation()
    }

    /// Start building steps for the animation called `name`, extending it
    /// if it is already running.
    pub fn animate_named(&mut self, name: impl Into<String>) -> AnimationBuilder<'_> {
        self.animations.add_to(name)
    }

    /// Advance this element's animations to `now`.
    pub fn next_frame(&mut self, now: f64) -> usize {
        self.animations.next_frame(now, &mut self.props)
    }

    pub fn cancel_all(&mut self, force: Option<CancelForce>) {
        self.animations.cancel_all(force, &mut self.props);
    }

    pub fn cancel(&mut self, name: &str, force: Option<CancelForce>) -> bool {
        self.animations.cancel(name, force, &mut self.props)
    }

    pub fn is_animating(&self) -> bool {
        self.animations.is_animating()
    }

    /// Scale to draw with: the persisted scale times the pulse multiplier.
    pub fn draw_transform(&self) -> (Vec2, f32, Vec2) {
        (
            self.props.position,
            self.props.rotation,
            self.props.scale * self.props.pulse_scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::animation::leaf::pulse::PulseOptions;
    use crate::animation::options::TweenOptions;
    use crate::animation::step::StartTime;
    use super::*;

    #[test]
    fn animations_drive_props() {
        let mut element = Element::new(ElementId(1)).with_position(Vec2::new(1.0, 0.0));
        element
            .animate()
            .position(TweenOptions::to(Vec2::new(3.0, 0.0)).duration(1.0))
            .start_at(0.0);
        assert!(element.is_animating());
        element.next_frame(1.0);
        assert_eq!(element.props.position, Vec2::new(3.0, 0.0));
        assert!(!element.is_animating());
    }

    #[test]
    fn pulse_only_touches_draw_scale() {
        let mut element = Element::new(ElementId(1)).with_scale(Vec2::splat(2.0));
        element
            .animate()
            .pulse(PulseOptions::new().scale(2.0).duration(1.0))
            .start_at(0.0);
        element.next_frame(0.5);
        let (_, _, scale) = element.draw_transform();
        assert!((scale.x - 4.0).abs() < 1e-4);
        assert_eq!(element.props.scale, Vec2::splat(2.0));
        element.next_frame(1.0);
        assert_eq!(element.draw_transform().2, Vec2::splat(2.0));
    }

    #[test]
    fn config_defaults_reach_builders() {
        let config = AnimationConfig { default_duration: 4.0, ..AnimationConfig::default() };
        let mut element = Element::new(ElementId(1)).with_config(config);
        element.animate().position(TweenOptions::to(Vec2::ONE)).register();
        assert_eq!(element.animations.total_duration(), 4.0);
        element.animations.start_all(StartTime::At(0.0));
        assert!(element.is_animating());
    }

    #[test]
    fn named_scenario_from_element() {
        let mut element = Element::new(ElementId(1))
            .with_scenario("home", ScenarioState::new().position(Vec2::new(5.0, 5.0)));
        element
            .animate()
            .scenario(crate::animation::scenario::ScenarioOptions::to("home").duration(1.0))
            .start_at(0.0);
        element.next_frame(2.0);
        assert_eq!(element.props.position, Vec2::new(5.0, 5.0));
    }
}
