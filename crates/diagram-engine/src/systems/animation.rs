//! Animation system: drives every element's animation manager from one clock.

use crate::animation::step::CancelForce;
use crate::core::scene::Scene;

/// Advance every element's animations to `now`.
///
/// Call this once per frame before drawing. Returns how many animations
/// finished across the scene.
pub fn tick_animations(scene: &mut Scene, now: f64) -> usize {
    let finished: usize = scene.iter_mut().map(|element| element.next_frame(now)).sum();
    log::trace!("tick at {:.4}: {} animation(s) finished", now, finished);
    finished
}

/// Whether any element still has a started animation.
pub fn is_animating(scene: &Scene) -> bool {
    scene.iter().any(|element| element.is_animating())
}

/// Longest time any started animation in the scene still needs.
pub fn remaining_animation_time(scene: &Scene, now: f64) -> f64 {
    scene
        .iter()
        .map(|element| element.animations.remaining_time(now))
        .fold(0.0, f64::max)
}

/// Cancel every animation in the scene.
pub fn cancel_all(scene: &mut Scene, force: Option<CancelForce>) {
    for element in scene.iter_mut() {
        element.cancel_all(force);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::options::TweenOptions;
    use crate::animation::progression::Progression;
    use crate::api::types::ElementId;
    use crate::components::element::Element;
    use glam::Vec2;

    fn scene_with_two() -> Scene {
        let mut scene = Scene::new();
        scene.spawn(Element::new(ElementId(1)));
        scene.spawn(Element::new(ElementId(2)));
        scene
    }

    #[test]
    fn tick_moves_every_element() {
        let mut scene = scene_with_two();
        for (i, element) in scene.iter_mut().enumerate() {
            element
                .animate()
                .position(
                    TweenOptions::to(Vec2::new(10.0, 0.0))
                        .duration(1.0 + i as f64)
                        .progression(Progression::Linear),
                )
                .start_at(0.0);
        }
        assert!(is_animating(&scene));
        assert!((remaining_animation_time(&scene, 0.0) - 2.0).abs() < 1e-9);

        assert_eq!(tick_animations(&mut scene, 1.0), 1);
        let first = scene.get(ElementId(1)).unwrap();
        let second = scene.get(ElementId(2)).unwrap();
        assert_eq!(first.props.position.x, 10.0);
        assert!((second.props.position.x - 5.0).abs() < 1e-4);
        assert!(is_animating(&scene));

        tick_animations(&mut scene, 2.0);
        assert!(!is_animating(&scene));
        assert_eq!(remaining_animation_time(&scene, 2.0), 0.0);
    }

    #[test]
    fn cancel_all_resolves_everything() {
        let mut scene = scene_with_two();
        for element in scene.iter_mut() {
            element
                .animate()
                .rotation(TweenOptions::to(2.0).duration(4.0))
                .start_at(0.0);
        }
        tick_animations(&mut scene, 1.0);
        cancel_all(&mut scene, Some(CancelForce::Complete));
        assert!(!is_animating(&scene));
        assert!(scene.iter().all(|e| e.props.rotation == 2.0));
    }
}
