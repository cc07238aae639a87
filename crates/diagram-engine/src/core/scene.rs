use crate::api::types::ElementId;
use crate::components::element::Element;
use crate::config::AnimationConfig;

/// Simple element storage using a flat Vec.
/// Designed for diagram-sized element counts (hundreds, not millions).
pub struct Scene {
    elements: Vec<Element>,
    config: AnimationConfig,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_config(AnimationConfig::default())
    }

    /// Create a scene whose elements animate with `config` defaults.
    pub fn with_config(config: AnimationConfig) -> Self {
        Self {
            elements: Vec::with_capacity(64),
            config,
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Add an element to the scene. An element still on the default config
    /// takes the scene's; one configured with `Element::with_config` keeps
    /// its own.
    pub fn spawn(&mut self, mut element: Element) {
        if *element.animations.config() == AnimationConfig::default() {
            element.animations.set_config(self.config);
        }
        self.elements.push(element);
    }

    /// Remove an element by ID. Its animations go with it.
    pub fn despawn(&mut self, id: ElementId) -> Option<Element> {
        let idx = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.swap_remove(idx))
    }

    /// Get a reference to an element by ID.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.iter_mut()
    }

    /// Find the first element with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.tag == tag)
    }

    /// Find the first element with the given tag (mutable).
    pub fn find_by_tag_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
