//! Scene store
//!
//! Ordered element collection (draw order) plus the active selection and the
//! viewport size. Scene files use the whiteboard's canvas-data layout: either
//! a bare element array or an object with `elements` and `appState`.

use crate::element::Element;
use crate::selection_manager::SelectionManager;
use layerkit_core::{emit, AppEvent, Result, SceneError, SceneEvent};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Element store with selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    elements: Vec<Element>,
    selection: SelectionManager,
    viewport: Option<(f64, f64)>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene, rejecting duplicate ids.
    pub fn from_elements(elements: Vec<Element>) -> Result<Self> {
        let mut scene = Self::new();
        scene.replace_all(elements)?;
        Ok(scene)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append an element on top of the draw order.
    pub fn insert(&mut self, element: Element) -> Result<()> {
        if self.contains(&element.id) {
            return Err(SceneError::DuplicateId { id: element.id }.into());
        }
        self.elements.push(element);
        Ok(())
    }

    /// Replace every element, keeping the selection for ids that survive.
    pub fn replace_all(&mut self, elements: Vec<Element>) -> Result<()> {
        let mut seen = HashSet::with_capacity(elements.len());
        for el in &elements {
            if !seen.insert(el.id.as_str()) {
                return Err(SceneError::DuplicateId { id: el.id.clone() }.into());
            }
        }
        self.elements = elements;
        let dropped = self.prune_selection();
        if !dropped.is_empty() {
            tracing::debug!("Selection lost {} removed element(s)", dropped.len());
        }
        Ok(())
    }

    /// Mutate one element in place.
    pub fn update<F>(&mut self, id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut Element),
    {
        let el = self
            .elements
            .iter_mut()
            .find(|el| el.id == id)
            .ok_or_else(|| SceneError::ElementNotFound { id: id.to_string() })?;
        f(el);
        Ok(())
    }

    /// Remove an element, deselecting it.
    pub fn remove(&mut self, id: &str) -> Result<Element> {
        let pos = self
            .elements
            .iter()
            .position(|el| el.id == id)
            .ok_or_else(|| SceneError::ElementNotFound { id: id.to_string() })?;
        let removed = self.elements.remove(pos);
        self.prune_selection();
        Ok(removed)
    }

    pub fn viewport(&self) -> Option<(f64, f64)> {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Some((width, height));
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Add ids to the selection. Unknown ids are an error and nothing changes.
    pub fn select<I, S>(&mut self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        self.check_ids(&ids)?;
        self.selection.extend(ids);
        Ok(())
    }

    /// Replace the selection with exactly `ids`.
    pub fn select_only<I, S>(&mut self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        self.check_ids(&ids)?;
        self.selection.set(ids);
        Ok(())
    }

    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        self.check_ids(&[id.to_string()])?;
        Ok(self.selection.toggle(id))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selected_ids(&self) -> &[String] {
        self.selection.ids()
    }

    /// Selected elements in draw order.
    pub fn selected_elements(&self) -> Vec<Element> {
        self.elements
            .iter()
            .filter(|el| self.selection.contains(&el.id))
            .cloned()
            .collect()
    }

    /// Deselect ids that no longer exist. Returns the dropped ids.
    pub fn prune_selection(&mut self) -> Vec<String> {
        let existing: HashSet<&str> = self.elements.iter().map(|el| el.id.as_str()).collect();
        self.selection.retain(&existing)
    }

    fn check_ids(&self, ids: &[String]) -> Result<()> {
        match ids.iter().find(|id| !self.contains(id)) {
            Some(id) => Err(SceneError::ElementNotFound { id: id.clone() }.into()),
            None => Ok(()),
        }
    }

    /// Load a scene file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let file: SceneFile = serde_json::from_str(&content).map_err(|e| SceneError::InvalidFile {
            reason: e.to_string(),
        })?;

        let mut scene = match file {
            SceneFile::Bare(elements) => Scene::from_elements(elements)?,
            SceneFile::Document { elements, app_state } => {
                let mut scene = Scene::from_elements(elements)?;
                if let (Some(w), Some(h)) = (app_state.width, app_state.height) {
                    scene.set_viewport(w, h);
                }
                let selected = app_state.selected_element_ids.into_ids();
                let unknown = selected.iter().filter(|id| !scene.contains(id)).count();
                if unknown > 0 {
                    tracing::warn!("Ignoring {} selected id(s) not in the scene", unknown);
                }
                scene.selection.set(selected);
                scene
            }
        };
        scene.prune_selection();

        tracing::info!("Loaded scene {} ({} elements)", path.display(), scene.len());
        emit!(AppEvent::Scene(SceneEvent::Loaded {
            path: path.to_path_buf(),
            elements: scene.len(),
        }));
        Ok(scene)
    }

    /// Save the scene as a canvas document.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let doc = SceneFile::Document {
            elements: self.elements.clone(),
            app_state: AppState {
                selected_element_ids: SelectedIds::Map(
                    self.selected_ids().iter().map(|id| (id.clone(), true)).collect(),
                ),
                width: self.viewport.map(|(w, _)| w),
                height: self.viewport.map(|(_, h)| h),
            },
        };
        let content = serde_json::to_string_pretty(&doc)?;
        std::fs::write(path, content)?;

        tracing::info!("Saved scene {}", path.display());
        emit!(AppEvent::Scene(SceneEvent::Saved {
            path: path.to_path_buf(),
        }));
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum SceneFile {
    Bare(Vec<Element>),
    Document {
        elements: Vec<Element>,
        #[serde(rename = "appState", default)]
        app_state: AppState,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppState {
    #[serde(default)]
    selected_element_ids: SelectedIds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
}

/// The whiteboard stores the selection as `{id: true}`; plain lists are accepted too.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum SelectedIds {
    Map(BTreeMap<String, bool>),
    List(Vec<String>),
}

impl Default for SelectedIds {
    fn default() -> Self {
        SelectedIds::List(Vec::new())
    }
}

impl SelectedIds {
    fn into_ids(self) -> Vec<String> {
        match self {
            SelectedIds::Map(map) => map.into_iter().filter(|(_, on)| *on).map(|(id, _)| id).collect(),
            SelectedIds::List(list) => list,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Scene {
        Scene::from_elements(vec![
            Element::rectangle("a", 0.0, 0.0, 10.0, 10.0),
            Element::rectangle("b", 20.0, 0.0, 10.0, 10.0),
            Element::rectangle("c", 40.0, 0.0, 10.0, 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut scene = abc();
        let err = scene.insert(Element::rectangle("a", 0.0, 0.0, 1.0, 1.0)).unwrap_err();
        assert!(err.is_scene_error());
        assert!(Scene::from_elements(vec![
            Element::rectangle("x", 0.0, 0.0, 1.0, 1.0),
            Element::rectangle("x", 0.0, 0.0, 1.0, 1.0),
        ])
        .is_err());
    }

    #[test]
    fn test_selected_elements_follow_draw_order() {
        let mut scene = abc();
        scene.select(["c", "a"]).unwrap();
        let ids: Vec<String> = scene.selected_elements().into_iter().map(|el| el.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(scene.selected_ids(), ["c".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_select_unknown_id_changes_nothing() {
        let mut scene = abc();
        scene.select(["a"]).unwrap();
        assert!(scene.select_only(["b", "missing"]).is_err());
        assert_eq!(scene.selected_ids(), ["a".to_string()]);
    }

    #[test]
    fn test_remove_deselects() {
        let mut scene = abc();
        scene.select(["a", "b"]).unwrap();
        scene.remove("a").unwrap();
        assert_eq!(scene.selected_ids(), ["b".to_string()]);
        assert!(scene.remove("a").is_err());
    }

    #[test]
    fn test_replace_all_prunes_selection() {
        let mut scene = abc();
        scene.select(["a", "b"]).unwrap();
        scene
            .replace_all(vec![Element::rectangle("b", 0.0, 0.0, 1.0, 1.0)])
            .unwrap();
        assert_eq!(scene.selected_ids(), ["b".to_string()]);
    }

    #[test]
    fn test_update() {
        let mut scene = abc();
        scene.update("b", |el| el.x = 99.0).unwrap();
        assert_eq!(scene.get("b").unwrap().x, 99.0);
        assert!(scene.update("zz", |_| {}).is_err());
    }
}
