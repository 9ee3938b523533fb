use std::collections::HashSet;

/// Manages which canvas elements are selected.
///
/// `SelectionManager` is responsible for:
/// - Tracking the selected element ids in the order they were selected
/// - Replacing, extending and toggling the selection
/// - Dropping ids that no longer exist in the scene
///
/// # Selection Model
///
/// - **Ordered**: ids keep the order in which they were first selected; the
///   arrangement flow sends selected elements in scene order, not this order.
/// - **Unique**: selecting an id twice has no effect.
/// - **Unchecked**: the manager does not know the scene; callers prune stale
///   ids with [`SelectionManager::retain`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionManager {
    ids: Vec<String>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use layerkit_designer::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new();
    /// assert!(manager.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the selected ids in selection order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    /// Adds ids to the selection, skipping ones already selected.
    pub fn extend<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into();
            if !self.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Replaces the selection with exactly `ids`.
    ///
    /// # Examples
    ///
    /// ```
    /// use layerkit_designer::selection_manager::SelectionManager;
    ///
    /// let mut manager = SelectionManager::new();
    /// manager.extend(["a", "b"]);
    /// manager.set(["c", "c"]);
    /// assert_eq!(manager.ids(), ["c".to_string()]);
    /// ```
    pub fn set<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids.clear();
        self.extend(ids);
    }

    /// Toggles one id (Shift+click).
    ///
    /// # Returns
    ///
    /// `true` if the id is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Keeps only ids present in `existing`.
    ///
    /// # Returns
    ///
    /// The ids that were dropped.
    pub fn retain(&mut self, existing: &HashSet<&str>) -> Vec<String> {
        let (keep, dropped): (Vec<String>, Vec<String>) = self
            .ids
            .drain(..)
            .partition(|id| existing.contains(id.as_str()));
        self.ids = keep;
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut m = SelectionManager::new();
        assert!(m.toggle("a"));
        assert!(m.toggle("b"));
        assert!(!m.toggle("a"));
        assert_eq!(m.ids(), ["b".to_string()]);
    }

    #[test]
    fn test_retain_reports_dropped() {
        let mut m = SelectionManager::new();
        m.extend(["a", "b", "c"]);
        let existing: HashSet<&str> = ["a", "c"].into_iter().collect();
        assert_eq!(m.retain(&existing), vec!["b".to_string()]);
        assert_eq!(m.len(), 2);
    }
}
