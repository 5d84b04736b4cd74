// Selected-flight state for the live view
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    selected: Option<String>,
}

impl Selection {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selecting the current id again clears it; `None` always clears.
    pub fn select(&mut self, id: Option<&str>) -> Option<&str> {
        self.selected = match id {
            Some(id) if self.selected.as_deref() != Some(id) => Some(id.to_string()),
            _ => None,
        };
        self.selected()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_toggles() {
        let mut selection = Selection::default();
        assert_eq!(selection.select(Some("x")), Some("x"));
        assert_eq!(selection.select(Some("x")), None);
    }

    #[test]
    fn test_select_other_replaces() {
        let mut selection = Selection::default();
        selection.select(Some("x"));
        assert_eq!(selection.select(Some("y")), Some("y"));
    }

    #[test]
    fn test_select_none_always_clears() {
        let mut selection = Selection::default();
        assert_eq!(selection.select(None), None);

        selection.select(Some("x"));
        assert_eq!(selection.select(None), None);
        assert_eq!(selection.selected(), None);
    }
}
