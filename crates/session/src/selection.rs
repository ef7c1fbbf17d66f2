//! What the operator currently has selected. A single enum for every
//! selectable thing keeps alert, raw-data, and incentive selection mutually
//! exclusive by construction.

use bevy::prelude::*;

/// A raw input entity pickable from the map background layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackgroundRef {
    Tile(String),
    Sensor(String),
    Report(String),
}

/// Current selection. `Alert` and `Incentive` hold the respective ids.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Alert(String),
    Background(BackgroundRef),
    Incentive(String),
}

impl Selection {
    pub fn selected_alert_id(&self) -> Option<&str> {
        match self {
            Selection::Alert(id) => Some(id),
            _ => None,
        }
    }

    pub fn selected_incentive_id(&self) -> Option<&str> {
        match self {
            Selection::Incentive(id) => Some(id),
            _ => None,
        }
    }

    /// Drop an alert selection, leaving any other selection in place. Called
    /// when a fresh forest analysis replaces the alert list wholesale.
    pub fn clear_alert(&mut self) {
        if matches!(self, Selection::Alert(_)) {
            *self = Selection::None;
        }
    }

    /// Drop tile, sensor, report, and incentive selections. Called when the
    /// view switches to alerts-only, which hides those layers.
    pub fn clear_non_alert(&mut self) {
        if matches!(self, Selection::Background(_) | Selection::Incentive(_)) {
            *self = Selection::None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_replaces_previous_selection() {
        let mut selection = Selection::default();
        assert_eq!(selection, Selection::None);

        selection = Selection::Background(BackgroundRef::Sensor("SN-1".to_string()));
        assert_eq!(selection.selected_alert_id(), None);

        selection = Selection::Alert("1700000000000-0".to_string());
        assert_eq!(selection.selected_alert_id(), Some("1700000000000-0"));
        assert_eq!(selection.selected_incentive_id(), None);

        selection = Selection::Incentive("PES-FOREST-001".to_string());
        assert_eq!(selection.selected_alert_id(), None);
        assert_eq!(selection.selected_incentive_id(), Some("PES-FOREST-001"));
    }

    #[test]
    fn test_clear_alert_leaves_background() {
        let mut selection = Selection::Background(BackgroundRef::Tile("ST-1".to_string()));
        selection.clear_alert();
        assert_eq!(
            selection,
            Selection::Background(BackgroundRef::Tile("ST-1".to_string()))
        );

        let mut selection = Selection::Alert("id".to_string());
        selection.clear_alert();
        assert_eq!(selection, Selection::None);
    }

    #[test]
    fn test_clear_non_alert_keeps_alert() {
        let mut selection = Selection::Alert("id".to_string());
        selection.clear_non_alert();
        assert_eq!(selection, Selection::Alert("id".to_string()));

        let mut selection = Selection::Incentive("PES-WASTE-002".to_string());
        selection.clear_non_alert();
        assert_eq!(selection, Selection::None);
    }
}
