//! Map click → street-level image navigation.
//!
//! The coordinator keeps no state of its own. It reads both pane slots on
//! every click, so a click before either pane is up, or after either is torn
//! down, does nothing.

use std::fmt;

use tracing::Level;

use crate::error::PaneError;
use crate::model::{ImageId, RenderedFeature, ScreenPoint};
use crate::state::InstanceSlot;

/// What the coordinator needs from the map.
pub trait FeatureQuery {
    /// Rendered features of `layer_id` at `point`, closest first.
    fn query_features_at(
        &self,
        point: ScreenPoint,
        layer_id: &str,
    ) -> Result<Vec<RenderedFeature>, PaneError>;
}

/// What the coordinator needs from the image viewer. Navigation settles in
/// the background; the implementation logs its own failures.
pub trait ImageNavigator {
    fn navigate_to(&self, image_id: &ImageId);
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    MapUnavailable,
    ViewerUnavailable,
    QueryFailed(PaneError),
    NoFeature,
    MissingImageId,
    Navigated(ImageId),
}

impl ClickOutcome {
    pub fn level(&self) -> Level {
        match self {
            ClickOutcome::MapUnavailable
            | ClickOutcome::ViewerUnavailable
            | ClickOutcome::Navigated(_) => Level::DEBUG,
            ClickOutcome::QueryFailed(_) | ClickOutcome::NoFeature | ClickOutcome::MissingImageId => {
                Level::WARN
            }
        }
    }

    pub fn report(&self) {
        if self.level() == Level::WARN {
            tracing::warn!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }
    }
}

impl fmt::Display for ClickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickOutcome::MapUnavailable => f.write_str("click ignored: map not initialized"),
            ClickOutcome::ViewerUnavailable => f.write_str("click ignored: image viewer not initialized"),
            ClickOutcome::QueryFailed(err) => write!(f, "feature query failed: {}", err),
            ClickOutcome::NoFeature => f.write_str("No image_id found (no sequence at click)"),
            ClickOutcome::MissingImageId => f.write_str("No image_id found (closest feature has none)"),
            ClickOutcome::Navigated(id) => write!(f, "navigating viewer to {}", id),
        }
    }
}

pub struct ClickCoordinator<M, V> {
    map: InstanceSlot<M>,
    viewer: InstanceSlot<V>,
    layer_id: String,
}

impl<M: FeatureQuery, V: ImageNavigator> ClickCoordinator<M, V> {
    pub fn new(map: InstanceSlot<M>, viewer: InstanceSlot<V>, layer_id: impl Into<String>) -> Self {
        Self {
            map,
            viewer,
            layer_id: layer_id.into(),
        }
    }

    pub fn handle_click(&self, point: ScreenPoint) -> ClickOutcome {
        if !self.map.is_live() {
            return ClickOutcome::MapUnavailable;
        }
        if !self.viewer.is_live() {
            return ClickOutcome::ViewerUnavailable;
        }

        let features = match self.map.with(|map| map.query_features_at(point, &self.layer_id)) {
            Some(Ok(features)) => features,
            Some(Err(err)) => return ClickOutcome::QueryFailed(err),
            None => return ClickOutcome::MapUnavailable,
        };
        let Some(closest) = features.first() else {
            return ClickOutcome::NoFeature;
        };
        let Some(image_id) = closest.image_id() else {
            return ClickOutcome::MissingImageId;
        };

        match self.viewer.with(|viewer| viewer.navigate_to(&image_id)) {
            Some(()) => ClickOutcome::Navigated(image_id),
            None => ClickOutcome::ViewerUnavailable,
        }
    }
}

impl<M, V> Clone for ClickCoordinator<M, V> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            viewer: self.viewer.clone(),
            layer_id: self.layer_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeMap {
        features: Vec<RenderedFeature>,
        queries: Rc<RefCell<Vec<(ScreenPoint, String)>>>,
        fail: bool,
    }

    impl FeatureQuery for FakeMap {
        fn query_features_at(
            &self,
            point: ScreenPoint,
            layer_id: &str,
        ) -> Result<Vec<RenderedFeature>, PaneError> {
            self.queries.borrow_mut().push((point, layer_id.to_string()));
            if self.fail {
                return Err(PaneError::Js {
                    operation: "query rendered features",
                    message: "layer missing".into(),
                });
            }
            Ok(self.features.clone())
        }
    }

    #[derive(Default, Clone)]
    struct FakeViewer {
        calls: Rc<RefCell<Vec<ImageId>>>,
    }

    impl ImageNavigator for FakeViewer {
        fn navigate_to(&self, image_id: &ImageId) {
            self.calls.borrow_mut().push(image_id.clone());
        }
    }

    fn feature(props: Value) -> RenderedFeature {
        RenderedFeature::from_properties(Some(props))
    }

    struct Harness {
        map: InstanceSlot<FakeMap>,
        viewer: InstanceSlot<FakeViewer>,
        calls: Rc<RefCell<Vec<ImageId>>>,
        queries: Rc<RefCell<Vec<(ScreenPoint, String)>>>,
        coordinator: ClickCoordinator<FakeMap, FakeViewer>,
    }

    fn harness(features: Vec<RenderedFeature>) -> Harness {
        let map = InstanceSlot::new();
        let viewer = InstanceSlot::new();
        let queries = Rc::new(RefCell::new(Vec::new()));
        let fake_viewer = FakeViewer::default();
        let calls = fake_viewer.calls.clone();
        map.install(FakeMap {
            features,
            queries: queries.clone(),
            fail: false,
        });
        viewer.install(fake_viewer);
        let coordinator = ClickCoordinator::new(map.clone(), viewer.clone(), "mapillary");
        Harness {
            map,
            viewer,
            calls,
            queries,
            coordinator,
        }
    }

    const CLICK: ScreenPoint = ScreenPoint { x: 120.0, y: 48.5 };

    #[test]
    fn closest_feature_id_is_navigated_to_once() {
        let h = harness(vec![
            feature(json!({ "image_id": "abc123" })),
            feature(json!({ "image_id": "zzz999" })),
        ]);
        let outcome = h.coordinator.handle_click(CLICK);
        assert_eq!(outcome, ClickOutcome::Navigated(ImageId::from("abc123")));
        assert_eq!(*h.calls.borrow(), vec![ImageId::from("abc123")]);
        assert_eq!(*h.queries.borrow(), vec![(CLICK, "mapillary".to_string())]);
    }

    #[test]
    fn empty_query_warns_without_navigating() {
        let h = harness(vec![]);
        let outcome = h.coordinator.handle_click(CLICK);
        assert_eq!(outcome, ClickOutcome::NoFeature);
        assert_eq!(outcome.level(), Level::WARN);
        assert!(h.calls.borrow().is_empty());
    }

    #[test]
    fn no_id_warnings_say_no_image_id_found() {
        assert!(ClickOutcome::NoFeature.to_string().starts_with("No image_id found"));
        assert!(ClickOutcome::MissingImageId.to_string().starts_with("No image_id found"));
        assert_eq!(
            ClickOutcome::Navigated(ImageId::from("abc123")).to_string(),
            "navigating viewer to abc123"
        );
    }

    #[test]
    fn closest_feature_without_id_warns_even_if_later_ones_have_one() {
        let h = harness(vec![
            feature(json!({ "sequence_id": "seq-1" })),
            feature(json!({ "image_id": "abc123" })),
        ]);
        let outcome = h.coordinator.handle_click(CLICK);
        assert_eq!(outcome, ClickOutcome::MissingImageId);
        assert_eq!(outcome.level(), Level::WARN);
        assert!(h.calls.borrow().is_empty());
    }

    #[test]
    fn clicks_before_either_pane_is_live_do_nothing() {
        let h = harness(vec![feature(json!({ "image_id": "abc123" }))]);
        h.viewer.release();
        assert_eq!(h.coordinator.handle_click(CLICK), ClickOutcome::ViewerUnavailable);
        assert!(h.queries.borrow().is_empty());

        h.map.release();
        let outcome = h.coordinator.handle_click(CLICK);
        assert_eq!(outcome, ClickOutcome::MapUnavailable);
        assert_eq!(outcome.level(), Level::DEBUG);
        assert!(h.calls.borrow().is_empty());
    }

    #[test]
    fn teardown_stops_further_navigation() {
        let h = harness(vec![feature(json!({ "image_id": 42 }))]);
        assert_eq!(h.coordinator.clone().handle_click(CLICK), ClickOutcome::Navigated(ImageId::from("42")));
        h.map.release();
        assert_eq!(h.coordinator.handle_click(CLICK), ClickOutcome::MapUnavailable);
        assert_eq!(h.calls.borrow().len(), 1);
    }

    #[test]
    fn map_without_viewer_never_navigates() {
        let map = InstanceSlot::new();
        let viewer: InstanceSlot<FakeViewer> = InstanceSlot::new();
        map.install(FakeMap {
            features: vec![feature(json!({ "image_id": "abc123" }))],
            queries: Rc::new(RefCell::new(Vec::new())),
            fail: false,
        });
        let coordinator = ClickCoordinator::new(map, viewer, "mapillary");
        for _ in 0..3 {
            assert_eq!(coordinator.handle_click(CLICK), ClickOutcome::ViewerUnavailable);
        }
    }

    #[test]
    fn failing_query_is_a_warning_not_a_navigation() {
        let h = harness(vec![]);
        h.map.install(FakeMap {
            features: vec![feature(json!({ "image_id": "abc123" }))],
            queries: h.queries.clone(),
            fail: true,
        });
        let outcome = h.coordinator.handle_click(CLICK);
        assert!(matches!(outcome, ClickOutcome::QueryFailed(PaneError::Js { .. })));
        assert_eq!(outcome.level(), Level::WARN);
        assert!(h.calls.borrow().is_empty());
    }

    #[test]
    fn rapid_clicks_each_issue_their_own_navigation() {
        let h = harness(vec![feature(json!({ "image_id": "abc123" }))]);
        h.coordinator.handle_click(CLICK);
        h.coordinator.handle_click(ScreenPoint { x: 1.0, y: 2.0 });
        assert_eq!(h.calls.borrow().len(), 2);
    }
}
