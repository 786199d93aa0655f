//! Data model shared by the map pane, the viewer pane and the click coordinator.
//! Style specs serialize to the exact JSON shape the map renderer expects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Property carrying the street-level image id on sequence features.
pub const IMAGE_ID_PROPERTY: &str = "image_id";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

/// Pixel position relative to the map container, as reported by click events.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapView {
    pub center: LngLat,
    pub zoom: f64,
    /// Style URL, e.g. `mapbox://styles/mapbox/light-v11`.
    pub style: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(String);

impl ImageId {
    /// Reads an id from a feature property. Tiles encode ids as integers, but
    /// strings are accepted verbatim. Anything falsy (null, false, "", 0) is no
    /// id. Other truthy values (`true`, arrays, objects) are not ids either,
    /// since the viewer can only move to a string id.
    pub fn from_property(value: &Value) -> Option<ImageId> {
        match value {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(ImageId(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return (i != 0).then(|| ImageId(i.to_string()));
                }
                if let Some(u) = n.as_u64() {
                    return Some(ImageId(u.to_string()));
                }
                // JS numbers may arrive as floats; whole ones are printed without a fraction
                let f = n.as_f64()?;
                if f == 0.0 || f.is_nan() {
                    None
                } else if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
                    Some(ImageId(format!("{}", f as i64)))
                } else {
                    Some(ImageId(n.to_string()))
                }
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        ImageId(s.to_string())
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One feature returned by a rendered-feature query. Only the property bag is kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedFeature {
    pub properties: Map<String, Value>,
}

impl RenderedFeature {
    /// Builds a feature from whatever the renderer put in `properties`.
    /// Anything but an object leaves the bag empty.
    pub fn from_properties(value: Option<Value>) -> Self {
        match value {
            Some(Value::Object(properties)) => Self { properties },
            _ => Self::default(),
        }
    }

    pub fn image_id(&self) -> Option<ImageId> {
        self.properties
            .get(IMAGE_ID_PROPERTY)
            .and_then(ImageId::from_property)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VectorSourceSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub tiles: Vec<String>,
    pub minzoom: u8,
    pub maxzoom: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LineLayout {
    pub line_cap: &'static str,
    pub line_join: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinePaint {
    pub line_opacity: f64,
    pub line_color: String,
    pub line_width: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineLayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub source: String,
    #[serde(rename = "source-layer")]
    pub source_layer: String,
    pub layout: LineLayout,
    pub paint: LinePaint,
}

/// Source + layer pair that draws image sequences on top of the base style.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceOverlay {
    pub source_id: String,
    pub source: VectorSourceSpec,
    pub layer: LineLayerSpec,
    /// Style layer the overlay is inserted below, if the style has it.
    pub before_layer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(props: Value) -> RenderedFeature {
        RenderedFeature::from_properties(Some(props))
    }

    #[test]
    fn integer_image_ids_keep_all_digits() {
        let f = feature(json!({ "image_id": 498763468214164_u64, "id": 7 }));
        assert_eq!(f.image_id(), Some(ImageId::from("498763468214164")));
    }

    #[test]
    fn string_image_ids_are_accepted() {
        let f = feature(json!({ "image_id": "abc123" }));
        assert_eq!(f.image_id().as_ref().map(ImageId::as_str), Some("abc123"));
    }

    #[test]
    fn falsy_image_ids_count_as_missing() {
        for v in [json!(null), json!(false), json!(""), json!(0), json!(0.0), json!(true), json!({})] {
            assert_eq!(feature(json!({ "image_id": v })).image_id(), None);
        }
        assert_eq!(feature(json!({ "sequence_id": "s1" })).image_id(), None);
    }

    #[test]
    fn string_ids_are_passed_through_verbatim() {
        assert_eq!(
            feature(json!({ "image_id": "   " })).image_id(),
            Some(ImageId::from("   "))
        );
        assert_eq!(
            feature(json!({ "image_id": " abc " })).image_id(),
            Some(ImageId::from(" abc "))
        );
    }

    #[test]
    fn float_encoded_ids_print_as_integers() {
        let f = feature(json!({ "image_id": 498763468214164.0 }));
        assert_eq!(f.image_id(), Some(ImageId::from("498763468214164")));
    }

    #[test]
    fn non_object_properties_give_an_empty_feature() {
        assert_eq!(RenderedFeature::from_properties(None), RenderedFeature::default());
        assert_eq!(
            RenderedFeature::from_properties(Some(json!("image_id"))),
            RenderedFeature::default()
        );
        let f = RenderedFeature::from_properties(Some(json!({ "image_id": 7, "organization_id": 3 })));
        assert_eq!(f.properties.len(), 2);
        assert_eq!(f.image_id(), Some(ImageId::from("7")));
    }

    #[test]
    fn click_points_read_x_and_y_and_ignore_the_rest() {
        let p: ScreenPoint = serde_json::from_value(json!({ "x": 120.5, "y": 48, "_pos": 1 })).unwrap();
        assert_eq!(p, ScreenPoint { x: 120.5, y: 48.0 });
        assert!(serde_json::from_value::<ScreenPoint>(json!({ "x": 1.0 })).is_err());
    }

    #[test]
    fn line_layer_uses_style_spec_keys() {
        let layer = LineLayerSpec {
            id: "mapillary".into(),
            kind: "line",
            source: "mapillary".into(),
            source_layer: "sequence".into(),
            layout: LineLayout {
                line_cap: "round",
                line_join: "round",
            },
            paint: LinePaint {
                line_opacity: 0.6,
                line_color: "rgb(53, 175, 140)".into(),
                line_width: 2.0,
            },
        };
        let v = serde_json::to_value(&layer).unwrap();
        assert_eq!(v["type"], "line");
        assert_eq!(v["source-layer"], "sequence");
        assert_eq!(v["layout"]["line-cap"], "round");
        assert_eq!(v["layout"]["line-join"], "round");
        assert_eq!(v["paint"]["line-color"], "rgb(53, 175, 140)");
        assert_eq!(v["paint"]["line-width"], 2.0);
    }
}
