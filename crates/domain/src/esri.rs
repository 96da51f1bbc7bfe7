//! Helpers for ArcGIS REST service descriptors.
//!
//! ArcGIS endpoints answer `?f=json` with a loosely structured document.
//! Every lookup here is optional: a missing or malformed field is reported
//! at `debug` level and treated as absent, never as an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::geometry::BoundingBox;
use crate::projection::{WGS84_WKID, is_web_mercator};

static SERVICE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rest/services/(.*)/(?:MapServer|ImageServer)").expect("static regex is valid")
});

/// Extract the service name from an ArcGIS REST URL.
///
/// `http://example.com/arcgis/rest/services/myservice/mylayer/MapServer/?f=json`
/// yields `myservice/mylayer`. URLs that do not look like a MapServer or
/// ImageServer endpoint are returned unchanged.
#[must_use]
pub fn service_name(url: &str) -> &str {
    SERVICE_NAME
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map_or(url, |m| m.as_str())
}

/// Extent and spatial reference found in a service descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EsriExtent {
    /// Raw extent object, exactly as found in the descriptor.
    pub extent: Option<Value>,
    /// `extent.spatialReference.wkid`, when present and integral.
    pub wkid: Option<i64>,
}

impl EsriExtent {
    /// Read `xmin`, `ymin`, `xmax`, `ymax` from the extent.
    #[must_use]
    pub fn rectangle(&self) -> Option<BoundingBox> {
        let extent = self.extent.as_ref()?;
        let coord = |key: &str| extent.get(key).and_then(Value::as_f64);
        let rect = BoundingBox::new(
            coord("xmin")?,
            coord("ymin")?,
            coord("xmax")?,
            coord("ymax")?,
        );
        match rect {
            Ok(rect) => Some(rect),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring non-finite esri extent");
                None
            }
        }
    }

    /// The extent in geographic degrees.
    ///
    /// Web-Mercator extents are reprojected, WGS 84 extents are returned
    /// as-is, anything else yields `None`.
    #[must_use]
    pub fn geographic_bounds(&self) -> Option<BoundingBox> {
        let rect = self.rectangle()?;
        match self.wkid {
            Some(wkid) if is_web_mercator(wkid) => Some(rect.to_geographic()),
            Some(WGS84_WKID) => Some(rect),
            other => {
                tracing::debug!(wkid = ?other, "extent is not in a supported reference");
                None
            }
        }
    }
}

/// Find the extent of an ArcGIS service descriptor.
///
/// `fullExtent` is read first and `extent` second; when both exist the
/// `extent` value wins. The spatial reference is then looked up under
/// `spatialReference.wkid` of whichever extent was kept.
#[must_use]
pub fn extract_extent(descriptor: &Value) -> EsriExtent {
    let mut extent = None;

    match descriptor.get("fullExtent") {
        Some(value) => extent = Some(value.clone()),
        None => tracing::debug!("service descriptor has no fullExtent"),
    }
    match descriptor.get("extent") {
        Some(value) => extent = Some(value.clone()),
        None => tracing::debug!("service descriptor has no extent"),
    }

    let wkid = extent.as_ref().and_then(spatial_reference);
    EsriExtent { extent, wkid }
}

fn spatial_reference(extent: &Value) -> Option<i64> {
    let Some(raw) = extent.get("spatialReference").and_then(|sr| sr.get("wkid")) else {
        tracing::debug!("extent has no spatialReference.wkid");
        return None;
    };
    let wkid = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if wkid.is_none() {
        tracing::debug!(value = %raw, "malformed spatialReference.wkid");
    }
    wkid
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn should_extract_service_name_from_mapserver_url() {
        let url = "http://example.com/arcgis/rest/services/myservice/mylayer/MapServer/?f=json";
        assert_eq!(service_name(url), "myservice/mylayer");
    }

    #[test]
    fn should_extract_service_name_from_imageserver_url() {
        let url = "https://host/arcgis/rest/services/Elevation/ImageServer";
        assert_eq!(service_name(url), "Elevation");
    }

    #[test]
    fn should_return_url_when_not_an_esri_endpoint() {
        let url = "https://host/geoserver/ows";
        assert_eq!(service_name(url), url);
    }

    #[test]
    fn should_return_nothing_for_empty_descriptor() {
        assert_eq!(extract_extent(&json!({})), EsriExtent::default());
    }

    #[test]
    fn should_tolerate_non_object_descriptor() {
        assert_eq!(extract_extent(&json!([1, 2, 3])), EsriExtent::default());
        assert_eq!(extract_extent(&Value::Null), EsriExtent::default());
    }

    #[test]
    fn should_use_full_extent_when_alone() {
        let descriptor = json!({
            "fullExtent": {"xmin": 1, "spatialReference": {"wkid": 4326}}
        });
        let found = extract_extent(&descriptor);
        assert_eq!(found.extent, Some(descriptor["fullExtent"].clone()));
        assert_eq!(found.wkid, Some(4326));
    }

    #[test]
    fn should_prefer_extent_over_full_extent_when_both_present() {
        let descriptor = json!({
            "extent": {"xmin": 2, "spatialReference": {"wkid": 102100}},
            "fullExtent": {"xmin": 1, "spatialReference": {"wkid": 4326}},
        });
        let found = extract_extent(&descriptor);
        assert_eq!(found.extent, Some(descriptor["extent"].clone()));
        assert_eq!(found.wkid, Some(102_100));
    }

    #[test]
    fn should_leave_wkid_unset_when_spatial_reference_missing_or_malformed() {
        let missing = extract_extent(&json!({"extent": {"xmin": 0}}));
        assert!(missing.extent.is_some());
        assert_eq!(missing.wkid, None);

        let malformed = extract_extent(&json!({"extent": {"spatialReference": "4326"}}));
        assert_eq!(malformed.wkid, None);

        let not_an_object = extract_extent(&json!({"extent": 42}));
        assert_eq!(not_an_object.extent, Some(json!(42)));
        assert_eq!(not_an_object.wkid, None);
    }

    #[test]
    fn should_accept_numeric_string_wkid() {
        let found = extract_extent(&json!({"extent": {"spatialReference": {"wkid": "3857"}}}));
        assert_eq!(found.wkid, Some(3857));
    }

    #[test]
    fn should_reproject_web_mercator_extent() {
        let found = extract_extent(&json!({
            "extent": {
                "xmin": -20_037_508.34, "ymin": 0.0, "xmax": 20_037_508.34, "ymax": 0.0,
                "spatialReference": {"wkid": 102100}
            }
        }));
        let bounds = found.geographic_bounds().unwrap();
        assert!((bounds.minx + 180.0).abs() < 1e-9);
        assert!((bounds.maxx - 180.0).abs() < 1e-9);
    }

    #[test]
    fn should_keep_wgs84_extent_and_skip_unknown_reference() {
        let wgs84 = extract_extent(&json!({
            "extent": {"xmin": 1, "ymin": 2, "xmax": 3, "ymax": 4, "spatialReference": {"wkid": 4326}}
        }));
        assert_eq!(
            wgs84.geographic_bounds(),
            Some(BoundingBox::new(1.0, 2.0, 3.0, 4.0).unwrap())
        );

        let utm = extract_extent(&json!({
            "extent": {"xmin": 1, "ymin": 2, "xmax": 3, "ymax": 4, "spatialReference": {"wkid": 32633}}
        }));
        assert!(utm.rectangle().is_some());
        assert_eq!(utm.geographic_bounds(), None);
    }
}
