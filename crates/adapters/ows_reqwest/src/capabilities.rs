//! OGC `GetCapabilities` documents (WMS, WFS, CSW).
//!
//! Only the service-level metadata is read: title, abstract, keywords and
//! the first geographic bounding box advertised anywhere in the document.

use georeg_domain::geometry::BoundingBox;
use georeg_domain::service::ServiceDescription;
use roxmltree::{Document, Node};

use crate::error::OwsError;

/// OGC protocol a capabilities document is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Wms,
    Wfs,
    Csw,
}

impl Protocol {
    /// Value of the `service` query parameter.
    #[must_use]
    pub fn service_param(self) -> &'static str {
        match self {
            Self::Wms => "WMS",
            Self::Wfs => "WFS",
            Self::Csw => "CSW",
        }
    }

    fn accepts(self, root: Node<'_, '_>) -> bool {
        let name = root.tag_name();
        match self {
            Self::Wms => matches!(name.name(), "WMS_Capabilities" | "WMT_MS_Capabilities"),
            Self::Wfs => name.name() == "WFS_Capabilities",
            Self::Csw => {
                name.name() == "Capabilities"
                    && name.namespace().is_some_and(|ns| ns.contains("/cat/csw"))
            }
        }
    }
}

/// Parse `body` as a capabilities document for `protocol`.
///
/// # Errors
///
/// Returns [`OwsError::Xml`] for malformed XML and [`OwsError::Unexpected`]
/// when the root element belongs to another protocol, including OGC
/// exception reports.
pub fn parse(protocol: Protocol, body: &str) -> Result<ServiceDescription, OwsError> {
    let doc = Document::parse(body)?;
    let root = doc.root_element();
    if !protocol.accepts(root) {
        return Err(OwsError::Unexpected {
            expected: protocol.service_param(),
        });
    }

    let service = root
        .children()
        .find(|n| matches!(n.tag_name().name(), "Service" | "ServiceIdentification"));

    Ok(ServiceDescription {
        title: service.and_then(|s| child_text(s, "Title")),
        abstract_text: service.and_then(|s| child_text(s, "Abstract")),
        keywords: service.map(keywords).unwrap_or_default(),
        extent: geographic_extent(root),
    })
}

fn child_text(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|n| n.tag_name().name() == name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn keywords(service: Node<'_, '_>) -> Vec<String> {
    service
        .descendants()
        .filter(|n| n.tag_name().name() == "Keyword")
        .filter_map(|n| n.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect()
}

fn geographic_extent(root: Node<'_, '_>) -> Option<BoundingBox> {
    root.descendants().find_map(|node| match node.tag_name().name() {
        "EX_GeographicBoundingBox" => {
            let coord = |name: &str| child_text(node, name)?.parse::<f64>().ok();
            BoundingBox::new(
                coord("westBoundLongitude")?,
                coord("southBoundLatitude")?,
                coord("eastBoundLongitude")?,
                coord("northBoundLatitude")?,
            )
            .ok()
        }
        "LatLonBoundingBox" => {
            let coord = |name: &str| node.attribute(name)?.trim().parse::<f64>().ok();
            BoundingBox::new(
                coord("minx")?,
                coord("miny")?,
                coord("maxx")?,
                coord("maxy")?,
            )
            .ok()
        }
        "WGS84BoundingBox" => {
            let lower = corner(child_text(node, "LowerCorner")?.as_str())?;
            let upper = corner(child_text(node, "UpperCorner")?.as_str())?;
            BoundingBox::new(lower.0, lower.1, upper.0, upper.1).ok()
        }
        _ => None,
    })
}

/// `"lon lat"` pair from an OWS corner element.
fn corner(value: &str) -> Option<(f64, f64)> {
    let mut parts = value.split_whitespace().map(str::parse::<f64>);
    let lon = parts.next()?.ok()?;
    let lat = parts.next()?.ok()?;
    Some((lon, lat))
}
