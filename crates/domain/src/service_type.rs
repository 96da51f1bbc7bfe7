//! Remote service types and the provider table that declares them.
//!
//! Service types are contributed by *providers*: named functions compiled
//! into the binary that return a mapping `type key → descriptor`. The
//! operator picks which providers to enable by name in the configuration and
//! [`load_service_types`] merges their mappings in order, later providers
//! overriding earlier ones on the same key.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of remote geospatial service.
///
/// [`Auto`](Self::Auto) and [`Ows`](Self::Ows) are wildcards asking for
/// detection; every other variant is a concrete protocol. Keys contributed by
/// providers that this crate does not know are kept as [`Other`](Self::Other).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceType {
    Auto,
    Ows,
    Wms,
    GnWms,
    Wfs,
    Csw,
    RestMap,
    RestImg,
    Other(String),
}

impl ServiceType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Auto => "AUTO",
            Self::Ows => "OWS",
            Self::Wms => "WMS",
            Self::GnWms => "GN_WMS",
            Self::Wfs => "WFS",
            Self::Csw => "CSW",
            Self::RestMap => "REST_MAP",
            Self::RestImg => "REST_IMG",
            Self::Other(key) => key,
        }
    }

    /// Whether this type asks for detection rather than naming a protocol.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Auto | Self::Ows)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "AUTO" => Self::Auto,
            "OWS" => Self::Ows,
            "WMS" => Self::Wms,
            "GN_WMS" => Self::GnWms,
            "WFS" => Self::Wfs,
            "CSW" => Self::Csw,
            "REST_MAP" => Self::RestMap,
            "REST_IMG" => Self::RestImg,
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<String> for ServiceType {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(parsed) => parsed,
            Err(never) => match never {},
        }
    }
}

impl From<ServiceType> for String {
    fn from(value: ServiceType) -> Self {
        match value {
            ServiceType::Other(key) => key,
            known => known.as_str().to_string(),
        }
    }
}

/// What the registry knows about a service type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTypeDescriptor {
    /// Human-readable label shown to users choosing a type.
    pub label: String,
    /// Part of the OWS family probed when the declared type is `OWS`.
    #[serde(default)]
    pub ows: bool,
}

impl ServiceTypeDescriptor {
    #[must_use]
    pub fn new(label: impl Into<String>, ows: bool) -> Self {
        Self {
            label: label.into(),
            ows,
        }
    }
}

/// Merged registry of available service types.
pub type ServiceTypeMap = BTreeMap<ServiceType, ServiceTypeDescriptor>;

/// A named, statically compiled source of service types.
pub type Provider = fn() -> ServiceTypeMap;

/// Errors raised while assembling the service-type registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceTypeError {
    /// The configuration names a provider that is not compiled in.
    #[error("unknown service type provider {name:?}")]
    UnknownProvider { name: String },
}

/// Lookup table from provider name to provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderTable {
    providers: BTreeMap<String, Provider>,
}

impl ProviderTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The providers shipped with georeg: `core` and `ogc`.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .with("core", core_service_types)
            .with("ogc", ogc_service_types)
    }

    /// Register `provider` under `name`, replacing any previous entry.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, provider: Provider) -> Self {
        self.providers.insert(name.into(), provider);
        self
    }

    /// Names of all registered providers.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    fn resolve(&self, name: &str) -> Result<Provider, ServiceTypeError> {
        self.providers
            .get(name)
            .copied()
            .ok_or_else(|| ServiceTypeError::UnknownProvider {
                name: name.to_string(),
            })
    }
}

/// Merge the mappings of the named providers, in order.
///
/// # Errors
///
/// Returns [`ServiceTypeError::UnknownProvider`] for the first name that is
/// not in `table`. Nothing is merged in that case.
pub fn load_service_types<S: AsRef<str>>(
    modules: &[S],
    table: &ProviderTable,
) -> Result<ServiceTypeMap, ServiceTypeError> {
    let providers = modules
        .iter()
        .map(|name| table.resolve(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut merged = ServiceTypeMap::new();
    for provider in providers {
        merged.extend(provider());
    }
    Ok(merged)
}

/// Built-in types merged with the configured providers.
///
/// # Errors
///
/// Propagates [`ServiceTypeError`] from [`load_service_types`].
pub fn available_service_types<S: AsRef<str>>(
    modules: &[S],
    table: &ProviderTable,
) -> Result<ServiceTypeMap, ServiceTypeError> {
    let mut types = core_service_types();
    types.extend(load_service_types(modules, table)?);
    Ok(types)
}

/// Default service types, always available.
#[must_use]
pub fn core_service_types() -> ServiceTypeMap {
    ServiceTypeMap::from([
        (
            ServiceType::Auto,
            ServiceTypeDescriptor::new("Auto-detect", false),
        ),
        (
            ServiceType::Ows,
            ServiceTypeDescriptor::new("Paired WMS/WFS/WCS", false),
        ),
        (
            ServiceType::Wms,
            ServiceTypeDescriptor::new("Web Map Service", true),
        ),
        (
            ServiceType::GnWms,
            ServiceTypeDescriptor::new("GeoNode (Web Map Service)", true),
        ),
        (
            ServiceType::RestMap,
            ServiceTypeDescriptor::new("ArcGIS REST MapServer", false),
        ),
        (
            ServiceType::RestImg,
            ServiceTypeDescriptor::new("ArcGIS REST ImageServer", false),
        ),
    ])
}

/// Additional OGC protocols.
#[must_use]
pub fn ogc_service_types() -> ServiceTypeMap {
    ServiceTypeMap::from([
        (
            ServiceType::Wfs,
            ServiceTypeDescriptor::new("Web Feature Service", true),
        ),
        (
            ServiceType::Csw,
            ServiceTypeDescriptor::new("Catalogue Service", false),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first() -> ServiceTypeMap {
        ServiceTypeMap::from([
            (ServiceType::Wms, ServiceTypeDescriptor::new("First WMS", true)),
            (
                ServiceType::Other("TMS".to_string()),
                ServiceTypeDescriptor::new("Tile Map Service", false),
            ),
        ])
    }

    fn second() -> ServiceTypeMap {
        ServiceTypeMap::from([(
            ServiceType::Wms,
            ServiceTypeDescriptor::new("Second WMS", true),
        )])
    }

    fn table() -> ProviderTable {
        ProviderTable::new()
            .with("first", first)
            .with("second", second)
    }

    #[test]
    fn should_return_empty_map_when_no_modules_configured() {
        let merged = load_service_types::<&str>(&[], &table()).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn should_let_later_provider_override_earlier_key() {
        let merged = load_service_types(&["first", "second"], &table()).unwrap();
        assert_eq!(merged[&ServiceType::Wms].label, "Second WMS");
        assert_eq!(
            merged[&ServiceType::Other("TMS".to_string())].label,
            "Tile Map Service"
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn should_respect_configured_order() {
        let merged = load_service_types(&["second", "first"], &table()).unwrap();
        assert_eq!(merged[&ServiceType::Wms].label, "First WMS");
    }

    #[test]
    fn should_fail_on_unknown_provider() {
        let result = load_service_types(&["first", "missing"], &table());
        assert_eq!(
            result,
            Err(ServiceTypeError::UnknownProvider {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn should_include_core_types_in_available_types() {
        let types = available_service_types::<&str>(&[], &ProviderTable::builtin()).unwrap();
        assert!(types.contains_key(&ServiceType::Auto));
        assert!(types.contains_key(&ServiceType::RestImg));
        assert!(!types.contains_key(&ServiceType::Wfs));
    }

    #[test]
    fn should_add_ogc_types_when_enabled() {
        let types = available_service_types(&["ogc"], &ProviderTable::builtin()).unwrap();
        assert!(types[&ServiceType::Wfs].ows);
        assert_eq!(types[&ServiceType::Csw].label, "Catalogue Service");
    }

    #[test]
    fn should_roundtrip_known_and_custom_keys_through_strings() {
        assert_eq!("GN_WMS".parse::<ServiceType>().unwrap(), ServiceType::GnWms);
        let custom: ServiceType = "HGL".parse().unwrap();
        assert_eq!(custom, ServiceType::Other("HGL".to_string()));
        assert_eq!(String::from(custom), "HGL");
    }

    #[test]
    fn should_serialize_registry_keys_as_strings() {
        let json = serde_json::to_value(core_service_types()).unwrap();
        assert_eq!(json["REST_MAP"]["label"], "ArcGIS REST MapServer");
        assert_eq!(json["WMS"]["ows"], true);
    }

    #[test]
    fn should_flag_only_auto_and_ows_as_wildcards() {
        assert!(ServiceType::Auto.is_wildcard());
        assert!(ServiceType::Ows.is_wildcard());
        assert!(!ServiceType::Wms.is_wildcard());
    }
}
