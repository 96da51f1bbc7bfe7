//! UUID-backed identifiers for persisted records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }

            /// Parse user input, reporting failures as a validation error.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::InvalidId`] when `value` is not a UUID.
            pub fn parse(value: &str) -> Result<Self, ValidationError> {
                value.parse().map_err(|_| ValidationError::InvalidId {
                    value: value.to_string(),
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifier of a registered remote [`Service`](crate::service::Service).
    ServiceId
);

define_id!(
    /// Identifier of a [`GeoApp`](crate::geoapp::GeoApp).
    GeoAppId
);
