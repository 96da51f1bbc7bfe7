//! Service registration validator.
//!
//! Validates a proposed remote-service registration in a single pass:
//!
//! 1. the base URL must not already be registered,
//! 2. the handler factory must resolve the endpoint,
//! 3. the resolved handler must answer its probe,
//! 4. unless the declared type is `AUTO` or `OWS`, the detected type must
//!    equal the declared one.
//!
//! On success the detected type (which corrects a wildcard declaration) and
//! the handler are handed back for persistence.

use georeg_domain::error::{GeoRegError, RegistrationError};
use georeg_domain::service::RegistrationRequest;
use georeg_domain::service_type::ServiceType;

use crate::ports::{Credentials, ServiceHandler, ServiceHandlerFactory, ServiceRepository};

/// Outcome of a successful validation.
#[derive(Debug)]
pub struct ValidatedRegistration<H> {
    pub request: RegistrationRequest,
    /// Detected concrete type of the endpoint.
    pub service_type: ServiceType,
    pub handler: H,
}

/// Run the registration checks against `repo` and `factory`.
///
/// `request` is expected to be cleaned already (see
/// [`RegistrationRequest::clean`]).
///
/// # Errors
///
/// - [`RegistrationError::DuplicateService`] when the URL is registered,
/// - [`RegistrationError::Connection`] when resolution or the probe fails,
/// - [`RegistrationError::TypeMismatch`] when the detected type differs from
///   a concrete declared type,
/// - a storage error from the repository.
#[tracing::instrument(skip_all, fields(url = %request.url, declared = %request.service_type))]
pub async fn validate_registration<R, F>(
    repo: &R,
    factory: &F,
    request: RegistrationRequest,
) -> Result<ValidatedRegistration<F::Handler>, GeoRegError>
where
    R: ServiceRepository,
    F: ServiceHandlerFactory,
{
    let url = request.url.clone();

    if repo.exists_by_base_url(&url).await? {
        return Err(RegistrationError::DuplicateService { url }.into());
    }

    let credentials = Credentials::new(request.username.clone(), request.password.clone());
    let handler = match factory
        .resolve(&url, &request.service_type, &credentials)
        .await
    {
        Ok(handler) => handler,
        Err(err) => {
            tracing::error!(error = %err, "service handler resolution failed");
            return Err(RegistrationError::Connection { url }.into());
        }
    };

    if !handler.probe().await {
        tracing::warn!("service did not answer the probe");
        return Err(RegistrationError::Connection { url }.into());
    }

    let detected = handler.service_type();
    if !request.service_type.is_wildcard() && detected != request.service_type {
        return Err(RegistrationError::TypeMismatch {
            url,
            expected: request.service_type,
            found: detected,
        }
        .into());
    }

    tracing::debug!(detected = %detected, "service registration validated");
    Ok(ValidatedRegistration {
        request,
        service_type: detected,
        handler,
    })
}
