//! `SQLite` implementation of [`ServiceRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use georeg_app::ports::ServiceRepository;
use georeg_domain::error::{GeoRegError, RegistrationError};
use georeg_domain::geometry::BoundingBox;
use georeg_domain::id::ServiceId;
use georeg_domain::service::Service;
use georeg_domain::service_type::ServiceType;
use georeg_domain::time;

use crate::error::{StorageError, decode_error};

/// Wrapper for converting database rows into domain [`Service`].
struct Wrapper(Service);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Service> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let base_url: String = row.try_get("base_url")?;
        let service_type: String = row.try_get("service_type")?;
        let title: String = row.try_get("title")?;
        let description: String = row.try_get("description")?;
        let abstract_text: String = row.try_get("abstract")?;
        let keywords: String = row.try_get("keywords")?;
        let username: Option<String> = row.try_get("username")?;
        let extent: Option<String> = row.try_get("extent")?;
        let created: String = row.try_get("created")?;

        let id = ServiceId::from_str(&id).map_err(decode_error)?;
        let keywords: Vec<String> = serde_json::from_str(&keywords).map_err(decode_error)?;
        let extent: Option<BoundingBox> = extent
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(decode_error)?;
        let created = time::parse_rfc3339(&created).map_err(decode_error)?;

        Ok(Self(Service {
            id,
            base_url,
            service_type: ServiceType::from(service_type),
            title,
            description,
            abstract_text,
            keywords,
            username,
            extent,
            created,
        }))
    }
}

const INSERT: &str = "INSERT INTO services (id, base_url, service_type, title, description, abstract, keywords, username, extent, created) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";
const EXISTS_BY_BASE_URL: &str = "SELECT EXISTS(SELECT 1 FROM services WHERE base_url = ?)";
const SELECT_BY_ID: &str = "SELECT * FROM services WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM services ORDER BY created DESC";
const UPDATE: &str = "UPDATE services SET title = ?, description = ?, abstract = ?, keywords = ?, extent = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM services WHERE id = ?";

/// `SQLite`-backed service repository.
pub struct SqliteServiceRepository {
    pool: SqlitePool,
}

impl SqliteServiceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn encode_extent(extent: Option<&BoundingBox>) -> Result<Option<String>, StorageError> {
    Ok(extent.map(serde_json::to_string).transpose()?)
}

impl ServiceRepository for SqliteServiceRepository {
    fn exists_by_base_url(
        &self,
        base_url: &str,
    ) -> impl Future<Output = Result<bool, GeoRegError>> + Send {
        let pool = self.pool.clone();
        let base_url = base_url.to_string();
        async move {
            let (exists,): (bool,) = sqlx::query_as(EXISTS_BY_BASE_URL)
                .bind(&base_url)
                .fetch_one(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(exists)
        }
    }

    fn create(
        &self,
        service: Service,
    ) -> impl Future<Output = Result<Service, GeoRegError>> + Send {
        let pool = self.pool.clone();
        async move {
            let keywords = serde_json::to_string(&service.keywords).map_err(StorageError::from)?;
            let extent = encode_extent(service.extent.as_ref())?;

            sqlx::query(INSERT)
                .bind(service.id.to_string())
                .bind(&service.base_url)
                .bind(service.service_type.as_str())
                .bind(&service.title)
                .bind(&service.description)
                .bind(&service.abstract_text)
                .bind(keywords)
                .bind(&service.username)
                .bind(extent)
                .bind(time::to_rfc3339(&service.created))
                .execute(&pool)
                .await
                .map_err(|err| match err {
                    // A concurrent registration won the race for this base URL.
                    sqlx::Error::Database(db) if db.is_unique_violation() => {
                        GeoRegError::from(RegistrationError::DuplicateService {
                            url: service.base_url.clone(),
                        })
                    }
                    other => StorageError::from(other).into(),
                })?;

            Ok(service)
        }
    }

    fn get_by_id(
        &self,
        id: ServiceId,
    ) -> impl Future<Output = Result<Option<Service>, GeoRegError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Service>, GeoRegError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(
        &self,
        service: Service,
    ) -> impl Future<Output = Result<Service, GeoRegError>> + Send {
        let pool = self.pool.clone();
        async move {
            let keywords = serde_json::to_string(&service.keywords).map_err(StorageError::from)?;
            let extent = encode_extent(service.extent.as_ref())?;

            sqlx::query(UPDATE)
                .bind(&service.title)
                .bind(&service.description)
                .bind(&service.abstract_text)
                .bind(keywords)
                .bind(extent)
                .bind(service.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(service)
        }
    }

    fn delete(&self, id: ServiceId) -> impl Future<Output = Result<(), GeoRegError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
