//! `SQLite` implementation of [`GeoAppRepository`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use georeg_app::ports::GeoAppRepository;
use georeg_domain::error::GeoRegError;
use georeg_domain::geoapp::GeoApp;
use georeg_domain::geometry::BoundingBox;
use georeg_domain::id::GeoAppId;
use georeg_domain::time;

use crate::error::{StorageError, decode_error};

struct Wrapper(GeoApp);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<GeoApp> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        let resource_type: String = row.try_get("resource_type")?;
        let owner: String = row.try_get("owner")?;
        let abstract_text: Option<String> = row.try_get("abstract")?;
        let data: String = row.try_get("data")?;
        let extent: Option<String> = row.try_get("extent")?;
        let created: String = row.try_get("created")?;

        let id = GeoAppId::from_str(&id).map_err(decode_error)?;
        let data: serde_json::Value = serde_json::from_str(&data).map_err(decode_error)?;
        let extent: Option<BoundingBox> = extent
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(decode_error)?;
        let created = time::parse_rfc3339(&created).map_err(decode_error)?;

        Ok(Self(GeoApp {
            id,
            title,
            resource_type,
            owner,
            abstract_text,
            data,
            extent,
            created,
        }))
    }
}

const INSERT: &str = "INSERT INTO geoapps (id, title, resource_type, owner, abstract, data, extent, created) VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM geoapps WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM geoapps ORDER BY created DESC";
const UPDATE: &str = "UPDATE geoapps SET title = ?, resource_type = ?, abstract = ?, data = ?, extent = ? WHERE id = ?";

/// `SQLite`-backed geoapp repository.
pub struct SqliteGeoAppRepository {
    pool: SqlitePool,
}

impl SqliteGeoAppRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// JSON columns for `data` and `extent`.
fn encode_json(app: &GeoApp) -> Result<(String, Option<String>), StorageError> {
    let data = serde_json::to_string(&app.data)?;
    let extent = app.extent.as_ref().map(serde_json::to_string).transpose()?;
    Ok((data, extent))
}

impl GeoAppRepository for SqliteGeoAppRepository {
    fn create(&self, app: GeoApp) -> impl Future<Output = Result<GeoApp, GeoRegError>> + Send {
        let pool = self.pool.clone();
        async move {
            let (data, extent) = encode_json(&app)?;

            sqlx::query(INSERT)
                .bind(app.id.to_string())
                .bind(&app.title)
                .bind(&app.resource_type)
                .bind(&app.owner)
                .bind(&app.abstract_text)
                .bind(data)
                .bind(extent)
                .bind(time::to_rfc3339(&app.created))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(app)
        }
    }

    fn get_by_id(
        &self,
        id: GeoAppId,
    ) -> impl Future<Output = Result<Option<GeoApp>, GeoRegError>> + Send {
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

    fn get_all(&self) -> impl Future<Output = Result<Vec<GeoApp>, GeoRegError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn update(&self, app: GeoApp) -> impl Future<Output = Result<GeoApp, GeoRegError>> + Send {
        let pool = self.pool.clone();
        async move {
            let (data, extent) = encode_json(&app)?;

            sqlx::query(UPDATE)
                .bind(&app.title)
                .bind(&app.resource_type)
                .bind(&app.abstract_text)
                .bind(data)
                .bind(extent)
                .bind(app.id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(app)
        }
    }
}

#[cfg(test)]
mod tests {
    use georeg_domain::time::TimeDelta;

    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteGeoAppRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteGeoAppRepository::new(db.pool().clone())
    }

    fn test_geoapp(title: &str) -> GeoApp {
        GeoApp::builder()
            .title(title)
            .owner("alice")
            .data(serde_json::json!({"sections": [{"type": "title"}]}))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_geoapp_when_valid() {
        let repo = setup().await;
        let app = GeoApp::builder()
            .title("Story")
            .owner("alice")
            .abstract_text("About rivers")
            .data(serde_json::json!({"zoom": 4}))
            .extent(BoundingBox::new(0.0, 40.0, 10.0, 50.0).unwrap())
            .build()
            .unwrap();
        let id = app.id;

        repo.create(app.clone()).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Story");
        assert_eq!(fetched.resource_type, "geostory");
        assert_eq!(fetched.owner, "alice");
        assert_eq!(fetched.abstract_text.as_deref(), Some("About rivers"));
        assert_eq!(fetched.data, serde_json::json!({"zoom": 4}));
        assert_eq!(fetched.extent, app.extent);
    }

    #[tokio::test]
    async fn should_return_none_when_geoapp_not_found() {
        let repo = setup().await;
        assert!(repo.get_by_id(GeoAppId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_list_geoapps_newest_first() {
        let repo = setup().await;
        let mut older = test_geoapp("older");
        older.created -= TimeDelta::seconds(60);
        repo.create(older).await.unwrap();
        repo.create(test_geoapp("newer")).await.unwrap();

        let all = repo.get_all().await.unwrap();
        let titles: Vec<&str> = all.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn should_update_geoapp_when_exists() {
        let repo = setup().await;
        let mut app = test_geoapp("Story");
        let id = app.id;
        repo.create(app.clone()).await.unwrap();

        app.title = "Edited".to_string();
        app.data = serde_json::json!({"sections": []});
        repo.update(app).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Edited");
        assert_eq!(fetched.data, serde_json::json!({"sections": []}));
        assert_eq!(fetched.owner, "alice");
    }
}
