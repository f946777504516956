//! Local session store: typed, versioned values persisted in SQLite.
//!
//! Each stored value is addressed by a [`SessionKey`] that fixes its name,
//! its Rust type and its schema version. A row written under another version
//! reads back as absent.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::models::{CertificateData, Role, User};

pub trait SessionKey {
    const NAME: &'static str;
    const VERSION: i64;
    type Value: Serialize + DeserializeOwned;
}

pub struct UserIdKey;
pub struct UserNameKey;
pub struct UserRoleKey;
pub struct CertificateKey;
pub struct MaterialRatingsKey;

impl SessionKey for UserIdKey {
    const NAME: &'static str = "user_id";
    const VERSION: i64 = 1;
    type Value = i64;
}

impl SessionKey for UserNameKey {
    const NAME: &'static str = "user_name";
    const VERSION: i64 = 1;
    type Value = String;
}

impl SessionKey for UserRoleKey {
    const NAME: &'static str = "user_role";
    const VERSION: i64 = 1;
    type Value = Role;
}

impl SessionKey for CertificateKey {
    const NAME: &'static str = "certificate";
    const VERSION: i64 = 1;
    type Value = CertificateData;
}

impl SessionKey for MaterialRatingsKey {
    const NAME: &'static str = "material_ratings";
    const VERSION: i64 = 1;
    type Value = BTreeMap<i64, u8>;
}

pub const MAX_STARS: u8 = 5;

#[derive(Clone)]
pub struct SessionStore {
    db: SqlitePool,
}

impl SessionStore {
    pub async fn open(url: &str) -> Result<Self, ClientError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&db).await?;
        info!("session store opened at {}", url);

        Ok(Self { db })
    }

    pub async fn in_memory() -> Result<Self, ClientError> {
        Self::open("sqlite::memory:").await
    }

    pub async fn close(self) {
        self.db.close().await;
    }

    pub async fn get<K: SessionKey>(&self) -> Result<Option<K::Value>, ClientError> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT version, value FROM session_values WHERE key = ?1")
                .bind(K::NAME)
                .fetch_optional(&self.db)
                .await?;

        let Some((version, raw)) = row else {
            return Ok(None);
        };

        if version != K::VERSION {
            warn!(
                "ignoring {} stored with schema v{} (expected v{})",
                K::NAME,
                version,
                K::VERSION
            );
            return Ok(None);
        }

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("ignoring unreadable {}: {}", K::NAME, e);
                Ok(None)
            }
        }
    }

    pub async fn set<K: SessionKey>(&self, value: &K::Value) -> Result<(), ClientError> {
        let raw = serde_json::to_string(value).map_err(|e| ClientError::Decode(e.to_string()))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO session_values (key, version, value, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(key) DO UPDATE SET
                version = excluded.version,
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(K::NAME)
        .bind(K::VERSION)
        .bind(&raw)
        .bind(&now)
        .execute(&self.db)
        .await?;

        debug!("stored {}", K::NAME);
        Ok(())
    }

    pub async fn remove<K: SessionKey>(&self) -> Result<(), ClientError> {
        sqlx::query("DELETE FROM session_values WHERE key = ?1")
            .bind(K::NAME)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    /// Remembers who is signed in.
    pub async fn sign_in(&self, user: &User) -> Result<(), ClientError> {
        self.set::<UserIdKey>(&user.id).await?;
        self.set::<UserNameKey>(&user.full_name).await?;
        self.set::<UserRoleKey>(&user.user_type).await?;
        info!("signed in as {} ({})", user.full_name, user.user_type);
        Ok(())
    }

    /// Forgets the identity and the certificate snapshot. Ratings stay.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        self.remove::<UserIdKey>().await?;
        self.remove::<UserNameKey>().await?;
        self.remove::<UserRoleKey>().await?;
        self.remove::<CertificateKey>().await?;
        info!("signed out");
        Ok(())
    }

    pub async fn user_id(&self) -> Result<Option<i64>, ClientError> {
        self.get::<UserIdKey>().await
    }

    pub async fn user_name(&self) -> Result<Option<String>, ClientError> {
        self.get::<UserNameKey>().await
    }

    pub async fn role(&self) -> Result<Option<Role>, ClientError> {
        self.get::<UserRoleKey>().await
    }

    pub async fn ratings(&self) -> Result<BTreeMap<i64, u8>, ClientError> {
        Ok(self.get::<MaterialRatingsKey>().await?.unwrap_or_default())
    }

    pub async fn material_rating(&self, material_id: i64) -> Result<Option<u8>, ClientError> {
        Ok(self.ratings().await?.get(&material_id).copied())
    }

    pub async fn rate_material(&self, material_id: i64, stars: u8) -> Result<(), ClientError> {
        if !(1..=MAX_STARS).contains(&stars) {
            return Err(ClientError::validation(format!(
                "Rating must be between 1 and {} stars.",
                MAX_STARS
            )));
        }
        let mut ratings = self.ratings().await?;
        ratings.insert(material_id, stars);
        self.set::<MaterialRatingsKey>(&ratings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RatingsV2;

    impl SessionKey for RatingsV2 {
        const NAME: &'static str = "material_ratings";
        const VERSION: i64 = 2;
        type Value = Vec<(i64, u8)>;
    }

    #[tokio::test]
    async fn values_round_trip_by_key() {
        let store = SessionStore::in_memory().await.unwrap();
        assert_eq!(store.user_id().await.unwrap(), None);

        store.set::<UserIdKey>(&42).await.unwrap();
        store.set::<UserRoleKey>(&Role::Teacher).await.unwrap();
        assert_eq!(store.user_id().await.unwrap(), Some(42));
        assert_eq!(store.role().await.unwrap(), Some(Role::Teacher));

        store.remove::<UserIdKey>().await.unwrap();
        assert_eq!(store.user_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn other_schema_versions_read_as_absent() {
        let store = SessionStore::in_memory().await.unwrap();
        store.set::<RatingsV2>(&vec![(1, 4)]).await.unwrap();
        assert_eq!(store.get::<MaterialRatingsKey>().await.unwrap(), None);
        assert!(store.ratings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ratings_outside_one_to_five_are_rejected() {
        let store = SessionStore::in_memory().await.unwrap();
        assert!(matches!(
            store.rate_material(1, 0).await,
            Err(ClientError::Validation(_))
        ));
        assert!(store.rate_material(1, 6).await.is_err());
        store.rate_material(1, 5).await.unwrap();
        assert_eq!(store.material_rating(1).await.unwrap(), Some(5));
    }
}
