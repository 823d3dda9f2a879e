use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{Bson, DateTime as BsonDateTime, Document};
use mongodb::options::{ClientOptions, IndexOptions, WriteConcern};
use mongodb::{Client, Collection, IndexModel};
use tracing::{debug, info};

use regstat_types::{TimestampField, UpdateDocument};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::{StatsStore, UpsertOutcome};

/// Document field names shared by the selector and the merge groups.
mod field {
    pub const REPOSITORY_NAME: &str = "repository_name";
    pub const NUM_STARS: &str = "num_stars";
    pub const NUM_PUSHES: &str = "num_pushes";
    pub const NUM_PULLS: &str = "num_pulls";
    pub const ACTORS: &str = "actors";
}

/// MongoDB-backed statistics store.
///
/// One document per repository, guarded by a unique index on
/// `repository_name` that is provisioned at connection time. Writes use a
/// journaled write concern: an acknowledged upsert has reached stable
/// storage, not just server memory. Single-document updates are atomic on
/// the server, which is exactly the isolation the merge groups need.
#[derive(Debug)]
pub struct MongoStatsStore {
    collection: Collection<Document>,
}

impl MongoStatsStore {
    /// Connect to the configured database and provision the unique
    /// repository-name index.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        if config.database.is_empty() {
            return Err(StoreError::Config("database name must not be empty".into()));
        }
        if config.collection.is_empty() {
            return Err(StoreError::Config(
                "collection name must not be empty".into(),
            ));
        }

        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name.get_or_insert_with(|| "regstat".to_owned());
        options.write_concern = Some(WriteConcern::builder().journal(true).build());
        let client = Client::with_options(options)?;
        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);

        let store = Self { collection };
        store.ensure_index().await?;
        info!(
            database = %config.database,
            collection = %config.collection,
            "connected to statistics store"
        );
        Ok(store)
    }

    /// Unique index on the repository name: two concurrent inserts racing
    /// for a never-seen repository collapse to a single document instead of
    /// creating duplicates.
    async fn ensure_index(&self) -> StoreResult<()> {
        let mut keys = Document::new();
        keys.insert(field::REPOSITORY_NAME, 1i32);
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }
}

/// Selector uniquely identifying one repository's document.
fn selector(repository: &str) -> Document {
    let mut doc = Document::new();
    doc.insert(field::REPOSITORY_NAME, repository);
    doc
}

fn timestamps_document(entries: &[(TimestampField, DateTime<Utc>)]) -> Document {
    let mut doc = Document::new();
    for (field, ts) in entries {
        doc.insert(field.as_str(), Bson::DateTime(BsonDateTime::from_chrono(*ts)));
    }
    doc
}

/// Map the merge groups onto MongoDB update operators.
fn to_update_operators(update: &UpdateDocument) -> Document {
    let mut set = Document::new();
    set.insert(field::REPOSITORY_NAME, update.repository_name.as_str());

    let mut set_on_insert = timestamps_document(&update.on_insert.sentinels);
    set_on_insert.insert(field::NUM_STARS, update.on_insert.num_stars as i64);

    let mut add_to_set = Document::new();
    add_to_set.insert(field::ACTORS, update.actor.as_str());

    let mut inc = Document::new();
    inc.insert(field::NUM_PUSHES, update.push_increment as i64);
    inc.insert(field::NUM_PULLS, update.pull_increment as i64);

    let mut operators = Document::new();
    operators.insert("$set", set);
    operators.insert("$setOnInsert", set_on_insert);
    operators.insert("$min", timestamps_document(&update.mins));
    operators.insert("$max", timestamps_document(&update.maxs));
    operators.insert("$addToSet", add_to_set);
    operators.insert("$inc", inc);
    operators
}

#[async_trait]
impl StatsStore for MongoStatsStore {
    async fn upsert(&self, update: &UpdateDocument) -> StoreResult<UpsertOutcome> {
        let result = self
            .collection
            .update_one(
                selector(&update.repository_name),
                to_update_operators(update),
            )
            .upsert(true)
            .await?;
        debug!(
            repository = %update.repository_name,
            matched = result.matched_count,
            "upserted statistics document"
        );
        Ok(UpsertOutcome {
            matched_existing: result.matched_count > 0,
        })
    }

    async fn remove(&self, repository: &str) -> StoreResult<bool> {
        let result = self.collection.delete_one(selector(repository)).await?;
        debug!(
            repository,
            deleted = result.deleted_count,
            "removed statistics document"
        );
        Ok(result.deleted_count > 0)
    }
}
