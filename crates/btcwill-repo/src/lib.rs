use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use btcwill_codec::Codec;
use btcwill_core::{
    record::WillRecord,
    storage::{BlobStore, StoreError},
    wills::{StoredWill, WillDraft, WillNotFound, WillRepository, WillUpdate},
};
use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Will repository over any `BlobStore`. Each record section is sealed by the
/// codec before it reaches the store; one index blob is kept per owner.
pub struct CodecWillRepo<S: BlobStore> {
    store: Arc<S>,
    codec: Arc<Codec>,
}

impl<S: BlobStore> CodecWillRepo<S> {
    pub fn new(store: S, codec: Arc<Codec>) -> Self {
        Self {
            store: Arc::new(store),
            codec,
        }
    }

    async fn load(&self, owner: &str) -> Result<Vec<StoredWill>> {
        match self.store.get(&owner_key(owner)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(StoreError::NotFound { .. }) => Ok(Vec::new()),
            Err(err) => Err(anyhow::anyhow!(err.to_string())),
        }
    }

    async fn save(&self, owner: &str, wills: &[StoredWill]) -> Result<()> {
        let bytes = serde_json::to_vec(wills)?;
        self.store
            .put(&owner_key(owner), &bytes)
            .await
            .map_err(|e| anyhow::anyhow!(e.to_string()))
    }
}

fn owner_key(owner: &str) -> String {
    format!("wills/{owner}")
}

#[async_trait]
impl<S: BlobStore> WillRepository for CodecWillRepo<S> {
    #[instrument(skip(self, draft))]
    async fn create(&self, owner: &str, draft: WillDraft) -> Result<StoredWill> {
        let mut wills = self.load(owner).await?;
        let now = Utc::now();
        let will = StoredWill {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            title: draft.title_or_default(),
            status: Default::default(),
            personal_info: self.codec.encrypt(&draft.personal_info),
            bitcoin_assets: self.codec.encrypt(&draft.bitcoin_assets),
            beneficiaries: self.codec.encrypt(&draft.beneficiaries),
            instructions: self.codec.encrypt(&draft.instructions),
            created_at: now,
            updated_at: now,
        };
        wills.push(will.clone());
        self.save(owner, &wills).await?;
        debug!(id = %will.id, "created will");
        Ok(will)
    }

    #[instrument(skip(self))]
    async fn list(&self, owner: &str) -> Result<Vec<StoredWill>> {
        let mut wills = self.load(owner).await?;
        wills.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(wills)
    }

    #[instrument(skip(self))]
    async fn get(&self, owner: &str, id: Uuid) -> Result<StoredWill> {
        self.load(owner)
            .await?
            .into_iter()
            .find(|will| will.id == id)
            .ok_or_else(|| WillNotFound { id }.into())
    }

    #[instrument(skip(self))]
    async fn open(&self, owner: &str, id: Uuid) -> Result<WillRecord> {
        let will = self.get(owner, id).await?;
        Ok(WillRecord::from_sections(
            self.codec.decrypt(&will.personal_info),
            self.codec.decrypt(&will.bitcoin_assets),
            self.codec.decrypt(&will.beneficiaries),
            self.codec.decrypt(&will.instructions),
            will.status,
        ))
    }

    #[instrument(skip(self, update))]
    async fn update(&self, owner: &str, id: Uuid, update: WillUpdate) -> Result<StoredWill> {
        let mut wills = self.load(owner).await?;
        let will = wills
            .iter_mut()
            .find(|will| will.id == id)
            .ok_or(WillNotFound { id })?;

        if let Some(title) = update.title {
            will.title = title;
        }
        if let Some(status) = update.status {
            will.status = status;
        }
        // Present sections replace the stored blob wholesale.
        if let Some(section) = update.personal_info {
            will.personal_info = self.codec.encrypt(&section);
        }
        if let Some(section) = update.bitcoin_assets {
            will.bitcoin_assets = self.codec.encrypt(&section);
        }
        if let Some(section) = update.beneficiaries {
            will.beneficiaries = self.codec.encrypt(&section);
        }
        if let Some(section) = update.instructions {
            will.instructions = self.codec.encrypt(&section);
        }
        will.updated_at = Utc::now();

        let updated = will.clone();
        self.save(owner, &wills).await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, owner: &str, id: Uuid) -> Result<()> {
        let mut wills = self.load(owner).await?;
        let before = wills.len();
        wills.retain(|will| will.id != id);
        if wills.len() == before {
            return Err(WillNotFound { id }.into());
        }
        self.save(owner, &wills).await
    }
}
