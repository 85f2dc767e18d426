//! Characteristic synchronization
//!
//! Decodes every characteristic in a container and persists the records
//! absent from the owning (product, packaging level) scope. Duplicate
//! detection runs on dedup fingerprints, never on store-assigned ids,
//! so a re-run against a partially populated store creates only the
//! records that are missing.

use crate::context::IngestContext;
use crate::db::{characteristics, products};
use crate::models::{CharacteristicOutcome, Element};
use crate::services::fingerprint::{fingerprint, Fingerprint};
use crate::services::value_decoder::decode_characteristic;
use spl_common::db::models::Characteristic;
use spl_common::{Result, SyncStrategy};
use std::collections::HashSet;

/// Persists deduplicated characteristic records per owner scope
#[derive(Debug, Default)]
pub struct CharacteristicSynchronizer;

impl CharacteristicSynchronizer {
    pub fn new() -> Self {
        Self
    }

    /// Synchronize every `<characteristic>` under `container` for
    /// `product_id`.
    ///
    /// `packaging` is the sibling packaging container, when the caller
    /// is inside one; its package code is matched against persisted
    /// packaging levels to scope the records. No match falls back to
    /// product scope with a diagnostic.
    pub async fn synchronize(
        &self,
        ctx: &IngestContext,
        container: &Element,
        product_id: i64,
        packaging: Option<&Element>,
    ) -> CharacteristicOutcome {
        let mut outcome = CharacteristicOutcome::default();

        let packaging_level_id =
            match self.resolve_packaging_scope(ctx, product_id, packaging).await {
                Ok(id) => id,
                Err(err) => {
                    tracing::error!(
                        session_id = %ctx.session_id,
                        product_id,
                        error = %err,
                        "Characteristic synchronization aborted"
                    );
                    outcome.errors.push(err.to_string());
                    return outcome;
                }
            };

        let result = match ctx.strategy {
            SyncStrategy::Incremental => {
                self.synchronize_incremental(ctx, container, product_id, packaging_level_id, &mut outcome)
                    .await
            }
            SyncStrategy::Batch => {
                self.synchronize_batch(ctx, container, product_id, packaging_level_id, &mut outcome)
                    .await
            }
        };

        if let Err(err) = result {
            tracing::error!(
                session_id = %ctx.session_id,
                product_id,
                error = %err,
                "Characteristic synchronization aborted"
            );
            outcome.errors.push(err.to_string());
        }

        outcome
    }

    /// Match the packaging container's package code against persisted
    /// packaging levels of the product
    async fn resolve_packaging_scope(
        &self,
        ctx: &IngestContext,
        product_id: i64,
        packaging: Option<&Element>,
    ) -> Result<Option<i64>> {
        let Some(packaging) = packaging else {
            return Ok(None);
        };

        let Some(code) = packaging.child("code").and_then(|c| c.attr("code")) else {
            tracing::warn!(
                session_id = %ctx.session_id,
                product_id,
                "Packaging container carries no package code, scoping characteristics to the product"
            );
            return Ok(None);
        };

        match products::find_packaging_level_by_code(&ctx.db, product_id, code).await? {
            Some(level) => Ok(level.id),
            None => {
                tracing::warn!(
                    session_id = %ctx.session_id,
                    product_id,
                    package_code = code,
                    "No persisted packaging level matches package code, scoping characteristics to the product"
                );
                Ok(None)
            }
        }
    }

    /// Every `<characteristic>` under the container, decoded and tagged
    /// with the owning scope, in document order
    fn decode_all(
        container: &Element,
        product_id: i64,
        packaging_level_id: Option<i64>,
    ) -> Vec<Characteristic> {
        let mut decoded = Vec::new();
        Self::collect(container, &mut decoded);
        for record in &mut decoded {
            record.product_id = product_id;
            record.packaging_level_id = packaging_level_id;
        }
        decoded
    }

    fn collect(element: &Element, out: &mut Vec<Characteristic>) {
        for child in &element.children {
            if child.name == "characteristic" {
                out.push(decode_characteristic(child));
            } else {
                Self::collect(child, out);
            }
        }
    }

    /// Scope-exact read, then one check-then-insert round trip per new
    /// record. The in-memory key set grows as records are added, so a
    /// duplicate within one pass never reaches the store.
    async fn synchronize_incremental(
        &self,
        ctx: &IngestContext,
        container: &Element,
        product_id: i64,
        packaging_level_id: Option<i64>,
        outcome: &mut CharacteristicOutcome,
    ) -> Result<()> {
        let existing =
            characteristics::find_by_scope(&ctx.db, product_id, packaging_level_id).await?;
        let mut seen: HashSet<Fingerprint> = existing.iter().map(fingerprint).collect();

        for record in Self::decode_all(container, product_id, packaging_level_id) {
            let key = fingerprint(&record);
            if seen.contains(&key) {
                outcome.records_skipped += 1;
                tracing::debug!(
                    session_id = %ctx.session_id,
                    product_id,
                    key = %key.canonical(),
                    "Duplicate characteristic skipped"
                );
                continue;
            }

            characteristics::insert_characteristic(&ctx.db, &record).await?;
            seen.insert(key);
            outcome.records_created += 1;
        }

        Ok(())
    }

    /// One product-wide read, one decode pass, one bulk insert of the
    /// complement set. Membership is keyed by scope and fingerprint
    /// because the read spans every packaging level.
    async fn synchronize_batch(
        &self,
        ctx: &IngestContext,
        container: &Element,
        product_id: i64,
        packaging_level_id: Option<i64>,
        outcome: &mut CharacteristicOutcome,
    ) -> Result<()> {
        let existing = characteristics::find_by_product(&ctx.db, product_id).await?;
        let mut seen: HashSet<(Option<i64>, Fingerprint)> = existing
            .iter()
            .map(|record| (record.packaging_level_id, fingerprint(record)))
            .collect();

        let mut missing: Vec<Characteristic> = Vec::new();
        for record in Self::decode_all(container, product_id, packaging_level_id) {
            let key = (record.packaging_level_id, fingerprint(&record));
            if seen.contains(&key) {
                outcome.records_skipped += 1;
                continue;
            }
            seen.insert(key);
            missing.push(record);
        }

        if missing.is_empty() {
            return Ok(());
        }

        characteristics::insert_characteristics(&ctx.db, &missing).await?;
        outcome.records_created += missing.len();

        tracing::debug!(
            session_id = %ctx.session_id,
            product_id,
            records_created = missing.len(),
            "Created characteristic records"
        );

        Ok(())
    }
}
