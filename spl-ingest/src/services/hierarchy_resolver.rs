//! Section hierarchy resolution
//!
//! Walks a parent section's immediate children, delegates child-node
//! resolution to the content parser, and synchronizes parent-to-child
//! edges against the store. Two strategies share one contract: identical
//! final edge sets for identical input, and re-runs create only the
//! edges that are missing.
//!
//! Incremental resolves one child per iteration (roughly 3N round trips
//! for N children); Batch resolves the subtree once and settles all
//! edges with a constant number of bulk calls.

use crate::context::IngestContext;
use crate::db::{hierarchy, sections};
use crate::models::{Element, HierarchyOutcome};
use crate::parser::{section_natural_key, SectionContentParser};
use spl_common::db::models::{Section, SectionHierarchy};
use spl_common::{Error, Result, SyncStrategy};
use std::collections::HashSet;

/// Resolves parent-to-child section edges against the store
#[derive(Debug, Default)]
pub struct HierarchyResolver;

impl HierarchyResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve all immediate children of `parent` found in `element` and
    /// synchronize their hierarchy edges.
    ///
    /// A store failure aborts this call and surfaces in the outcome's
    /// error list; a per-child resolution failure skips only that child.
    pub async fn resolve_hierarchy(
        &self,
        ctx: &IngestContext,
        parent: &Section,
        element: &Element,
        parser: &dyn SectionContentParser,
    ) -> HierarchyOutcome {
        let mut outcome = HierarchyOutcome::default();

        let Some(parent_id) = parent.id else {
            let err = Error::MissingContext(format!(
                "parent section '{}' has no persisted id",
                parent.natural_key
            ));
            tracing::warn!(
                session_id = %ctx.session_id,
                error = %err,
                "Hierarchy resolution aborted"
            );
            outcome.errors.push(err.to_string());
            return outcome;
        };

        let result = match ctx.strategy {
            SyncStrategy::Incremental => {
                self.resolve_incremental(ctx, parent_id, element, parser, &mut outcome)
                    .await
            }
            SyncStrategy::Batch => {
                self.resolve_batch(ctx, parent_id, element, parser, &mut outcome)
                    .await
            }
        };

        if let Err(err) = result {
            tracing::error!(
                session_id = %ctx.session_id,
                parent_section_id = parent_id,
                error = %err,
                "Hierarchy resolution aborted"
            );
            outcome.errors.push(err.to_string());
        }

        outcome
    }

    /// Immediate child section elements of a section (or body) container,
    /// in document order
    fn child_sections(element: &Element) -> Vec<&Element> {
        element
            .children_named("component")
            .filter_map(|component| component.child("section"))
            .collect()
    }

    /// Per-child round trips: resolve the child subtree, look the node
    /// back up by natural key, then check-then-insert its edge.
    async fn resolve_incremental(
        &self,
        ctx: &IngestContext,
        parent_id: i64,
        element: &Element,
        parser: &dyn SectionContentParser,
        outcome: &mut HierarchyOutcome,
    ) -> Result<()> {
        let mut created: i64 = 0;

        for child_element in Self::child_sections(element) {
            let child = match parser.resolve_child_section(ctx, child_element).await {
                Ok(Some(child)) => child,
                Ok(None) => {
                    let label = section_natural_key(child_element)
                        .unwrap_or_else(|| "<no id>".to_string());
                    outcome.children_failed += 1;
                    outcome
                        .errors
                        .push(format!("child section '{}' did not resolve", label));
                    tracing::warn!(
                        session_id = %ctx.session_id,
                        child = %label,
                        "Child section did not resolve, skipping edge"
                    );
                    continue;
                }
                Err(err) => {
                    outcome.children_failed += 1;
                    outcome
                        .errors
                        .push(format!("child section resolution failed: {}", err));
                    tracing::warn!(
                        session_id = %ctx.session_id,
                        error = %err,
                        "Child section resolution failed, skipping edge"
                    );
                    continue;
                }
            };

            // The store id is authoritative, not whatever the parser
            // handed back: re-read the child by natural key.
            let persisted =
                sections::find_by_natural_key(&ctx.db, ctx.document_id, &child.natural_key)
                    .await?;
            let Some(child_id) = persisted.and_then(|s| s.id) else {
                outcome.children_failed += 1;
                outcome.errors.push(format!(
                    "child section '{}' missing from store after resolution",
                    child.natural_key
                ));
                continue;
            };

            if hierarchy::find_edge(&ctx.db, parent_id, child_id).await?.is_some() {
                continue;
            }

            let edge = SectionHierarchy {
                id: None,
                parent_section_id: parent_id,
                child_section_id: child_id,
                sequence_number: created + 1,
            };
            hierarchy::insert_edge(&ctx.db, &edge).await?;
            created += 1;
            outcome.edges_created += 1;

            tracing::debug!(
                session_id = %ctx.session_id,
                parent_section_id = parent_id,
                child_section_id = child_id,
                sequence_number = created,
                "Created hierarchy edge"
            );
        }

        Ok(())
    }

    /// Bulk path: one subtree resolution, one key lookup, one edge
    /// lookup, one insert of the missing set.
    async fn resolve_batch(
        &self,
        ctx: &IngestContext,
        parent_id: i64,
        element: &Element,
        parser: &dyn SectionContentParser,
        outcome: &mut HierarchyOutcome,
    ) -> Result<()> {
        parser.resolve_subtree(ctx, element, true).await?;

        let mut natural_keys: Vec<String> = Vec::new();
        for child_element in Self::child_sections(element) {
            match section_natural_key(child_element) {
                Some(key) => natural_keys.push(key),
                None => {
                    outcome.children_failed += 1;
                    outcome
                        .errors
                        .push("child section carries no parseable identifier".to_string());
                    tracing::warn!(
                        session_id = %ctx.session_id,
                        parent_section_id = parent_id,
                        "Child section carries no parseable identifier, skipping"
                    );
                }
            }
        }
        if natural_keys.is_empty() {
            return Ok(());
        }

        let resolved =
            sections::find_by_natural_keys(&ctx.db, ctx.document_id, &natural_keys).await?;

        if resolved.len() < natural_keys.len() {
            let found: HashSet<&str> = resolved.iter().map(|s| s.natural_key.as_str()).collect();
            for key in natural_keys.iter().filter(|k| !found.contains(k.as_str())) {
                outcome.children_failed += 1;
                outcome.errors.push(format!(
                    "child section '{}' missing from store after resolution",
                    key
                ));
                tracing::warn!(
                    session_id = %ctx.session_id,
                    child = %key,
                    "Child section missing from store after subtree resolution"
                );
            }
        }

        let mut child_ids: Vec<i64> = resolved.iter().filter_map(|s| s.id).collect();
        child_ids.sort_unstable();
        child_ids.dedup();
        if child_ids.is_empty() {
            return Ok(());
        }

        let existing = hierarchy::find_edges_for_parent(&ctx.db, parent_id, &child_ids).await?;
        let existing_children: HashSet<i64> =
            existing.iter().map(|e| e.child_section_id).collect();

        // Missing edges ordered by persisted id: deterministic against a
        // partially populated store, regardless of document position.
        let missing: Vec<SectionHierarchy> = child_ids
            .iter()
            .copied()
            .filter(|child_id| !existing_children.contains(child_id))
            .enumerate()
            .map(|(index, child_id)| SectionHierarchy {
                id: None,
                parent_section_id: parent_id,
                child_section_id: child_id,
                sequence_number: index as i64 + 1,
            })
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        hierarchy::insert_edges(&ctx.db, &missing).await?;
        outcome.edges_created += missing.len();

        tracing::debug!(
            session_id = %ctx.session_id,
            parent_section_id = parent_id,
            edges_created = missing.len(),
            "Created hierarchy edges"
        );

        Ok(())
    }
}
