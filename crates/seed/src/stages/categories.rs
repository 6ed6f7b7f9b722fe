//! Category tree: roots in declaration order, each followed by its children.

use std::collections::BTreeMap;

use tracing::{info, instrument};

use marketplace_core::{CategoryId, Slug};

use crate::db::SeedStore;
use crate::error::SeedError;
use crate::models::{CategoryRecord, NewCategory, Upserted};
use crate::plan::CategoryFixture;

/// Output of the category stage: persisted id for every declared slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    ids: BTreeMap<Slug, CategoryId>,
    created: usize,
}

impl CategoryIndex {
    /// Persisted id of a declared category.
    #[must_use]
    pub fn get(&self, slug: &Slug) -> Option<CategoryId> {
        self.ids.get(slug).copied()
    }

    /// Whether the slug was part of the seeded taxonomy.
    #[must_use]
    pub fn contains(&self, slug: &Slug) -> bool {
        self.ids.contains_key(slug)
    }

    /// Number of categories resolved, created or already present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no categories were resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of categories created by this run.
    #[must_use]
    pub const fn created(&self) -> usize {
        self.created
    }

    fn record(&mut self, upserted: &Upserted<CategoryRecord>) {
        self.ids
            .insert(upserted.record.slug.clone(), upserted.record.id);
        if upserted.created {
            self.created += 1;
        }
    }
}

/// Ensure the two-level category tree exists.
///
/// Each category's sort order is its 0-based position in its own sibling
/// list. A child is written right after its parent, using the id the store
/// returned for that parent, whether the parent was created now or earlier.
/// Existing categories keep their parent, position and description even if
/// the fixture has changed.
///
/// # Errors
///
/// Returns `SeedError::Store` if any store call fails.
#[instrument(skip_all, fields(roots = roots.len()))]
pub async fn build_category_tree<S: SeedStore>(
    store: &S,
    roots: &[CategoryFixture],
) -> Result<CategoryIndex, SeedError> {
    let mut index = CategoryIndex::default();

    for (position, root) in (0_i32..).zip(roots) {
        let parent = store
            .upsert_category(new_category(root, None, position))
            .await?;
        log_category(&parent, 0);
        index.record(&parent);

        for (child_position, child) in (0_i32..).zip(&root.children) {
            let upserted = store
                .upsert_category(new_category(child, Some(parent.record.id), child_position))
                .await?;
            log_category(&upserted, 1);
            index.record(&upserted);
        }
    }

    Ok(index)
}

fn new_category(
    fixture: &CategoryFixture,
    parent_id: Option<CategoryId>,
    sort_order: i32,
) -> NewCategory {
    NewCategory {
        name: fixture.name.clone(),
        slug: fixture.slug.clone(),
        description: fixture.description.clone(),
        parent_id,
        sort_order,
    }
}

fn log_category(upserted: &Upserted<CategoryRecord>, depth: usize) {
    let category = &upserted.record;
    let kind = if depth == 0 { "Category" } else { "Subcategory" };
    if upserted.created {
        info!(slug = %category.slug, sort_order = category.sort_order, "{kind} created: {}", category.name);
    } else {
        info!(slug = %category.slug, "{kind} already present: {}", category.name);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::plan::SeedPlan;

    #[tokio::test]
    async fn test_builds_tree_in_order() {
        let plan = SeedPlan::builtin().unwrap();
        let store = MemoryStore::new();

        let index = build_category_tree(&store, &plan.categories).await.unwrap();
        assert_eq!(index.len(), 21);
        assert_eq!(index.created(), 21);

        for (root_position, root) in (0_i32..).zip(&plan.categories) {
            let parent = store.category(root.slug.as_str()).await.unwrap();
            assert_eq!(parent.parent_id, None);
            assert_eq!(parent.sort_order, root_position);

            for (position, child) in (0_i32..).zip(&root.children) {
                let stored = store.category(child.slug.as_str()).await.unwrap();
                assert_eq!(stored.parent_id, Some(parent.id));
                assert_eq!(stored.sort_order, position);
                assert_eq!(index.get(&child.slug), Some(stored.id));
            }
        }
    }

    #[tokio::test]
    async fn test_existing_category_is_not_moved() {
        let store = MemoryStore::new();
        let original = SeedPlan::from_yaml(
            r"
categories:
  - name: Electronics
    slug: electronics
    children:
      - { name: Laptops, slug: laptops }
      - { name: Tablets, slug: tablets }
",
        )
        .unwrap();
        build_category_tree(&store, &original.categories).await.unwrap();
        let before = store.snapshot().await.categories;

        // Tablets moved to the front and under a new parent.
        let reshuffled = SeedPlan::from_yaml(
            r"
categories:
  - name: Computing
    slug: computing
    children:
      - { name: Tablets, slug: tablets, description: changed }
  - name: Electronics
    slug: electronics
    children:
      - { name: Laptops, slug: laptops }
",
        )
        .unwrap();
        let index = build_category_tree(&store, &reshuffled.categories)
            .await
            .unwrap();

        assert_eq!(index.created(), 1);
        let after = store.snapshot().await.categories;
        for category in &before {
            assert!(after.contains(category), "{} was modified", category.slug);
        }
        let computing = store.category("computing").await.unwrap();
        assert_eq!(computing.sort_order, 0);
        // Electronics kept position 0, so two roots now share it.
        assert_eq!(store.category("electronics").await.unwrap().sort_order, 0);
    }

    #[tokio::test]
    async fn test_children_attach_to_preexisting_parent() {
        let store = MemoryStore::new();
        let parent_only = SeedPlan::from_yaml("categories:\n  - { name: Fashion, slug: fashion }\n").unwrap();
        build_category_tree(&store, &parent_only.categories).await.unwrap();
        let parent = store.category("fashion").await.unwrap();

        let plan = SeedPlan::builtin().unwrap();
        build_category_tree(&store, &plan.categories).await.unwrap();

        let shoes = store.category("shoes").await.unwrap();
        assert_eq!(shoes.parent_id, Some(parent.id));
        assert_eq!(store.category("fashion").await.unwrap().sort_order, 0);
    }
}
