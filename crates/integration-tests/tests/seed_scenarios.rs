//! End-to-end seeding scenarios against the in-memory store.
//!
//! These tests run the whole pipeline, the way `mp-cli seed` does, without
//! requiring a database.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::HashSet;

use marketplace_core::{Email, SettingType, UserRole};
use marketplace_integration_tests::fast_hasher;
use marketplace_seed::db::memory::StoreOp;
use marketplace_seed::models::{NewProfile, NewSetting, NewUser};
use marketplace_seed::report::summary_lines;
use marketplace_seed::stages::SkipReason;
use marketplace_seed::{MemoryStore, SeedError, SeedPlan, SeedStore, Seeder, run_to_completion};

fn builtin() -> SeedPlan {
    SeedPlan::builtin().unwrap()
}

// =============================================================================
// Scenario A: empty store
// =============================================================================

#[tokio::test]
async fn test_empty_store_gets_full_dataset() {
    let plan = builtin();
    let store = MemoryStore::new();

    let report = run_to_completion(store.clone(), fast_hasher().unwrap(), &plan)
        .await
        .unwrap();

    let tables = store.snapshot().await;
    assert_eq!(tables.users.len(), 3);
    assert_eq!(tables.customers.len(), 1);
    assert_eq!(tables.vendors.len(), 1);
    assert_eq!(tables.categories.len(), 21);
    assert_eq!(
        tables.categories.iter().filter(|c| c.parent_id.is_none()).count(),
        6
    );
    assert_eq!(tables.products.len(), 3);
    assert_eq!(tables.settings.len(), 6);

    assert_eq!(report.accounts.created(), 3);
    assert_eq!(report.categories.created(), 21);
    assert_eq!(report.catalog.created(), 3);
    assert_eq!(report.settings.created, 6);
    assert!(report.catalog.skipped.is_empty());
}

#[tokio::test]
async fn test_tree_positions_follow_declaration_order() {
    let plan = builtin();
    let store = MemoryStore::new();
    run_to_completion(store.clone(), fast_hasher().unwrap(), &plan)
        .await
        .unwrap();

    for (root_position, root) in (0_i32..).zip(&plan.categories) {
        let parent = store.category(root.slug.as_str()).await.unwrap();
        assert_eq!(parent.sort_order, root_position);

        for (position, child) in (0_i32..).zip(&root.children) {
            let stored = store.category(child.slug.as_str()).await.unwrap();
            assert_eq!(stored.parent_id, Some(parent.id), "{}", child.slug);
            assert_eq!(stored.sort_order, position, "{}", child.slug);
        }
    }
}

#[tokio::test]
async fn test_products_reference_vendor_and_category() {
    let plan = builtin();
    let store = MemoryStore::new();
    run_to_completion(store.clone(), fast_hasher().unwrap(), &plan)
        .await
        .unwrap();

    let tables = store.snapshot().await;
    let vendor = &tables.vendors[0];
    let smartphones = store.category("smartphones").await.unwrap();

    for slug in ["iphone-15-pro", "samsung-galaxy-s24"] {
        let product = store.product(slug).await.unwrap();
        assert_eq!(product.vendor_id, vendor.id);
        assert_eq!(product.category_id, smartphones.id);
    }

    let iphone = store.product("iphone-15-pro").await.unwrap();
    assert_eq!(iphone.price.to_string(), "999.99");
    assert!(iphone.is_featured);
}

// =============================================================================
// Idempotency and uniqueness
// =============================================================================

#[tokio::test]
async fn test_second_run_is_noop() {
    let plan = builtin();
    let store = MemoryStore::new();
    let seeder = Seeder::new(&store, fast_hasher().unwrap());

    seeder.run(&plan).await.unwrap();
    let once = store.snapshot().await;

    let report = seeder.run(&plan).await.unwrap();
    let twice = store.snapshot().await;

    assert_eq!(once, twice);
    assert!(report.is_noop());
    assert_eq!(report.accounts.accounts.len(), 3);
    assert_eq!(report.categories.len(), 21);
    assert_eq!(report.catalog.products.len(), 3);
    assert_eq!(report.settings.existing, 6);
}

#[tokio::test]
async fn test_unique_keys_stay_unique_across_runs() {
    let plan = builtin();
    let store = MemoryStore::new();
    let seeder = Seeder::new(&store, fast_hasher().unwrap());
    for _ in 0..3 {
        seeder.run(&plan).await.unwrap();
    }

    let tables = store.snapshot().await;
    let emails: HashSet<_> = tables.users.iter().map(|u| &u.email).collect();
    let category_slugs: HashSet<_> = tables.categories.iter().map(|c| &c.slug).collect();
    let product_slugs: HashSet<_> = tables.products.iter().map(|p| &p.slug).collect();
    let keys: HashSet<_> = tables.settings.iter().map(|s| &s.key).collect();

    assert_eq!(emails.len(), tables.users.len());
    assert_eq!(category_slugs.len(), tables.categories.len());
    assert_eq!(product_slugs.len(), tables.products.len());
    assert_eq!(keys.len(), tables.settings.len());
}

// =============================================================================
// Scenario B: admin already present
// =============================================================================

#[tokio::test]
async fn test_preexisting_admin_is_untouched() {
    let plan = builtin();
    let store = MemoryStore::new();
    let existing = store
        .upsert_user(NewUser {
            email: Email::parse("admin@marketplace.com").unwrap(),
            name: "Admin User".to_owned(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$existing".to_owned(),
            role: UserRole::Admin,
            profile: NewProfile::None,
        })
        .await
        .unwrap()
        .record;

    let report = run_to_completion(store.clone(), fast_hasher().unwrap(), &plan)
        .await
        .unwrap();

    assert_eq!(store.user("admin@marketplace.com").await.unwrap(), existing);
    assert_eq!(report.accounts.created(), 2);
    assert!(store.user("customer@example.com").await.is_some());
    assert!(store.user("vendor@example.com").await.is_some());
}

// =============================================================================
// Scenario C: category missing at catalog time
// =============================================================================

#[tokio::test]
async fn test_products_without_category_are_skipped() {
    let mut plan = builtin();
    for root in &mut plan.categories {
        root.children.retain(|c| c.slug.as_str() != "smartphones");
    }
    let store = MemoryStore::new();

    let report = run_to_completion(store.clone(), fast_hasher().unwrap(), &plan)
        .await
        .unwrap();

    assert!(store.product("iphone-15-pro").await.is_none());
    assert!(store.product("samsung-galaxy-s24").await.is_none());
    assert!(store.product("mens-cotton-tshirt").await.is_some());

    assert_eq!(report.catalog.skipped.len(), 2);
    assert!(
        report
            .catalog
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::CategoryMissing && s.category.as_str() == "smartphones")
    );
    assert!(
        summary_lines(&report, &plan)
            .iter()
            .any(|l| l == "Products: 1 created, 0 already present, 2 skipped")
    );
}

#[tokio::test]
async fn test_category_from_earlier_run_is_honoured() {
    // First run seeds everything, second run no longer declares the taxonomy.
    let store = MemoryStore::new();
    let seeder = Seeder::new(&store, fast_hasher().unwrap());
    seeder.run(&builtin()).await.unwrap();

    let mut plan = builtin();
    plan.categories.clear();
    let report = seeder.run(&plan).await.unwrap();

    assert!(report.catalog.skipped.is_empty());
    assert_eq!(report.catalog.products.len(), 3);
}

// =============================================================================
// Scenario D: settings keep their stored value
// =============================================================================

#[tokio::test]
async fn test_changed_setting_value_is_not_applied() {
    let store = MemoryStore::new();
    let seeder = Seeder::new(&store, fast_hasher().unwrap());
    seeder.run(&builtin()).await.unwrap();

    let mut plan = builtin();
    for setting in &mut plan.settings {
        if setting.key == "currency" {
            setting.value = "EUR".to_owned();
        }
    }
    let report = seeder.run(&plan).await.unwrap();

    let currency = store.setting("currency").await.unwrap();
    assert_eq!(currency.value, "USD");
    assert_eq!(currency.value_type, SettingType::String);
    assert_eq!(report.settings.created, 0);
}

#[tokio::test]
async fn test_preexisting_setting_keeps_type() {
    let store = MemoryStore::new();
    store
        .upsert_setting(NewSetting {
            key: "tax_rate".to_owned(),
            value: "0.2".to_owned(),
            value_type: SettingType::String,
        })
        .await
        .unwrap();

    run_to_completion(store.clone(), fast_hasher().unwrap(), &builtin())
        .await
        .unwrap();

    let tax = store.setting("tax_rate").await.unwrap();
    assert_eq!(tax.value, "0.2");
    assert_eq!(tax.value_type, SettingType::String);
}

// =============================================================================
// Failure handling
// =============================================================================

#[tokio::test]
async fn test_store_failure_aborts_and_releases() {
    for op in [
        StoreOp::UpsertUser,
        StoreOp::UpsertCategory,
        StoreOp::FindVendor,
        StoreOp::FindCategory,
        StoreOp::UpsertProduct,
        StoreOp::UpsertSetting,
    ] {
        let store = MemoryStore::new();
        store.fail_on(op).await;

        let result = run_to_completion(store.clone(), fast_hasher().unwrap(), &builtin()).await;

        assert!(matches!(result, Err(SeedError::Store(_))), "{op:?}");
        assert_eq!(store.close_count().await, 1, "{op:?}");
    }
}

#[tokio::test]
async fn test_failure_in_catalog_leaves_settings_unwritten() {
    let store = MemoryStore::new();
    store.fail_on(StoreOp::UpsertProduct).await;

    let result = run_to_completion(store.clone(), fast_hasher().unwrap(), &builtin()).await;

    assert!(result.is_err());
    let tables = store.snapshot().await;
    assert_eq!(tables.users.len(), 3);
    assert_eq!(tables.categories.len(), 21);
    assert!(tables.products.is_empty());
    assert!(tables.settings.is_empty());
}

#[test]
fn test_invalid_fixture_is_rejected_before_any_store_call() {
    let yaml = r"
accounts:
  - { email: dup@example.com, name: A, password: a, role: ADMIN }
  - { email: dup@example.com, name: B, password: b, role: CUSTOMER }
";
    let err = SeedPlan::from_yaml(yaml).unwrap_err();
    assert!(matches!(err, SeedError::InvalidPlan(errors) if errors.len() == 1));
}
