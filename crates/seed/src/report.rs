//! Completion report for a seeding run.
//!
//! Diagnostic only. The plaintext credentials printed here come from the
//! fixture document, never from the store.

use tracing::{info, warn};

use crate::plan::SeedPlan;
use crate::stages::{CatalogOutcome, CategoryIndex, ProvisionedAccounts, SettingsOutcome};

/// What each stage produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub accounts: ProvisionedAccounts,
    pub categories: CategoryIndex,
    pub catalog: CatalogOutcome,
    pub settings: SettingsOutcome,
}

impl SeedReport {
    /// Whether the run created nothing, i.e. the store was already seeded.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.accounts.created() == 0
            && self.categories.created() == 0
            && self.catalog.created() == 0
            && self.settings.created == 0
    }
}

/// Human-readable summary lines for a finished run.
#[must_use]
pub fn summary_lines(report: &SeedReport, plan: &SeedPlan) -> Vec<String> {
    let mut lines = vec!["Database seeded successfully!".to_owned()];

    lines.push("Test accounts:".to_owned());
    for account in &report.accounts.accounts {
        let password = plan.password_for(&account.email).unwrap_or("<unknown>");
        lines.push(format!(
            "  {}: {} / {password}",
            role_label(&account.role.to_string()),
            account.email
        ));
    }

    let existing_accounts = report.accounts.accounts.len() - report.accounts.created();
    lines.push(format!(
        "Accounts: {} created, {existing_accounts} already present",
        report.accounts.created()
    ));
    lines.push(format!(
        "Categories: {} created, {} already present",
        report.categories.created(),
        report.categories.len() - report.categories.created()
    ));
    lines.push(format!(
        "Products: {} created, {} already present, {} skipped",
        report.catalog.created(),
        report.catalog.products.len() - report.catalog.created(),
        report.catalog.skipped.len()
    ));
    for skipped in &report.catalog.skipped {
        lines.push(format!(
            "  skipped {} (category {}): {}",
            skipped.slug, skipped.category, skipped.reason
        ));
    }
    lines.push(format!(
        "Settings: {} created, {} already present",
        report.settings.created, report.settings.existing
    ));

    lines
}

/// Emit the summary through `tracing`.
pub fn log_summary(report: &SeedReport, plan: &SeedPlan) {
    for line in summary_lines(report, plan) {
        info!("{line}");
    }
    if !report.catalog.skipped.is_empty() {
        warn!(
            skipped = report.catalog.skipped.len(),
            "Some products were not seeded"
        );
    }
}

/// `ADMIN` -> `Admin`.
fn role_label(role: &str) -> String {
    let mut chars = role.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketplace_core::{Email, Slug, UserId, UserRole};

    use super::*;
    use crate::stages::{ProvisionedAccount, SkipReason, SkippedProduct};

    fn account(id: i32, email: &str, role: UserRole, created: bool) -> ProvisionedAccount {
        ProvisionedAccount {
            id: UserId::new(id),
            email: Email::parse(email).unwrap(),
            role,
            created,
        }
    }

    #[test]
    fn test_lists_test_accounts_with_credentials() {
        let plan = SeedPlan::builtin().unwrap();
        let report = SeedReport {
            accounts: ProvisionedAccounts {
                accounts: vec![
                    account(1, "admin@marketplace.com", UserRole::Admin, false),
                    account(2, "customer@example.com", UserRole::Customer, true),
                    account(3, "vendor@example.com", UserRole::Vendor, true),
                ],
            },
            ..SeedReport::default()
        };

        let lines = summary_lines(&report, &plan);

        assert!(lines.contains(&"  Admin: admin@marketplace.com / admin123".to_owned()));
        assert!(lines.contains(&"  Customer: customer@example.com / customer123".to_owned()));
        assert!(lines.contains(&"  Vendor: vendor@example.com / vendor123".to_owned()));
        assert!(lines.contains(&"Accounts: 2 created, 1 already present".to_owned()));
    }

    #[test]
    fn test_reports_skipped_products() {
        let plan = SeedPlan::builtin().unwrap();
        let report = SeedReport {
            catalog: CatalogOutcome {
                skipped: vec![SkippedProduct {
                    slug: Slug::parse("iphone-15-pro").unwrap(),
                    category: Slug::parse("smartphones").unwrap(),
                    reason: SkipReason::CategoryMissing,
                }],
                ..CatalogOutcome::default()
            },
            ..SeedReport::default()
        };

        let lines = summary_lines(&report, &plan);

        assert!(lines.contains(&"Products: 0 created, 0 already present, 1 skipped".to_owned()));
        assert!(lines.contains(
            &"  skipped iphone-15-pro (category smartphones): category not found".to_owned()
        ));
    }

    #[test]
    fn test_empty_report_is_noop() {
        assert!(SeedReport::default().is_noop());
    }

    #[test]
    fn test_role_label() {
        assert_eq!(role_label("ADMIN"), "Admin");
        assert_eq!(role_label("VENDOR"), "Vendor");
        assert_eq!(role_label(""), "");
    }
}
