//! Account provisioning: one account per fixture email, with its profile.

use tracing::{info, instrument};

use marketplace_core::{Email, UserId, UserRole};

use crate::db::SeedStore;
use crate::error::SeedError;
use crate::models::{NewProfile, NewUser, NewVendor};
use crate::password::CredentialHasher;
use crate::plan::AccountFixture;

/// An account as it stands after provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedAccount {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    /// `false` if the account already existed and was left untouched.
    pub created: bool,
}

/// Output of the account stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionedAccounts {
    pub accounts: Vec<ProvisionedAccount>,
}

impl ProvisionedAccounts {
    /// The provisioned account with this email.
    #[must_use]
    pub fn get(&self, email: &Email) -> Option<&ProvisionedAccount> {
        self.accounts.iter().find(|a| &a.email == email)
    }

    /// Number of accounts created by this run.
    #[must_use]
    pub fn created(&self) -> usize {
        self.accounts.iter().filter(|a| a.created).count()
    }
}

/// Ensure every fixture account exists.
///
/// Each plaintext password is hashed before the insert-or-update call. When
/// the account already exists the store keeps its digest, so credentials are
/// never rotated by a re-run.
///
/// # Errors
///
/// Returns `SeedError::PasswordHash` if hashing fails and `SeedError::Store`
/// if any store call fails. The first failure aborts the stage.
#[instrument(skip_all, fields(accounts = fixtures.len()))]
pub async fn provision_accounts<S: SeedStore>(
    store: &S,
    hasher: &CredentialHasher,
    fixtures: &[AccountFixture],
) -> Result<ProvisionedAccounts, SeedError> {
    let mut provisioned = ProvisionedAccounts::default();

    for fixture in fixtures {
        let password_hash = hasher.hash(&fixture.password)?;

        let upserted = store
            .upsert_user(NewUser {
                email: fixture.email.clone(),
                name: fixture.name.clone(),
                password_hash,
                role: fixture.role,
                profile: profile_for(fixture),
            })
            .await?;

        let user = upserted.record;
        if upserted.created {
            info!(email = %user.email, role = %user.role, "Account created");
        } else {
            info!(email = %user.email, role = %user.role, "Account already present");
        }

        provisioned.accounts.push(ProvisionedAccount {
            id: user.id,
            email: user.email,
            role: user.role,
            created: upserted.created,
        });
    }

    Ok(provisioned)
}

/// The owned profile to create alongside the account.
fn profile_for(fixture: &AccountFixture) -> NewProfile {
    match (fixture.role, &fixture.vendor) {
        (UserRole::Customer, _) => NewProfile::Customer,
        (UserRole::Vendor, Some(vendor)) => NewProfile::Vendor(NewVendor {
            store_name: vendor.store_name.clone(),
            store_slug: vendor.store_slug.clone(),
            description: vendor.description.clone(),
            is_approved: vendor.is_approved,
            is_active: vendor.is_active,
        }),
        (UserRole::Admin | UserRole::Vendor, _) => NewProfile::None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::plan::SeedPlan;

    fn hasher() -> CredentialHasher {
        CredentialHasher::with_cost(8, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn test_creates_accounts_and_profiles() {
        let plan = SeedPlan::builtin().unwrap();
        let store = MemoryStore::new();

        let accounts = provision_accounts(&store, &hasher(), &plan.accounts)
            .await
            .unwrap();

        assert_eq!(accounts.accounts.len(), 3);
        assert_eq!(accounts.created(), 3);

        let tables = store.snapshot().await;
        assert_eq!(tables.users.len(), 3);
        assert_eq!(tables.customers.len(), 1);
        assert_eq!(tables.vendors.len(), 1);

        let customer = accounts
            .get(&Email::parse("customer@example.com").unwrap())
            .unwrap();
        assert_eq!(tables.customers[0].user_id, customer.id);
    }

    #[tokio::test]
    async fn test_stores_digest_not_plaintext() {
        let plan = SeedPlan::builtin().unwrap();
        let store = MemoryStore::new();
        let hasher = hasher();

        provision_accounts(&store, &hasher, &plan.accounts)
            .await
            .unwrap();

        let admin = store.user("admin@marketplace.com").await.unwrap();
        assert_ne!(admin.password_hash, "admin123");
        assert!(hasher.verify("admin123", &admin.password_hash));
    }

    #[tokio::test]
    async fn test_rerun_keeps_digest() {
        let plan = SeedPlan::builtin().unwrap();
        let store = MemoryStore::new();
        let hasher = hasher();

        provision_accounts(&store, &hasher, &plan.accounts)
            .await
            .unwrap();
        let before = store.user("vendor@example.com").await.unwrap();

        let again = provision_accounts(&store, &hasher, &plan.accounts)
            .await
            .unwrap();
        let after = store.user("vendor@example.com").await.unwrap();

        assert_eq!(again.created(), 0);
        assert_eq!(before, after);
        assert_eq!(store.snapshot().await.vendors.len(), 1);
    }

    #[test]
    fn test_profile_for_roles() {
        let plan = SeedPlan::builtin().unwrap();
        let profiles: Vec<NewProfile> = plan.accounts.iter().map(profile_for).collect();

        assert_eq!(profiles[0], NewProfile::None);
        assert_eq!(profiles[1], NewProfile::Customer);
        assert!(matches!(&profiles[2], NewProfile::Vendor(v) if v.store_slug.as_str() == "janes-electronics-store"));
    }
}
