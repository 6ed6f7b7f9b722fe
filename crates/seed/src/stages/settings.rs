//! Global settings: flat key/value pairs with an advisory type tag.

use tracing::{info, instrument};

use crate::db::SeedStore;
use crate::error::SeedError;
use crate::models::NewSetting;
use crate::plan::SettingFixture;

/// Output of the settings stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsOutcome {
    pub created: usize,
    pub existing: usize,
}

/// Ensure every fixture setting key exists.
///
/// An existing key keeps its stored value and type, even if the fixture now
/// declares something else. Values are not checked against their type tag.
///
/// # Errors
///
/// Returns `SeedError::Store` if any store call fails.
#[instrument(skip_all, fields(settings = fixtures.len()))]
pub async fn provision_settings<S: SeedStore>(
    store: &S,
    fixtures: &[SettingFixture],
) -> Result<SettingsOutcome, SeedError> {
    let mut outcome = SettingsOutcome::default();

    for fixture in fixtures {
        let upserted = store
            .upsert_setting(NewSetting {
                key: fixture.key.clone(),
                value: fixture.value.clone(),
                value_type: fixture.value_type,
            })
            .await?;

        if upserted.created {
            outcome.created += 1;
        } else {
            outcome.existing += 1;
        }
    }

    info!(
        created = outcome.created,
        existing = outcome.existing,
        "Settings provisioned"
    );
    Ok(outcome)
}
