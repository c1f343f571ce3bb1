//! Billing service — the tariff registry and fee computation for stays
//!
//! Owns the in-process `TariffRegistry`, loaded from the pricing_rules table
//! at startup and rebuilt whenever a rule is mutated. The registry snapshot
//! is behind an async RwLock; fee computation itself is the pure domain
//! calculator.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{
    compute_fee, BillingMode, DomainError, DomainResult, StayInterval, TariffProfile,
    TariffRegistry,
};
use crate::infrastructure::database::entities::pricing_rule;

/// Convert a persisted pricing rule into a domain profile.
///
/// Rejects rows whose amount columns are incomplete for their billing mode
/// or negative; a malformed rule must never silently price a stay.
pub fn rule_to_profile(rule: &pricing_rule::Model) -> DomainResult<TariffProfile> {
    let mode = match rule.billing_mode {
        pricing_rule::BillingModeKind::Tiered => {
            let (first_20_min, first_hour, additional_hour) = match (
                rule.first_20_min_amount,
                rule.first_hour_amount,
                rule.additional_hour_amount,
            ) {
                (Some(a), Some(b), Some(c)) => (a, b, c),
                _ => {
                    return Err(DomainError::Validation(format!(
                        "pricing rule '{}' is tiered but missing tier amounts",
                        rule.key
                    )))
                }
            };
            BillingMode::Tiered {
                first_20_min,
                first_hour,
                additional_hour,
            }
        }
        pricing_rule::BillingModeKind::Flat => {
            let fixed_amount = rule.fixed_amount.ok_or_else(|| {
                DomainError::Validation(format!(
                    "pricing rule '{}' is flat but missing fixed amount",
                    rule.key
                ))
            })?;
            BillingMode::Flat { fixed_amount }
        }
    };

    if let BillingMode::Tiered {
        first_20_min,
        first_hour,
        additional_hour,
    } = mode
    {
        if first_20_min < 0 || first_hour < 0 || additional_hour < 0 {
            return Err(DomainError::Validation(format!(
                "pricing rule '{}' has a negative amount",
                rule.key
            )));
        }
    } else if let BillingMode::Flat { fixed_amount } = mode {
        if fixed_amount < 0 {
            return Err(DomainError::Validation(format!(
                "pricing rule '{}' has a negative amount",
                rule.key
            )));
        }
    }

    Ok(TariffProfile {
        key: rule.key.clone(),
        display_name: rule.display_name.clone(),
        mode,
    })
}

/// Service for resolving tariff profiles and computing parking fees
pub struct BillingService {
    db: DatabaseConnection,
    registry: RwLock<TariffRegistry>,
}

impl BillingService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            registry: RwLock::new(TariffRegistry::new()),
        }
    }

    /// Rebuild the registry from the active pricing rules.
    ///
    /// Called at startup and after every pricing-rule mutation. Malformed
    /// rules abort the reload rather than being skipped, so a bad edit is
    /// caught at configuration time instead of at a customer's check-out.
    pub async fn reload(&self) -> DomainResult<usize> {
        let rules = pricing_rule::Entity::find()
            .filter(pricing_rule::Column::IsActive.eq(true))
            .all(&self.db)
            .await?;

        let mut registry = TariffRegistry::new();
        for rule in &rules {
            registry.insert(rule_to_profile(rule)?);
        }
        let count = registry.len();

        *self.registry.write().await = registry;
        info!("Tariff registry reloaded: {} active profiles", count);
        Ok(count)
    }

    /// Look up a profile by key. Case-sensitive; fails with `UnknownProfile`.
    pub async fn resolve_profile(&self, key: &str) -> DomainResult<TariffProfile> {
        self.registry.read().await.resolve(key).cloned()
    }

    /// Compute the fee for a completed stay under the profile named by `key`.
    pub async fn fee_for_stay(&self, key: &str, interval: &StayInterval) -> DomainResult<i64> {
        let profile = self.resolve_profile(key).await?;
        compute_fee(interval.elapsed_minutes(), &profile)
    }

    /// Dry-run the calculator for an arbitrary duration (tariff preview).
    pub async fn preview_fee(&self, key: &str, elapsed_minutes: i64) -> DomainResult<i64> {
        let profile = self.resolve_profile(key).await?;
        compute_fee(elapsed_minutes, &profile)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rule(
        key: &str,
        mode: pricing_rule::BillingModeKind,
        amounts: [Option<i64>; 4],
    ) -> pricing_rule::Model {
        pricing_rule::Model {
            id: 1,
            key: key.into(),
            display_name: key.to_uppercase(),
            billing_mode: mode,
            first_20_min_amount: amounts[0],
            first_hour_amount: amounts[1],
            additional_hour_amount: amounts[2],
            fixed_amount: amounts[3],
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn tiered_rule_converts() {
        let profile = rule_to_profile(&rule(
            "avulso",
            pricing_rule::BillingModeKind::Tiered,
            [Some(500), Some(2000), Some(1000), None],
        ))
        .unwrap();

        assert_eq!(
            profile.mode,
            BillingMode::Tiered {
                first_20_min: 500,
                first_hour: 2000,
                additional_hour: 1000,
            }
        );
    }

    #[test]
    fn flat_rule_converts() {
        let profile = rule_to_profile(&rule(
            "diaria",
            pricing_rule::BillingModeKind::Flat,
            [None, None, None, Some(5000)],
        ))
        .unwrap();

        assert_eq!(profile.mode, BillingMode::Flat { fixed_amount: 5000 });
    }

    #[test]
    fn tiered_rule_with_missing_amount_is_rejected() {
        let err = rule_to_profile(&rule(
            "broken",
            pricing_rule::BillingModeKind::Tiered,
            [Some(500), None, Some(1000), None],
        ))
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn flat_rule_without_fixed_amount_is_rejected() {
        let err = rule_to_profile(&rule(
            "broken",
            pricing_rule::BillingModeKind::Flat,
            [Some(500), Some(2000), Some(1000), None],
        ))
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = rule_to_profile(&rule(
            "broken",
            pricing_rule::BillingModeKind::Flat,
            [None, None, None, Some(-100)],
        ))
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn flat_rule_ignores_leftover_tier_columns() {
        // A rule switched from tiered to flat may keep stale tier values;
        // only the fixed amount matters.
        let profile = rule_to_profile(&rule(
            "diaria",
            pricing_rule::BillingModeKind::Flat,
            [Some(1), Some(2), Some(3), Some(5000)],
        ))
        .unwrap();
        assert_eq!(profile.mode, BillingMode::Flat { fixed_amount: 5000 });
    }

    mod with_database {
        use super::*;
        use crate::infrastructure::database::migrator::Migrator;
        use sea_orm::{ActiveModelTrait, Database, Set};
        use sea_orm_migration::MigratorTrait;

        async fn seeded_db() -> DatabaseConnection {
            let db = Database::connect("sqlite::memory:").await.unwrap();
            Migrator::up(&db, None).await.unwrap();
            db
        }

        #[tokio::test]
        async fn reload_loads_the_seeded_profiles() {
            let service = BillingService::new(seeded_db().await);
            assert_eq!(service.reload().await.unwrap(), 4);

            let avulso = service.resolve_profile("avulso").await.unwrap();
            assert_eq!(
                avulso.mode,
                BillingMode::Tiered {
                    first_20_min: 500,
                    first_hour: 2000,
                    additional_hour: 1000,
                }
            );
            assert!(matches!(
                service.resolve_profile("Avulso").await.unwrap_err(),
                DomainError::UnknownProfile(_)
            ));
        }

        #[tokio::test]
        async fn reload_skips_inactive_rules() {
            let db = seeded_db().await;
            let service = BillingService::new(db.clone());
            service.reload().await.unwrap();

            let diaria = pricing_rule::Entity::find()
                .filter(pricing_rule::Column::Key.eq("diaria"))
                .one(&db)
                .await
                .unwrap()
                .unwrap();
            let mut active: pricing_rule::ActiveModel = diaria.into();
            active.is_active = Set(false);
            active.update(&db).await.unwrap();

            assert_eq!(service.reload().await.unwrap(), 3);
            assert!(service.resolve_profile("diaria").await.is_err());
        }

        #[tokio::test]
        async fn reload_aborts_on_a_malformed_rule() {
            let db = seeded_db().await;
            let service = BillingService::new(db.clone());
            service.reload().await.unwrap();

            // active flat rule without a fixed amount, inserted behind the
            // API's validation
            let now = chrono::Utc::now();
            pricing_rule::ActiveModel {
                key: Set("quebrado".to_string()),
                display_name: Set("Quebrado".to_string()),
                billing_mode: Set(pricing_rule::BillingModeKind::Flat),
                first_20_min_amount: Set(None),
                first_hour_amount: Set(None),
                additional_hour_amount: Set(None),
                fixed_amount: Set(None),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&db)
            .await
            .unwrap();

            let err = service.reload().await.unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
            // the previous registry snapshot stays in place
            assert!(service.resolve_profile("avulso").await.is_ok());
        }

        #[tokio::test]
        async fn fee_for_stay_prices_a_real_interval() {
            let service = BillingService::new(seeded_db().await);
            service.reload().await.unwrap();

            let entry = chrono::Utc::now();
            let interval =
                StayInterval::new(entry, entry + chrono::Duration::minutes(95)).unwrap();
            assert_eq!(service.fee_for_stay("avulso", &interval).await.unwrap(), 3000);
            assert_eq!(service.fee_for_stay("diaria", &interval).await.unwrap(), 5000);
        }
    }
}
