//! Parking fee calculator
//!
//! The one piece of real domain logic in the system: given an elapsed stay
//! duration and a tariff profile, compute the amount owed. All amounts are
//! in minor currency units (centavos) — integer arithmetic only, never
//! binary floating point.
//!
//! The calculator is pure and stateless: no I/O, deterministic, safe to call
//! from any number of request tasks without synchronization.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::error::{DomainError, DomainResult};

/// Minutes covered by the grace amount of a tiered profile.
const GRACE_MINUTES: i64 = 20;
/// Minutes covered by the first-hour amount of a tiered profile.
const FIRST_HOUR_MINUTES: i64 = 60;

/// How a tariff profile bills a stay.
///
/// The per-mode amounts live in the enum payload, so a tiered profile can
/// never carry flat-amount semantics and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingMode {
    /// Grace amount for short stays, then a first-hour amount, then metered
    /// additional hours (partial hours round up).
    Tiered {
        /// Charged for stays of up to 20 minutes.
        first_20_min: i64,
        /// Charged for stays of 21–60 minutes.
        first_hour: i64,
        /// Charged per additional started hour beyond the first.
        additional_hour: i64,
    },
    /// Fixed amount regardless of duration (e.g. day rate, monthly pass).
    Flat { fixed_amount: i64 },
}

/// A named pricing rule, resolved from the registry by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TariffProfile {
    /// Unique identifier (e.g. "avulso", "mensalista"). Case-sensitive.
    pub key: String,
    /// Human-readable label.
    pub display_name: String,
    pub mode: BillingMode,
}

/// The elapsed time a vehicle occupied a spot, from check-in to check-out.
///
/// Constructed once at fee-computation time from the persisted entry/exit
/// records; immutable, not stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayInterval {
    entry: DateTime<Utc>,
    exit: DateTime<Utc>,
}

impl StayInterval {
    /// Fails with `InvalidInterval` when `exit` precedes `entry`.
    pub fn new(entry: DateTime<Utc>, exit: DateTime<Utc>) -> DomainResult<Self> {
        if exit < entry {
            return Err(DomainError::InvalidInterval(format!(
                "exit {} precedes entry {}",
                exit, entry
            )));
        }
        Ok(Self { entry, exit })
    }

    pub fn entry(&self) -> DateTime<Utc> {
        self.entry
    }

    pub fn exit(&self) -> DateTime<Utc> {
        self.exit
    }

    /// Whole minutes between entry and exit, rounded down. Always >= 0.
    pub fn elapsed_minutes(&self) -> i64 {
        (self.exit - self.entry).num_minutes()
    }
}

/// Compute the fee for a stay of `elapsed_minutes` under `profile`.
///
/// Tier boundaries (inclusive upper bounds):
/// - up to 20 min → grace amount
/// - 21–60 min → first-hour amount
/// - beyond 60 min → first-hour amount plus one additional-hour amount per
///   *started* hour (ceiling, not floor — a 61st minute past the first hour
///   bills a full extra hour)
///
/// Flat profiles ignore the duration entirely.
pub fn compute_fee(elapsed_minutes: i64, profile: &TariffProfile) -> DomainResult<i64> {
    if elapsed_minutes < 0 {
        return Err(DomainError::InvalidInterval(format!(
            "negative elapsed duration: {} minutes",
            elapsed_minutes
        )));
    }

    match profile.mode {
        BillingMode::Flat { fixed_amount } => Ok(fixed_amount),
        BillingMode::Tiered {
            first_20_min,
            first_hour,
            additional_hour,
        } => {
            if elapsed_minutes <= GRACE_MINUTES {
                Ok(first_20_min)
            } else if elapsed_minutes <= FIRST_HOUR_MINUTES {
                Ok(first_hour)
            } else {
                let extra_minutes = elapsed_minutes - FIRST_HOUR_MINUTES;
                // Ceiling without risking `extra_minutes + 59` overflowing.
                let extra_hours = extra_minutes / 60 + i64::from(extra_minutes % 60 != 0);
                extra_hours
                    .checked_mul(additional_hour)
                    .and_then(|metered| first_hour.checked_add(metered))
                    .ok_or_else(|| {
                        DomainError::InvalidInterval(format!(
                            "stay of {} minutes overflows the fee computation",
                            elapsed_minutes
                        ))
                    })
            }
        }
    }
}

/// Format a minor-unit amount as a decimal string, e.g. `3000` → `"30.00"`.
pub fn format_amount(amount: i64) -> String {
    format!("{}.{:02}", amount / 100, (amount % 100).abs())
}

/// Immutable mapping from tariff key to profile.
///
/// Populated from the pricing-rule table at startup (and rebuilt on
/// configuration change); the single authoritative source of tariff data,
/// replacing the per-screen rate tables the legacy system duplicated.
#[derive(Debug, Clone, Default)]
pub struct TariffRegistry {
    profiles: HashMap<String, TariffProfile>,
}

impl TariffRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = TariffProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.key.clone(), p))
                .collect(),
        }
    }

    pub fn insert(&mut self, profile: TariffProfile) {
        self.profiles.insert(profile.key.clone(), profile);
    }

    /// Case-sensitive exact-match lookup. Fails with `UnknownProfile` when
    /// the key is absent.
    pub fn resolve(&self, key: &str) -> DomainResult<&TariffProfile> {
        self.profiles
            .get(key)
            .ok_or_else(|| DomainError::UnknownProfile(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &TariffProfile> {
        self.profiles.values()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn avulso() -> TariffProfile {
        TariffProfile {
            key: "avulso".into(),
            display_name: "Avulso".into(),
            mode: BillingMode::Tiered {
                first_20_min: 500,     // 5.00
                first_hour: 2000,      // 20.00
                additional_hour: 1000, // 10.00
            },
        }
    }

    fn diaria() -> TariffProfile {
        TariffProfile {
            key: "diaria".into(),
            display_name: "Diária".into(),
            mode: BillingMode::Flat { fixed_amount: 5000 },
        }
    }

    #[test]
    fn grace_period_charges_first_20_min_amount() {
        assert_eq!(compute_fee(0, &avulso()).unwrap(), 500);
        assert_eq!(compute_fee(13, &avulso()).unwrap(), 500);
        assert_eq!(compute_fee(20, &avulso()).unwrap(), 500);
    }

    #[test]
    fn first_hour_boundary_is_exact() {
        assert_eq!(compute_fee(21, &avulso()).unwrap(), 2000);
        assert_eq!(compute_fee(60, &avulso()).unwrap(), 2000);
    }

    #[test]
    fn additional_hours_round_up() {
        // one minute past the first hour bills a full extra hour
        assert_eq!(compute_fee(61, &avulso()).unwrap(), 3000);
        assert_eq!(compute_fee(120, &avulso()).unwrap(), 3000);
        // 61 minutes past the first hour rounds up to 2 additional hours
        assert_eq!(compute_fee(121, &avulso()).unwrap(), 4000);
    }

    #[test]
    fn ninety_five_minute_stay_bills_thirty() {
        // 20.00 + ceil(35/60) * 10.00 = 30.00
        assert_eq!(compute_fee(95, &avulso()).unwrap(), 3000);
    }

    #[test]
    fn flat_profile_ignores_duration() {
        for minutes in [0, 20, 61, 600, 100_000] {
            assert_eq!(compute_fee(minutes, &diaria()).unwrap(), 5000);
        }
    }

    #[test]
    fn fee_is_monotonic_in_duration() {
        let profile = avulso();
        let mut last = 0;
        for minutes in 0..600 {
            let fee = compute_fee(minutes, &profile).unwrap();
            assert!(fee >= last, "fee decreased at {} minutes", minutes);
            last = fee;
        }
    }

    #[test]
    fn absurd_duration_fails_instead_of_wrapping() {
        // durations near i64::MAX must surface an error, not a garbage fee
        for minutes in [i64::MAX, i64::MAX - 1000] {
            let err = compute_fee(minutes, &avulso()).unwrap_err();
            assert!(matches!(err, DomainError::InvalidInterval(_)));
        }
        // flat profiles are duration-independent and stay fine
        assert_eq!(compute_fee(i64::MAX, &diaria()).unwrap(), 5000);
    }

    #[test]
    fn negative_duration_is_rejected() {
        let err = compute_fee(-5, &avulso()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInterval(_)));
        let err = compute_fee(-5, &diaria()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInterval(_)));
    }

    #[test]
    fn registry_resolves_exact_key_only() {
        let registry = TariffRegistry::from_profiles([avulso(), diaria()]);
        assert_eq!(registry.resolve("avulso").unwrap().display_name, "Avulso");
        // case-sensitive, no fuzzy matching
        assert!(matches!(
            registry.resolve("Avulso").unwrap_err(),
            DomainError::UnknownProfile(_)
        ));
        assert!(matches!(
            registry.resolve("does_not_exist").unwrap_err(),
            DomainError::UnknownProfile(_)
        ));
    }

    #[test]
    fn stay_interval_floors_partial_minutes() {
        let entry = Utc::now();
        let interval = StayInterval::new(entry, entry + Duration::seconds(119)).unwrap();
        assert_eq!(interval.elapsed_minutes(), 1);
    }

    #[test]
    fn stay_interval_rejects_exit_before_entry() {
        let entry = Utc::now();
        let err = StayInterval::new(entry, entry - Duration::minutes(1)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInterval(_)));
    }

    #[test]
    fn zero_length_stay_is_valid() {
        let entry = Utc::now();
        let interval = StayInterval::new(entry, entry).unwrap();
        assert_eq!(interval.elapsed_minutes(), 0);
    }

    #[test]
    fn amount_formatting() {
        assert_eq!(format_amount(3000), "30.00");
        assert_eq!(format_amount(505), "5.05");
        assert_eq!(format_amount(0), "0.00");
    }
}
