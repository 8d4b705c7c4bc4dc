//! Time-based expiration policy.
//!
//! Expiry is evaluated lazily against a caller-supplied `now`; nothing here
//! reads the clock.

use chrono::{DateTime, TimeDelta, Utc};

/// Whether a session created at `created_at` is stale at `now`.
///
/// A non-positive duration disables expiration. Otherwise the session
/// expires strictly after `created_at + duration_seconds`.
pub fn is_expired(created_at: DateTime<Utc>, duration_seconds: i64, now: DateTime<Utc>) -> bool {
    match expires_at(created_at, duration_seconds) {
        None => false,
        Some(deadline) => now > deadline,
    }
}

/// The instant a session stops being valid, if it ever does.
///
/// Returns `None` when expiration is disabled or the deadline lies beyond
/// the representable range (which is the same thing in practice).
pub fn expires_at(created_at: DateTime<Utc>, duration_seconds: i64) -> Option<DateTime<Utc>> {
    if duration_seconds <= 0 {
        return None;
    }
    TimeDelta::try_seconds(duration_seconds).and_then(|d| created_at.checked_add_signed(d))
}

/// Configured session lifetime in whole seconds. Zero means sessions never
/// expire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionDuration(u64);

impl SessionDuration {
    /// Expiration disabled.
    pub const DISABLED: Self = Self(0);

    /// Create from a number of seconds.
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Create from a signed value as read from configuration; negative
    /// values disable expiration.
    pub fn from_signed_secs(secs: i64) -> Self {
        Self(u64::try_from(secs).unwrap_or(0))
    }

    /// Lifetime in seconds.
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Whether expiration is enabled at all.
    pub fn is_enabled(&self) -> bool {
        self.0 > 0
    }

    /// Apply the policy to a record created at `created_at`.
    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        is_expired(created_at, self.signed(), now)
    }

    /// Deadline for a record created at `created_at`.
    pub fn expires_at(&self, created_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        expires_at(created_at, self.signed())
    }

    fn signed(&self) -> i64 {
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }
}

impl std::fmt::Display for SessionDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_enabled() {
            write!(f, "{}s", self.0)
        } else {
            write!(f, "disabled")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_zero_duration_never_expires() {
        let far_future = t0() + TimeDelta::days(365 * 100);
        assert!(!is_expired(t0(), 0, far_future));
        assert!(expires_at(t0(), 0).is_none());
    }

    #[test]
    fn test_negative_duration_never_expires() {
        assert!(!is_expired(t0(), -5, t0() + TimeDelta::days(1)));
    }

    #[test]
    fn test_boundary_is_not_expired() {
        // Expiry is strict: exactly at the deadline the session is still valid.
        let deadline = t0() + TimeDelta::seconds(10);
        assert!(!is_expired(t0(), 10, deadline));
        assert!(is_expired(t0(), 10, deadline + TimeDelta::nanoseconds(1)));
    }

    #[test]
    fn test_sub_second_evaluation() {
        assert!(!is_expired(t0(), 1, t0() + TimeDelta::milliseconds(500)));
        assert!(is_expired(t0(), 1, t0() + TimeDelta::milliseconds(1500)));
    }

    #[test]
    fn test_overflowing_duration_never_expires() {
        assert!(expires_at(t0(), i64::MAX).is_none());
        assert!(!is_expired(t0(), i64::MAX, DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_session_duration_from_signed() {
        assert_eq!(SessionDuration::from_signed_secs(-1), SessionDuration::DISABLED);
        assert_eq!(SessionDuration::from_signed_secs(30).as_secs(), 30);
        assert!(!SessionDuration::DISABLED.is_enabled());
        assert_eq!(SessionDuration::from_secs(5).to_string(), "5s");
        assert_eq!(SessionDuration::DISABLED.to_string(), "disabled");
    }

    #[test]
    fn test_session_duration_deadline() {
        let d = SessionDuration::from_secs(60);
        assert_eq!(d.expires_at(t0()), Some(t0() + TimeDelta::seconds(60)));
        assert!(SessionDuration::DISABLED.expires_at(t0()).is_none());
    }

    proptest! {
        /// Property: before the deadline a session is live, after it is stale.
        #[test]
        fn expiry_splits_at_deadline(d in 1i64..1_000_000, offset_ms in 1i64..1_000_000_000) {
            let created = t0();
            let deadline = created + TimeDelta::seconds(d);

            let before = deadline - TimeDelta::milliseconds(offset_ms);
            let after = deadline + TimeDelta::milliseconds(offset_ms);

            prop_assert!(!is_expired(created, d, before));
            prop_assert!(is_expired(created, d, after));
        }

        /// Property: disabled expiration holds at any elapsed time.
        #[test]
        fn disabled_never_expires(elapsed_secs in 0i64..10_000_000_000) {
            let now = t0() + TimeDelta::seconds(elapsed_secs);
            prop_assert!(!SessionDuration::DISABLED.is_expired(t0(), now));
        }
    }
}
