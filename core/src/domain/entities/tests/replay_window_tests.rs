//! Tests for the replay-record window math.

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::entities::used_code::UsedOneTimeCode;

#[test]
fn used_code_key_identifies_the_tuple() {
    let user = Uuid::new_v4();
    let expires = Utc::now() + Duration::seconds(90);
    let a = UsedOneTimeCode::new(user, "hash".into(), 1000, expires);
    let b = UsedOneTimeCode::new(user, "hash".into(), 1000, expires + Duration::seconds(5));
    let c = UsedOneTimeCode::new(user, "hash".into(), 1001, expires);

    assert_eq!(a.key(), b.key());
    assert_ne!(a.key(), c.key());
}

#[test]
fn used_code_expiry_boundary() {
    let expires = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
    let rec = UsedOneTimeCode::new(Uuid::new_v4(), "hash".into(), 42, expires);

    assert!(!rec.is_expired(expires - Duration::seconds(1)));
    assert!(rec.is_expired(expires));
}
