//! Visibility policy for stays and key codes
//!
//! The selection rules are plain functions over already-loaded records so they
//! can be checked without a store; the async wrappers only fetch.

use chrono::{DateTime, Utc};
use staykey_common::error::DatabaseResult;
use uuid::Uuid;

use crate::{
    models::{Account, KeyCode, Stay},
    repositories::{KeyCodeStore, StayStore},
};

/// The active stay of `account_id` at `now`
///
/// When several stays overlap, the one with the latest check-in wins, then
/// the most recently created, then the greatest id.
pub fn select_active_stay(stays: &[Stay], account_id: Uuid, now: DateTime<Utc>) -> Option<&Stay> {
    stays
        .iter()
        .filter(|stay| stay.account_id == account_id && stay.is_active_at(now))
        .max_by(|a, b| {
            a.check_in
                .cmp(&b.check_in)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        })
}

/// Key codes `account` may see at `now`
///
/// Admins see every key code regardless of validity. Clients see the
/// currently valid codes of their active stay's apartment, or nothing.
pub fn select_visible_key_codes(
    account: &Account,
    now: DateTime<Utc>,
    stays: &[Stay],
    key_codes: &[KeyCode],
) -> Vec<KeyCode> {
    if account.is_admin() {
        return key_codes.to_vec();
    }

    let Some(stay) = select_active_stay(stays, account.id, now) else {
        return Vec::new();
    };

    key_codes
        .iter()
        .filter(|key_code| key_code.apartment_id == stay.apartment_id && key_code.is_valid_at(now))
        .cloned()
        .collect()
}

/// Load the active stay of `account` at `now`
pub async fn active_stay<S: StayStore>(
    stays: &S,
    account: &Account,
    now: DateTime<Utc>,
) -> DatabaseResult<Option<Stay>> {
    let candidates = stays.active_stays(account.id, now).await?;
    Ok(select_active_stay(&candidates, account.id, now).cloned())
}

/// Load the key codes `account` may see at `now`
pub async fn visible_key_codes<S, K>(
    stays: &S,
    key_codes: &K,
    account: &Account,
    now: DateTime<Utc>,
) -> DatabaseResult<Vec<KeyCode>>
where
    S: StayStore,
    K: KeyCodeStore,
{
    if account.is_admin() {
        return key_codes.list_key_codes().await;
    }

    let Some(stay) = active_stay(stays, account, now).await? else {
        return Ok(Vec::new());
    };

    let codes = key_codes.key_codes_for_apartment(stay.apartment_id).await?;
    Ok(codes
        .into_iter()
        .filter(|key_code| key_code.is_valid_at(now))
        .collect())
}
