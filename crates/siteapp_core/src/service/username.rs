//! Username derivation and allocation.
//!
//! # Invariants
//! - Normalized usernames only contain `[a-z0-9._-]` and are never empty.
//! - An allocated username did not exist (ignoring case) when it was checked.
//!   Two concurrent registrations can still race; the unique index rejects
//!   the loser.

use crate::repo::account_repo::AccountRepository;
use crate::repo::RepoResult;
use once_cell::sync::Lazy;
use regex::Regex;

/// Used when neither a username nor an email yields any allowed character.
pub const FALLBACK_USERNAME: &str = "user";

static DISALLOWED_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9._-]+").expect("valid username regex"));

/// Lowercases `input`, keeps the part before the first `@` and strips every
/// character outside `[a-z0-9._-]`.
pub fn normalize_username(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let local_part = lowered.split('@').next().unwrap_or_default();
    let cleaned = DISALLOWED_CHARS_RE.replace_all(local_part, "");
    if cleaned.is_empty() {
        FALLBACK_USERNAME.to_string()
    } else {
        cleaned.into_owned()
    }
}

/// Picks the allocation base: explicit username, else email, else fallback.
pub fn username_base(username: &str, email: Option<&str>) -> String {
    let username = username.trim();
    if !username.is_empty() {
        return normalize_username(username);
    }
    match email.map(str::trim).filter(|email| !email.is_empty()) {
        Some(email) => normalize_username(email),
        None => FALLBACK_USERNAME.to_string(),
    }
}

/// Returns `candidate`, or `candidate1`, `candidate2`, ... whichever is the
/// first one not taken.
pub fn allocate_username<R>(repo: &R, candidate: &str) -> RepoResult<String>
where
    R: AccountRepository + ?Sized,
{
    if !repo.username_exists_ci(candidate)? {
        return Ok(candidate.to_string());
    }

    let mut suffix: u64 = 1;
    loop {
        let attempt = format!("{candidate}{suffix}");
        if !repo.username_exists_ci(&attempt)? {
            return Ok(attempt);
        }
        suffix += 1;
    }
}
