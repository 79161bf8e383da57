//! Opaque `state` values tying a callback to the login that started it.
//!
//! Storing the generated value between the redirect and the callback is the
//! host application's job (usually its session).

use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

use crate::auth::error::{invalid_state, SocialResult};

const STATE_BYTES: usize = 24;

/// Generates a random, URL-safe state value.
pub fn generate_state() -> String {
    let mut bytes = [0u8; STATE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Checks the callback's `state` parameter against the value issued earlier.
pub fn verify_state(params: &HashMap<String, String>, expected: &str) -> SocialResult<()> {
    let received = params
        .get("state")
        .ok_or_else(|| invalid_state("Callback is missing the `state` parameter"))?;
    if expected.is_empty() || !constant_time_eq(received.as_bytes(), expected.as_bytes()) {
        return Err(invalid_state("Callback `state` does not match the issued value"));
    }
    Ok(())
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
