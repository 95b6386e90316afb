// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::atomic::{AtomicI64, Ordering};

pub trait IDProvider: Send + Sync {
    fn new_id(&self) -> String;
}

pub struct NanoIDProvider;

impl IDProvider for NanoIDProvider {
    fn new_id(&self) -> String {
        nanoid::nanoid!()
    }
}

/// Deterministic ids for tests: `id-1`, `id-2`, …
pub struct IncrementingIDProvider {
    last_id: AtomicI64,
}

impl IncrementingIDProvider {
    pub fn new() -> Self {
        IncrementingIDProvider {
            last_id: AtomicI64::new(0),
        }
    }

    pub fn reset(&self) {
        self.last_id.store(0, Ordering::SeqCst);
    }
}

impl Default for IncrementingIDProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IDProvider for IncrementingIDProvider {
    fn new_id(&self) -> String {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("id-{}", id)
    }
}
