//! Process-wide registry mapping `handle_id` to a shared tvar table.
//!
//! This is not the kind of ambient singleton the engine's design notes rule
//! out (there is still no implicit default store — callers must pass a
//! `handle_id` explicitly to opt in), but it is the one piece of global
//! mutable state in this crate, so it is kept small and isolated here.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use jsonstm_core::traits::Storage;
use jsonstm_storage::ShardedStore;

fn registry() -> &'static Mutex<HashMap<u64, Arc<dyn Storage>>> {
    static REGISTRY: OnceLock<Mutex<HashMap<u64, Arc<dyn Storage>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// The shared table for `id`, creating it on first use.
pub fn handle_for(id: u64) -> Arc<dyn Storage> {
    let mut map = registry().lock();
    Arc::clone(
        map.entry(id)
            .or_insert_with(|| Arc::new(ShardedStore::new()) as Arc<dyn Storage>),
    )
}
