#![no_main]

use gstin_tracker::api::{PublicGstinInfo, normalize_public};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(info) = serde_json::from_slice::<PublicGstinInfo>(data) {
        if let Ok(update) = normalize_public(info) {
            assert!(update.details.is_some());
        }
    }
});
