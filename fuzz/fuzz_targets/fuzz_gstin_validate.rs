#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic — errors are fine, panics are bugs.
        if let Ok(gstin) = gstin_tracker::core::validate_gstin(s) {
            assert!(gstin_tracker::core::validate_gstin_check_digit(&gstin).is_ok());
        }
        let _ = gstin_tracker::core::needs_transporter_api(s);
    }
});
