// cargo fuzz run fuzz_product_list_selection
// Stored selections come back from the host store untyped; reading them must not panic.
#![no_main]

use libfuzzer_sys::fuzz_target;
use newsletter_bridge::domain::ProductListSelection;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice(data) {
        if let Ok(selection) = ProductListSelection::from_value(value) {
            let stored = selection.to_value();
            let reread = ProductListSelection::from_value(stored).map(|s| s.len());
            assert_eq!(reread, Ok(selection.len()));
        }
    }
});
