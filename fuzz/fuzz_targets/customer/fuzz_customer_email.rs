// cargo fuzz run fuzz_customer_email
// Looks for panics and validation bypasses in buyer email parsing.
#![no_main]

use libfuzzer_sys::fuzz_target;
use newsletter_bridge::domain::CustomerEmail;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(email) = CustomerEmail::parse(s.to_string()) {
            assert!(email.as_ref().contains('@'));
        }
    }
});
