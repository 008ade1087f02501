// cargo fuzz run fuzz_payment_created_json
// Feeds arbitrary JSON through the payment-created payload conversion.
#![no_main]

use libfuzzer_sys::fuzz_target;
use newsletter_bridge::domain::{PaymentData, PaymentDataPayload, ProviderId};

fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = serde_json::from_slice::<PaymentDataPayload>(data) {
        if let Ok(payment) = PaymentData::try_from(payload) {
            if let Ok(id) = ProviderId::parse("aweber".to_string()) {
                let _ = payment.submission.opted_in(&id);
            }
            let _ = payment.customer.full_name();
        }
    }
});
