use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::{CustomerInfo, CustomerPayload, ProviderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(i64);

impl PaymentId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for PaymentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn one() -> u32 {
    1
}

/// One line of a payment's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "one")]
    pub quantity: u32,
}

/// The checkout form as submitted by the buyer: the ids of every provider whose
/// signup box was ticked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CheckoutSubmission {
    #[serde(default)]
    signups: BTreeSet<String>,
}

impl CheckoutSubmission {
    pub fn opting_in<I, S>(provider_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            signups: provider_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn opted_in(&self, provider_id: &ProviderId) -> bool {
        self.signups.contains(provider_id.as_ref())
    }
}

/// Everything the host knows about a payment at the moment it is created.
#[derive(Debug, Clone)]
pub struct PaymentData {
    pub customer: CustomerInfo,
    pub cart_items: Vec<CartItem>,
    pub submission: CheckoutSubmission,
}

#[derive(Deserialize, Debug)]
pub struct PaymentDataPayload {
    pub customer: CustomerPayload,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub submission: CheckoutSubmission,
}

impl TryFrom<PaymentDataPayload> for PaymentData {
    type Error = String;

    fn try_from(payload: PaymentDataPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            customer: payload.customer.try_into()?,
            cart_items: payload.cart_items,
            submission: payload.submission,
        })
    }
}
