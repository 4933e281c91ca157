//! Razorpay request types.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency every order is created in.
pub const CURRENCY: &str = "INR";

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateOrderRequest {
    /// Amount in paise.
    pub amount: u64,
    pub currency: &'static str,
    /// 1 = capture automatically once authorized.
    pub payment_capture: u8,
    pub receipt: String,
}

impl CreateOrderRequest {
    #[must_use]
    pub fn new(amount_paise: u64, receipt: String) -> Self {
        Self {
            amount: amount_paise,
            currency: CURRENCY,
            payment_capture: 1,
            receipt,
        }
    }
}

/// Fields the checkout widget hands back after payment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentVerification {
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

impl PaymentVerification {
    /// The three fields, if all are present and non-blank.
    #[must_use]
    pub fn fields(&self) -> Option<(&str, &str, &str)> {
        fn non_blank(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|s| !s.is_empty())
        }

        Some((
            non_blank(self.razorpay_order_id.as_deref())?,
            non_blank(self.razorpay_payment_id.as_deref())?,
            non_blank(self.razorpay_signature.as_deref())?,
        ))
    }
}

/// Convert major units (rupees) to paise, rounding half away from zero.
///
/// Returns `None` for negative amounts or amounts too large for `u64`.
#[must_use]
pub fn paise_from_major(amount: Decimal) -> Option<u64> {
    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
}
