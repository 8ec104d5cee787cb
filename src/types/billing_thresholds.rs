use crate::types::options_record::typed_options;
use crate::types::{FieldSpec, RecordSpec, ScalarKind, ValueKind};

pub static BILLING_THRESHOLDS: RecordSpec = RecordSpec {
    name: "billing_thresholds",
    fields: &[
        FieldSpec::new("amount_gte", ValueKind::Scalar(ScalarKind::Integer)),
        FieldSpec::new("reset_billing_cycle_anchor", ValueKind::Scalar(ScalarKind::Bool)),
    ],
    exclusive: &[],
};

typed_options!(
    /// Thresholds at which an invoice is sent and the billing period advanced.
    BillingThresholdsOptions,
    BILLING_THRESHOLDS
);

impl BillingThresholdsOptions {
    /// Monetary threshold, in the smallest currency unit.
    pub fn with_amount_gte(self, amount: i64) -> BillingThresholdsOptions {
        self.with_value("amount_gte", amount)
    }

    pub fn with_reset_billing_cycle_anchor(self, reset: bool) -> BillingThresholdsOptions {
        self.with_value("reset_billing_cycle_anchor", reset)
    }
}
