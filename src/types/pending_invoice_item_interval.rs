use crate::types::options_record::typed_options;
use crate::types::{BillingInterval, FieldSpec, RecordSpec, ScalarKind, ValueKind};

pub static PENDING_INVOICE_ITEM_INTERVAL: RecordSpec = RecordSpec {
    name: "pending_invoice_item_interval",
    fields: &[
        FieldSpec::new("interval", ValueKind::Sentinel(BillingInterval::TOKENS)),
        FieldSpec::new("interval_count", ValueKind::Scalar(ScalarKind::Integer)),
    ],
    exclusive: &[],
};

typed_options!(
    /// How often pending invoice items are billed.
    PendingInvoiceItemIntervalOptions,
    PENDING_INVOICE_ITEM_INTERVAL
);

impl PendingInvoiceItemIntervalOptions {
    pub fn with_interval(self, interval: BillingInterval) -> PendingInvoiceItemIntervalOptions {
        self.with_value("interval", interval)
    }

    /// Number of intervals between invoices, e.g. `3` with `Month` is quarterly.
    pub fn with_interval_count(self, count: i64) -> PendingInvoiceItemIntervalOptions {
        self.with_value("interval_count", count)
    }
}
