use crate::types::options_record::typed_options;
use crate::types::{DecimalBounds, FieldSpec, RecordSpec, ScalarKind, ValueKind};

pub static TRANSFER_DATA: RecordSpec = RecordSpec {
    name: "transfer_data",
    fields: &[
        FieldSpec::new("destination", ValueKind::Scalar(ScalarKind::String)),
        FieldSpec::new(
            "amount_percent",
            ValueKind::Scalar(ScalarKind::Decimal(DecimalBounds::percent(2))),
        ),
    ],
    exclusive: &[],
};

typed_options!(
    /// Where part of each invoice is transferred to.
    TransferDataOptions,
    TRANSFER_DATA
);

impl TransferDataOptions {
    /// Account id the transfer goes to.
    pub fn with_destination(self, destination: impl Into<String>) -> TransferDataOptions {
        self.with_value("destination", destination.into())
    }

    pub fn with_amount_percent(self, percent: f64) -> TransferDataOptions {
        self.with_value("amount_percent", percent)
    }
}
