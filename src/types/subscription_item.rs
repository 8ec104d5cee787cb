use crate::types::options_record::typed_options;
use crate::types::{
    ClearProtocol, FieldSpec, Metadata, RecordSpec, ScalarKind, ValueKind, STRING_KIND,
};

pub static SUBSCRIPTION_ITEM: RecordSpec = RecordSpec {
    name: "subscription_item",
    fields: &[
        FieldSpec::new("id", ValueKind::Scalar(ScalarKind::String)),
        FieldSpec::new("plan", ValueKind::Scalar(ScalarKind::String)),
        FieldSpec::new("quantity", ValueKind::Scalar(ScalarKind::Integer)),
        FieldSpec::new("deleted", ValueKind::Scalar(ScalarKind::Bool)),
        FieldSpec::new("clear_usage", ValueKind::Scalar(ScalarKind::Bool)),
        FieldSpec::new("metadata", ValueKind::MapOf).clearable(ClearProtocol::EmptyString),
        FieldSpec::new("tax_rates", ValueKind::ListOf(&STRING_KIND))
            .clearable(ClearProtocol::EmptyString),
    ],
    exclusive: &[],
};

typed_options!(
    /// One entry of a subscription's `items` list.
    ///
    /// With an `id` the entry updates that existing item; without one it adds
    /// a new item for `plan`.
    SubscriptionItemOptions,
    SUBSCRIPTION_ITEM
);

impl SubscriptionItemOptions {
    pub fn with_id(self, id: impl Into<String>) -> SubscriptionItemOptions {
        self.with_value("id", id.into())
    }

    pub fn with_plan(self, plan: impl Into<String>) -> SubscriptionItemOptions {
        self.with_value("plan", plan.into())
    }

    pub fn with_quantity(self, quantity: i64) -> SubscriptionItemOptions {
        self.with_value("quantity", quantity)
    }

    /// Removes the item identified by `id` from the subscription.
    pub fn with_deleted(self, deleted: bool) -> SubscriptionItemOptions {
        self.with_value("deleted", deleted)
    }

    pub fn with_clear_usage(self, clear_usage: bool) -> SubscriptionItemOptions {
        self.with_value("clear_usage", clear_usage)
    }

    pub fn with_metadata(self, metadata: Metadata) -> SubscriptionItemOptions {
        self.with_value("metadata", metadata)
    }

    pub fn clear_metadata(self) -> SubscriptionItemOptions {
        self.cleared("metadata")
    }

    pub fn with_tax_rates(self, tax_rates: Vec<String>) -> SubscriptionItemOptions {
        self.with_value("tax_rates", tax_rates)
    }

    pub fn clear_tax_rates(self) -> SubscriptionItemOptions {
        self.cleared("tax_rates")
    }
}
