use crate::types::options_record::typed_options;
use crate::types::{
    AnyOf, BillingThresholdsOptions, ClearProtocol, CollectionMethod, DecimalBounds, FieldSpec,
    FieldValue, Metadata, PaymentBehavior, PendingInvoiceItemIntervalOptions, RecordSpec, ScalarKind,
    SubscriptionItemOptions, SubscriptionTrialEnd, TransferDataOptions, ValueKind,
    BILLING_THRESHOLDS, PENDING_INVOICE_ITEM_INTERVAL, STRING_KIND, SUBSCRIPTION_ITEM,
    TIMESTAMP_KIND, TRANSFER_DATA,
};
use time::OffsetDateTime;

/// `trial_end` takes either a concrete moment or the `now` sentinel.
pub type TrialEnd = AnyOf<OffsetDateTime, SubscriptionTrialEnd>;

impl From<OffsetDateTime> for TrialEnd {
    fn from(value: OffsetDateTime) -> Self {
        AnyOf::from_left(value)
    }
}

impl From<SubscriptionTrialEnd> for TrialEnd {
    fn from(value: SubscriptionTrialEnd) -> Self {
        AnyOf::from_right(value)
    }
}

static TRIAL_END_TOKENS: ValueKind = ValueKind::Sentinel(SubscriptionTrialEnd::TOKENS);
static ITEM_KIND: ValueKind = ValueKind::NestedObject(&SUBSCRIPTION_ITEM);

/// Fields shared by the subscription create and update requests.
///
/// Declaration order is wire order. `tax_percent` is superseded by
/// `default_tax_rates`, and `plan`/`quantity` by `items`; the API still
/// accepts each legacy field alongside its successor.
pub static SUBSCRIPTION_SHARED: RecordSpec = RecordSpec {
    name: "subscription",
    fields: &[
        FieldSpec::new(
            "application_fee_percent",
            ValueKind::Scalar(ScalarKind::Decimal(DecimalBounds::percent(2))),
        ),
        FieldSpec::new("billing_thresholds", ValueKind::ClearableNestedObject(&BILLING_THRESHOLDS))
            .clearable(ClearProtocol::EmptyString),
        FieldSpec::new("cancel_at", ValueKind::Timestamp).clearable(ClearProtocol::EmptyString),
        FieldSpec::new("cancel_at_period_end", ValueKind::Scalar(ScalarKind::Bool)),
        FieldSpec::new("collection_method", ValueKind::Sentinel(CollectionMethod::TOKENS)),
        FieldSpec::new("coupon", ValueKind::Scalar(ScalarKind::String))
            .clearable(ClearProtocol::EmptyString),
        FieldSpec::new("days_until_due", ValueKind::Scalar(ScalarKind::Integer))
            .clearable(ClearProtocol::Null),
        FieldSpec::new("default_payment_method", ValueKind::Scalar(ScalarKind::String)),
        FieldSpec::new("default_source", ValueKind::Scalar(ScalarKind::String)),
        FieldSpec::new("default_tax_rates", ValueKind::ListOf(&STRING_KIND))
            .clearable(ClearProtocol::EmptyString),
        FieldSpec::new("metadata", ValueKind::MapOf).clearable(ClearProtocol::EmptyString),
        FieldSpec::new(
            "pending_invoice_item_interval",
            ValueKind::ClearableNestedObject(&PENDING_INVOICE_ITEM_INTERVAL),
        )
        .clearable(ClearProtocol::EmptyString),
        FieldSpec::new("off_session", ValueKind::Scalar(ScalarKind::Bool)),
        FieldSpec::new("payment_behavior", ValueKind::Sentinel(PaymentBehavior::TOKENS)),
        FieldSpec::new("prorate", ValueKind::Scalar(ScalarKind::Bool)),
        FieldSpec::new(
            "tax_percent",
            ValueKind::Scalar(ScalarKind::Decimal(DecimalBounds::percent(4))),
        )
        .deprecated("default_tax_rates", true),
        FieldSpec::new("trial_end", ValueKind::Either(&TIMESTAMP_KIND, &TRIAL_END_TOKENS)),
        FieldSpec::new("trial_from_plan", ValueKind::Scalar(ScalarKind::Bool)),
        FieldSpec::new("plan", ValueKind::Scalar(ScalarKind::String)).deprecated("items", true),
        FieldSpec::new("quantity", ValueKind::Scalar(ScalarKind::Integer)).deprecated("items", true),
        FieldSpec::new("transfer_data", ValueKind::NestedObject(&TRANSFER_DATA)),
        FieldSpec::new("items", ValueKind::ListOf(&ITEM_KIND)),
        FieldSpec::new("expand", ValueKind::ListOf(&STRING_KIND)),
    ],
    exclusive: &[
        ("cancel_at", "cancel_at_period_end"),
        ("trial_end", "trial_from_plan"),
    ],
};

typed_options!(
    /// Options for creating or updating a subscription.
    SubscriptionSharedOptions,
    SUBSCRIPTION_SHARED
);

impl SubscriptionSharedOptions {
    /// Percentage of each invoice subtotal transferred to the application owner.
    /// Between 0 and 100 with at most two decimal places.
    pub fn with_application_fee_percent(self, percent: f64) -> SubscriptionSharedOptions {
        self.with_value("application_fee_percent", percent)
    }

    pub fn with_billing_thresholds(
        self,
        thresholds: BillingThresholdsOptions,
    ) -> SubscriptionSharedOptions {
        self.with_value("billing_thresholds", thresholds)
    }

    /// Removes previously defined thresholds.
    pub fn clear_billing_thresholds(self) -> SubscriptionSharedOptions {
        self.cleared("billing_thresholds")
    }

    pub fn with_cancel_at(self, at: OffsetDateTime) -> SubscriptionSharedOptions {
        self.with_value("cancel_at", at)
    }

    pub fn clear_cancel_at(self) -> SubscriptionSharedOptions {
        self.cleared("cancel_at")
    }

    pub fn with_cancel_at_period_end(self, cancel: bool) -> SubscriptionSharedOptions {
        self.with_value("cancel_at_period_end", cancel)
    }

    pub fn with_collection_method(self, method: CollectionMethod) -> SubscriptionSharedOptions {
        self.with_value("collection_method", method)
    }

    pub fn with_coupon(self, coupon: impl Into<String>) -> SubscriptionSharedOptions {
        self.with_value("coupon", coupon.into())
    }

    pub fn clear_coupon(self) -> SubscriptionSharedOptions {
        self.cleared("coupon")
    }

    /// Only meaningful with `CollectionMethod::SendInvoice`.
    pub fn with_days_until_due(self, days: i64) -> SubscriptionSharedOptions {
        self.with_value("days_until_due", days)
    }

    pub fn clear_days_until_due(self) -> SubscriptionSharedOptions {
        self.cleared("days_until_due")
    }

    pub fn with_default_payment_method(
        self,
        payment_method: impl Into<String>,
    ) -> SubscriptionSharedOptions {
        self.with_value("default_payment_method", payment_method.into())
    }

    pub fn with_default_source(self, source: impl Into<String>) -> SubscriptionSharedOptions {
        self.with_value("default_source", source.into())
    }

    pub fn with_default_tax_rates(self, tax_rates: Vec<String>) -> SubscriptionSharedOptions {
        self.with_value("default_tax_rates", tax_rates)
    }

    pub fn clear_default_tax_rates(self) -> SubscriptionSharedOptions {
        self.cleared("default_tax_rates")
    }

    /// Replaces all metadata on the subscription.
    pub fn with_metadata(self, metadata: Metadata) -> SubscriptionSharedOptions {
        self.with_value("metadata", metadata)
    }

    pub fn clear_metadata(self) -> SubscriptionSharedOptions {
        self.cleared("metadata")
    }

    pub fn with_pending_invoice_item_interval(
        self,
        interval: PendingInvoiceItemIntervalOptions,
    ) -> SubscriptionSharedOptions {
        self.with_value("pending_invoice_item_interval", interval)
    }

    pub fn clear_pending_invoice_item_interval(self) -> SubscriptionSharedOptions {
        self.cleared("pending_invoice_item_interval")
    }

    pub fn with_off_session(self, off_session: bool) -> SubscriptionSharedOptions {
        self.with_value("off_session", off_session)
    }

    pub fn with_payment_behavior(self, behavior: PaymentBehavior) -> SubscriptionSharedOptions {
        self.with_value("payment_behavior", behavior)
    }

    pub fn with_prorate(self, prorate: bool) -> SubscriptionSharedOptions {
        self.with_value("prorate", prorate)
    }

    #[deprecated(note = "use with_default_tax_rates")]
    pub fn with_tax_percent(self, percent: f64) -> SubscriptionSharedOptions {
        self.with_value("tax_percent", percent)
    }

    /// Ends the trial at the given moment, or immediately with `SubscriptionTrialEnd::Now`.
    pub fn with_trial_end(self, trial_end: impl Into<TrialEnd>) -> SubscriptionSharedOptions {
        self.with_value("trial_end", trial_end.into())
    }

    pub fn with_trial_from_plan(self, trial_from_plan: bool) -> SubscriptionSharedOptions {
        self.with_value("trial_from_plan", trial_from_plan)
    }

    #[deprecated(note = "use with_items")]
    pub fn with_plan(self, plan: impl Into<String>) -> SubscriptionSharedOptions {
        self.with_value("plan", plan.into())
    }

    #[deprecated(note = "use with_items")]
    pub fn with_quantity(self, quantity: i64) -> SubscriptionSharedOptions {
        self.with_value("quantity", quantity)
    }

    pub fn with_transfer_data(self, transfer_data: TransferDataOptions) -> SubscriptionSharedOptions {
        self.with_value("transfer_data", transfer_data)
    }

    pub fn with_items(self, items: Vec<SubscriptionItemOptions>) -> SubscriptionSharedOptions {
        let items = items.into_iter().map(FieldValue::from).collect::<Vec<_>>();
        self.with_value("items", FieldValue::List(items))
    }

    /// Response fields to expand, e.g. `latest_invoice.payment_intent`.
    pub fn with_expand(self, expand: Vec<String>) -> SubscriptionSharedOptions {
        self.with_value("expand", expand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{FromJson, Project, ToJson};
    use crate::projection::OverlapOutcome;
    use crate::types::{BillingInterval, Error, Presence};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn moment() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_735_689_600).unwrap()
    }

    #[test]
    fn declaration_table_is_well_formed() {
        SUBSCRIPTION_SHARED.check().unwrap();
    }

    #[test]
    fn payload_follows_declaration_order() {
        let options = SubscriptionSharedOptions::new()
            .with_expand(vec!["latest_invoice".to_string()])
            .with_prorate(false)
            .with_coupon("SPRING")
            .with_application_fee_percent(12.5);
        let projection = options.project().unwrap();
        assert_eq!(
            projection.keys().collect::<Vec<_>>(),
            vec!["application_fee_percent", "coupon", "prorate", "expand"]
        );
    }

    #[test]
    fn clearable_nested_objects() {
        let set = SubscriptionSharedOptions::new().with_billing_thresholds(
            BillingThresholdsOptions::new()
                .with_amount_gte(5_000)
                .with_reset_billing_cycle_anchor(true),
        );
        assert_eq!(
            set.project().unwrap().to_json(),
            json!({"billing_thresholds": {"amount_gte": 5_000, "reset_billing_cycle_anchor": true}})
        );

        let cleared = SubscriptionSharedOptions::new().clear_billing_thresholds();
        assert_eq!(
            cleared.project().unwrap().to_json(),
            json!({"billing_thresholds": ""})
        );

        let unchanged = SubscriptionSharedOptions::new();
        assert!(!unchanged.project().unwrap().contains_key("billing_thresholds"));
    }

    #[test]
    fn clear_protocols_differ_per_field() {
        let options = SubscriptionSharedOptions::new()
            .clear_coupon()
            .clear_days_until_due()
            .clear_pending_invoice_item_interval();
        assert_eq!(
            options.project().unwrap().to_json(),
            json!({"coupon": "", "days_until_due": null, "pending_invoice_item_interval": ""})
        );
    }

    #[test]
    fn empty_coupon_is_a_clear() {
        let options = SubscriptionSharedOptions::new().with_coupon("");
        assert_eq!(options, SubscriptionSharedOptions::new().clear_coupon());

        let payload = options.project().unwrap().to_json();
        assert_eq!(payload, json!({"coupon": ""}));
        assert_eq!(SubscriptionSharedOptions::from_json(&payload).unwrap(), options);

        let mut dynamic = SubscriptionSharedOptions::new();
        dynamic.record_mut().set("coupon", "").unwrap();
        assert_eq!(dynamic.record().presence("coupon"), Some(&Presence::Clear));
    }

    #[test]
    fn nested_interval_and_transfer_data() {
        let options = SubscriptionSharedOptions::new()
            .with_pending_invoice_item_interval(
                PendingInvoiceItemIntervalOptions::new()
                    .with_interval(BillingInterval::Month)
                    .with_interval_count(3),
            )
            .with_transfer_data(
                TransferDataOptions::new()
                    .with_destination("acct_1")
                    .with_amount_percent(2.25),
            );
        assert_eq!(
            options.project().unwrap().to_json(),
            json!({
                "pending_invoice_item_interval": {"interval": "month", "interval_count": 3},
                "transfer_data": {"destination": "acct_1", "amount_percent": 2.25}
            })
        );
    }

    #[test]
    fn percent_with_too_many_places_is_unencodable() {
        for percent in [10.125, 12.340000001, 12.3400001] {
            let options = SubscriptionSharedOptions::new().with_application_fee_percent(percent);
            assert!(matches!(
                options.project(),
                Err(Error::UnencodableValue { field, .. }) if field == "application_fee_percent"
            ));
        }
        let options = SubscriptionSharedOptions::new().with_application_fee_percent(12.34);
        assert_eq!(
            options.project().unwrap().to_json(),
            json!({"application_fee_percent": 12.34})
        );
    }

    #[test]
    #[allow(deprecated)]
    fn tax_percent_allows_four_places_and_overlaps_default_tax_rates() {
        let options = SubscriptionSharedOptions::new()
            .with_tax_percent(8.1234)
            .with_default_tax_rates(vec!["txr_1".to_string()]);
        let projection = options.project().unwrap();
        assert_eq!(
            projection.to_json(),
            json!({"default_tax_rates": ["txr_1"], "tax_percent": 8.1234})
        );
        assert_eq!(projection.advisories().len(), 1);
        assert_eq!(projection.advisories()[0].field, "tax_percent");
        assert_eq!(projection.advisories()[0].outcome, OverlapOutcome::EmittedBoth);
    }

    #[test]
    fn exclusive_cancel_fields() {
        let options = SubscriptionSharedOptions::new()
            .with_cancel_at(moment())
            .with_cancel_at_period_end(true);
        assert!(matches!(
            options.project(),
            Err(Error::InvalidFieldCombination { field, .. }) if field == "cancel_at"
        ));

        // Clearing `cancel_at` is not a value, so it may accompany the flag.
        let options = SubscriptionSharedOptions::new()
            .clear_cancel_at()
            .with_cancel_at_period_end(true);
        assert_eq!(
            options.project().unwrap().to_json(),
            json!({"cancel_at": "", "cancel_at_period_end": true})
        );
    }

    #[test]
    fn trial_end_and_trial_from_plan_are_exclusive() {
        let options = SubscriptionSharedOptions::new()
            .with_trial_end(SubscriptionTrialEnd::Now)
            .with_trial_from_plan(true);
        assert!(matches!(
            options.project(),
            Err(Error::InvalidFieldCombination { field, .. }) if field == "trial_end"
        ));
    }

    #[test]
    fn items_round_trip_through_decode() {
        let options = SubscriptionSharedOptions::new().with_items(vec![
            SubscriptionItemOptions::new().with_plan("gold").with_quantity(2),
            SubscriptionItemOptions::new().with_id("si_1").with_deleted(true),
        ]);
        let payload = options.project().unwrap().to_json();
        assert_eq!(
            payload,
            json!({"items": [{"plan": "gold", "quantity": 2}, {"id": "si_1", "deleted": true}]})
        );
        assert_eq!(SubscriptionSharedOptions::from_json(&payload).unwrap(), options);
    }

    #[test]
    fn decode_maps_clear_sentinels_back() {
        let decoded =
            SubscriptionSharedOptions::from_json(&json!({"coupon": "", "days_until_due": null}))
                .unwrap();
        assert_eq!(decoded.record().presence("coupon"), Some(&Presence::Clear));
        assert_eq!(decoded.record().presence("days_until_due"), Some(&Presence::Clear));
        assert_eq!(decoded, SubscriptionSharedOptions::new().clear_coupon().clear_days_until_due());
    }

    #[test]
    fn decode_reports_out_of_range_timestamp_on_its_field() {
        assert_eq!(
            SubscriptionSharedOptions::from_json(&json!({"cancel_at": i64::MAX})).unwrap_err(),
            Error::InvalidFieldType {
                field: "cancel_at".to_string(),
                expected: "a timestamp within the supported range".to_string(),
            }
        );
        let err = SubscriptionSharedOptions::from_json(&json!({"collection_method": "by_post"}))
            .unwrap_err();
        assert_eq!(err.field(), Some("collection_method"));
    }

    #[test]
    fn decode_rejects_unknown_keys() {
        assert_eq!(
            SubscriptionSharedOptions::from_json(&json!({"customer": "cus_1"})).unwrap_err(),
            Error::UnknownField {
                record: "subscription".to_string(),
                field: "customer".to_string(),
            }
        );
    }

    #[test]
    fn dynamic_surface_is_checked() {
        let mut options = SubscriptionSharedOptions::new();
        assert!(matches!(
            options
                .record_mut()
                .set("collection_method", FieldValue::Sentinel("by_post".to_string())),
            Err(Error::InvalidFieldType { .. })
        ));
        assert!(matches!(
            options.record_mut().set("metadata", "not a map"),
            Err(Error::InvalidFieldType { .. })
        ));
        options
            .record_mut()
            .set("collection_method", CollectionMethod::SendInvoice)
            .unwrap();
        assert_eq!(
            options.project().unwrap().to_json(),
            json!({"collection_method": "send_invoice"})
        );
    }
}
