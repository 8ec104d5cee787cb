pub mod any_of;
pub mod billing_thresholds;
pub mod error;
pub mod field_value;
pub mod metadata;
pub mod options_record;
pub mod pending_invoice_item_interval;
pub mod presence;
pub mod sentinel;
pub mod subscription_item;
pub mod subscription_shared_options;
pub mod timestamp;
pub mod transfer_data;
pub mod value_kind;

pub use any_of::{AnyOf, OneOf};
pub use billing_thresholds::{BillingThresholdsOptions, BILLING_THRESHOLDS};
pub use error::Error;
pub use field_value::FieldValue;
pub use metadata::Metadata;
pub use options_record::OptionsRecord;
pub use pending_invoice_item_interval::{
    PendingInvoiceItemIntervalOptions, PENDING_INVOICE_ITEM_INTERVAL,
};
pub use presence::Presence;
pub use sentinel::{BillingInterval, CollectionMethod, PaymentBehavior, SubscriptionTrialEnd};
pub use subscription_item::{SubscriptionItemOptions, SUBSCRIPTION_ITEM};
pub use subscription_shared_options::{SubscriptionSharedOptions, TrialEnd, SUBSCRIPTION_SHARED};
pub use transfer_data::{TransferDataOptions, TRANSFER_DATA};
pub use value_kind::{
    ClearProtocol, DecimalBounds, Deprecation, FieldSpec, RecordSpec, ScalarKind, ValueKind,
    STRING_KIND, TIMESTAMP_KIND,
};
