use snafu::Snafu;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// A value did not match the declared kind of the field it was assigned to.
    #[snafu(display("invalid value for `{field}`: expected {expected}"))]
    InvalidFieldType { field: String, expected: String },

    #[snafu(display("`{field}` is not a field of {record}"))]
    UnknownField { record: String, field: String },

    /// Fields (or union branches) that must not be populated together.
    #[snafu(display("invalid combination at `{field}`: {reason}"))]
    InvalidFieldCombination { field: String, reason: String },

    #[snafu(display("cannot encode `{field}`: {reason}"))]
    UnencodableValue { field: String, reason: String },

    #[snafu(display("`{raw}` does not match any branch of the union"))]
    UnrecognizedUnionVariant { raw: String },

    #[snafu(display("`{value}` is not a known {kind} value"))]
    UnknownSentinel { kind: String, value: String },

    #[snafu(display("expected a JSON array"))]
    JsonExpectedArray,
    #[snafu(display("expected a JSON object"))]
    JsonExpectedObject,
    #[snafu(display("expected a JSON integer"))]
    JsonExpectedI64,
    #[snafu(display("expected a JSON number"))]
    JsonExpectedF64,
    #[snafu(display("expected a JSON string"))]
    JsonExpectedString,
    #[snafu(display("expected a JSON bool"))]
    JsonExpectedBool,
}

impl Error {
    /// The dotted field path the error refers to, when it has one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::InvalidFieldType { field, .. }
            | Error::UnknownField { field, .. }
            | Error::InvalidFieldCombination { field, .. }
            | Error::UnencodableValue { field, .. } => Some(field),
            _ => None,
        }
    }
}
