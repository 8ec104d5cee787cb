/// Whether a field takes part in the outbound payload.
///
/// `Unset` and `Clear` are distinct: an unset field is left out
/// of the payload (the remote value is left alone) while a cleared field is
/// sent with the field's clear sentinel so the remote value is removed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Presence<T> {
    #[default]
    Unset,
    Value(T),
    Clear,
}

impl<T> Presence<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Presence::Unset)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Presence::Value(_))
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Presence::Clear)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Presence::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Presence<U> {
        match self {
            Presence::Unset => Presence::Unset,
            Presence::Value(v) => Presence::Value(f(v)),
            Presence::Clear => Presence::Clear,
        }
    }
}

impl<T> From<Option<T>> for Presence<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Presence::Value(v),
            None => Presence::Unset,
        }
    }
}
