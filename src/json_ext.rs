/// Extensions for serde_json::Value to make some of the things we need to do repeatedly easier.
use crate::types::Error;

pub trait JsonValueExt {
    fn flat_map_array<F, T>(&self, f: F) -> Result<Vec<T>, Error>
    where
        F: FnMut((usize, &Self)) -> Result<T, Error>;

    fn as_object_or_err(&self) -> Result<&serde_json::Map<String, Self>, Error>
    where
        Self: Sized;

    fn to_i64_or_err(&self) -> Result<i64, Error>;
    fn to_f64_or_err(&self) -> Result<f64, Error>;
    fn to_bool_or_err(&self) -> Result<bool, Error>;
    fn to_string_or_err(&self) -> Result<String, Error>;

    /// Short rendering of a raw value for error messages.
    fn describe(&self) -> String;
}

impl JsonValueExt for serde_json::Value {
    fn flat_map_array<F, T>(&self, f: F) -> Result<Vec<T>, Error>
    where
        F: FnMut((usize, &Self)) -> Result<T, Error>,
    {
        // First check it's an array
        let array = self.as_array().ok_or(Error::JsonExpectedArray)?;
        array.iter().enumerate().map(f).collect()
    }

    fn as_object_or_err(&self) -> Result<&serde_json::Map<String, Self>, Error> {
        self.as_object().ok_or(Error::JsonExpectedObject)
    }

    fn to_i64_or_err(&self) -> Result<i64, Error> {
        // Floats are rejected even when integral, `as_i64` only accepts integer numbers.
        self.as_i64().ok_or(Error::JsonExpectedI64)
    }

    fn to_f64_or_err(&self) -> Result<f64, Error> {
        self.as_f64().ok_or(Error::JsonExpectedF64)
    }

    fn to_bool_or_err(&self) -> Result<bool, Error> {
        self.as_bool().ok_or(Error::JsonExpectedBool)
    }

    fn to_string_or_err(&self) -> Result<String, Error> {
        self.as_str()
            .map(|s| s.to_string())
            .ok_or(Error::JsonExpectedString)
    }

    fn describe(&self) -> String {
        let s = self.to_string();
        if s.len() > 64 {
            format!("{}...", &s[..s.char_indices().nth(61).map_or(s.len(), |(i, _)| i)])
        } else {
            s
        }
    }
}
