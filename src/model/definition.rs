use crate::errors::ProviderError;
use crate::{Flag, Value};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// JSON shape of a single flag definition.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlagDefinition {
    variants: HashMap<String, serde_json::Value>,
    default_variant: String,
}

/// A set of flag definitions in JSON format.
///
/// ```json
/// {
///   "flags": {
///     "bool-flag": {
///       "variants": { "on": true, "off": false },
///       "defaultVariant": "on"
///     }
///   }
/// }
/// ```
#[derive(Deserialize)]
pub struct FlagSet {
    flags: HashMap<String, FlagDefinition>,
}

impl FlagSet {
    /// Parses flag definitions from a JSON string.
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::Parse`] if the JSON is malformed or a variant
    /// value is `null` or an array, and with [`ProviderError::InvalidArgument`]
    /// if a definition is not a valid [`Flag`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use inmemory_flags::FlagSet;
    ///
    /// let flags = FlagSet::from_json(r#"{"flags": {"f": {"variants": {"a": 1}, "defaultVariant": "a"}}}"#)
    ///     .unwrap();
    /// assert_eq!(flags.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Vec<Flag>, ProviderError> {
        let set = serde_json::from_str::<FlagSet>(json)
            .map_err(|err| ProviderError::Parse(err.to_string()))?;
        set.into_flags()
    }

    /// Reads and parses flag definitions from a JSON file.
    ///
    /// # Errors
    ///
    /// Fails with [`ProviderError::Parse`] if the file can't be read, otherwise
    /// the same as [`FlagSet::from_json`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Flag>, ProviderError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|err| {
            ProviderError::Parse(format!("{}: {err}", path.as_ref().display()))
        })?;
        Self::from_json(content.as_str())
    }

    fn into_flags(self) -> Result<Vec<Flag>, ProviderError> {
        let mut keys: Vec<&String> = self.flags.keys().collect();
        keys.sort();
        let mut result = Vec::with_capacity(self.flags.len());
        for key in keys {
            let definition = &self.flags[key];
            let mut variants = HashMap::with_capacity(definition.variants.len());
            for (name, json_val) in definition.variants.iter() {
                match Value::from_json_val(json_val) {
                    Some(val) => {
                        variants.insert(name.clone(), val);
                    }
                    None => {
                        return Err(ProviderError::Parse(format!(
                            "Value of variant '{name}' of flag '{key}' is invalid."
                        )))
                    }
                }
            }
            result.push(Flag::new(key, variants, &definition.default_variant)?);
        }
        Ok(result)
    }
}
