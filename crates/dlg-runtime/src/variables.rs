use std::collections::BTreeMap;

use dlg_core::DlValue;

/// Process-wide scalar bindings. Getters never coerce across tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    values: BTreeMap<String, DlValue>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bindings<I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (String, DlValue)>,
    {
        let mut store = Self::new();
        for (name, value) in bindings {
            store.set(name, value);
        }
        store
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<DlValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&DlValue> {
        self.values.get(name)
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        self.get(name).and_then(DlValue::as_bool).unwrap_or(default)
    }

    pub fn get_string<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).and_then(DlValue::as_string).unwrap_or(default)
    }

    pub fn get_int(&self, name: &str, default: i64) -> i64 {
        self.get(name).and_then(DlValue::as_int).unwrap_or(default)
    }

    pub fn get_number(&self, name: &str, default: f64) -> f64 {
        self.get(name).and_then(DlValue::as_number).unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DlValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
