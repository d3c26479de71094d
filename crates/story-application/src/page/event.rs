use std::collections::BTreeMap;

/// A user interaction addressed to the active page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A form was submitted with the given field values.
    Submit {
        form: String,
        fields: BTreeMap<String, String>,
    },
    /// An element was clicked; `data` carries its data attributes.
    Click {
        target: String,
        data: BTreeMap<String, String>,
    },
}

impl UiEvent {
    pub fn submit<K, V>(form: impl Into<String>, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Submit {
            form: form.into(),
            fields: collect(fields),
        }
    }

    pub fn click(target: impl Into<String>) -> Self {
        Self::Click {
            target: target.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn click_with<K, V>(target: impl Into<String>, data: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Click {
            target: target.into(),
            data: collect(data),
        }
    }

    /// The form id or click target.
    pub fn target(&self) -> &str {
        match self {
            Self::Submit { form, .. } => form,
            Self::Click { target, .. } => target,
        }
    }

    /// Looks up a form field or data attribute.
    pub fn value(&self, name: &str) -> Option<&str> {
        let values = match self {
            Self::Submit { fields, .. } => fields,
            Self::Click { data, .. } => data,
        };
        values.get(name).map(String::as_str)
    }

    /// Like [`value`](Self::value), with surrounding whitespace removed
    /// and empty values treated as missing.
    pub fn filled(&self, name: &str) -> Option<&str> {
        self.value(name).map(str::trim).filter(|v| !v.is_empty())
    }
}

fn collect<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> BTreeMap<String, String>
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
