use serde::Serialize;

/// One titled field of a summary embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryField {
    pub name: String,
    pub value: String,
}

/// A titled list of fields sent as a rich summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub title: String,
    pub fields: Vec<SummaryField>,
}

impl Summary {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(SummaryField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}
