use crate::domain::entities::PlayerId;

/// The external identity behind an event, with the sections it may enter
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: PlayerId,
    pub name: String,
    pub sections: Vec<String>,
}

impl Caller {
    pub fn new(id: impl Into<String>, name: impl Into<String>, sections: Vec<String>) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.into(),
            sections,
        }
    }

    pub fn can_access(&self, section_prefix: &str) -> bool {
        self.sections
            .iter()
            .any(|s| s.eq_ignore_ascii_case(section_prefix))
    }
}
