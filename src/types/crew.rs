use serde::{Deserialize, Serialize};

/// One person currently in space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub craft: String,
}

/// Everyone currently in space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewRoster {
    pub number: u32,
    pub people: Vec<CrewMember>,
    pub message: String,
}

impl CrewRoster {
    /// Placeholder returned when the roster feed cannot be read.
    pub fn unavailable() -> Self {
        Self {
            number: 0,
            people: Vec::new(),
            message: "unavailable".to_string(),
        }
    }

    /// Crew aboard a given craft, in roster order.
    pub fn aboard<'a>(&'a self, craft: &'a str) -> impl Iterator<Item = &'a CrewMember> + 'a {
        self.people.iter().filter(move |p| p.craft == craft)
    }
}
