//! Lane assignment by responsible actor.

use super::structure::{Activity, Structure};

/// Resolved lane keys. Fewer than two actors collapse into one unnamed lane.
#[derive(Debug, Clone)]
pub struct Lanes {
    names: Vec<String>,
}

impl Lanes {
    pub fn new(actors: Vec<String>) -> Self {
        let names = if actors.len() < 2 {
            vec![String::new()]
        } else {
            actors
        };
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_single(&self) -> bool {
        self.names.len() == 1 && self.names[0].is_empty()
    }

    /// True if `name` is a named lane.
    pub fn is_lane(&self, name: &str) -> bool {
        !self.is_single() && self.names.iter().any(|n| n == name)
    }

    fn first(&self) -> String {
        self.names.first().cloned().unwrap_or_default()
    }

    /// Lane of the first node: the lane matched by the first activity
    /// whose actor names one (single-word actors by substring, others
    /// exactly), searching nested activities too. Falls back to the first
    /// lane, and always uses it when `search` is off.
    pub fn first_lane(&self, flow: &[Structure], search: bool) -> String {
        if self.is_single() || !search {
            return self.first();
        }
        for activity in flow.iter().flat_map(Structure::activities) {
            let Some(actor) = &activity.process.actor else {
                continue;
            };
            let name = actor.full_name.as_str();
            let matched = self.names.iter().find(|key| {
                if name.contains(' ') {
                    key.as_str() == name
                } else {
                    key.contains(name)
                }
            });
            if let Some(key) = matched {
                return key.clone();
            }
        }
        self.first()
    }

    /// Lane of a later activity: its actor's lane when that is a named lane,
    /// otherwise the previous lane.
    pub fn lane_for(&self, activity: &Activity, previous: &str) -> String {
        match &activity.process.actor {
            Some(actor) if self.is_lane(&actor.full_name) => actor.full_name.clone(),
            _ => previous.to_string(),
        }
    }
}
