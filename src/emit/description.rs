//! Flow to diagram description.
//!
//! Walks the top-level structures once, assigning every element to a lane
//! and growing a list of connection chains (`a->b->c`). Each gateway branch
//! opens a new chain; a chain index past the end of the list starts a new
//! chain from the last gateway join.

use std::fmt;

use serde::Serialize;

use crate::config::DiagramConfig;
use crate::flow::{Activity, AndBlock, ConditionBlock, Lanes, Structure};
use crate::nlp::ParsedDocument;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lane {
    pub name: String,
    pub elements: Vec<String>,
}

/// Lane-partitioned elements and connection chains for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramDescription {
    pub title: String,
    pub width: u32,
    pub theme: String,
    pub lanes: Vec<Lane>,
    pub connections: Vec<String>,
}

impl DiagramDescription {
    /// Render to the diagram DSL.
    pub fn to_syntax(&self) -> String {
        self.to_string()
    }

    pub fn lane(&self, name: &str) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.name == name)
    }
}

impl fmt::Display for DiagramDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "title: {}", self.title)?;
        writeln!(f, "width: {}", self.width)?;
        writeln!(f, "colourtheme: {}", self.theme)?;
        for lane in &self.lanes {
            writeln!(f, "lane: {}", lane.name)?;
            for element in &lane.elements {
                writeln!(f, "\t{element}")?;
            }
        }
        writeln!(f)?;
        for connection in &self.connections {
            writeln!(f, "{connection}")?;
        }
        Ok(())
    }
}

struct Emitter<'a> {
    doc: &'a ParsedDocument,
    lanes: &'a Lanes,
    config: &'a DiagramConfig,
    lane_elements: Vec<Lane>,
    connections: Vec<String>,
    connection_id: usize,
    last_gateway: Option<String>,
    key: String,
}

impl<'a> Emitter<'a> {
    fn push_element(&mut self, element: String) {
        match self.lane_elements.iter_mut().find(|l| l.name == self.key) {
            Some(lane) => lane.elements.push(element),
            None => self.lane_elements.push(Lane {
                name: self.key.clone(),
                elements: vec![element],
            }),
        }
    }

    /// Append `target` to chain `id`, or start a new chain from the last
    /// gateway join when `id` is past the end.
    fn extend_chain(&mut self, id: usize, target: &str) {
        match self.connections.get_mut(id) {
            Some(chain) => {
                chain.push_str("->");
                chain.push_str(target);
            }
            None => {
                let chain = match &self.last_gateway {
                    Some(gateway) => format!("{gateway}->{target}"),
                    None => target.to_string(),
                };
                self.connections.push(chain);
            }
        }
    }

    fn append(&mut self, element: String, name: &str) {
        self.push_element(element);
        self.extend_chain(self.connection_id, name);
    }

    fn activity_label(&self, activity: &Activity) -> String {
        let process = &activity.process;
        let action = process
            .action
            .as_ref()
            .map(|a| a.text(self.doc))
            .unwrap_or_default();
        match &process.actor {
            Some(actor) if !self.lanes.is_lane(&actor.full_name) => {
                format!("[{} {}] as {}", actor.text(self.doc), action, activity.element_id())
            }
            _ => format!("[{}] as {}", action, activity.element_id()),
        }
    }

    fn emit_activity(&mut self, activity: &Activity) {
        self.key = self.lanes.lane_for(activity, &self.key);
        let label = self.activity_label(activity);
        self.append(label, &activity.element_id());
    }

    /// Label of a non-simple branch: its conditions joined, wrapped with a
    /// literal `\n` once a line passes the configured width.
    fn branch_label(&self, conditions: &[Activity]) -> String {
        let text = conditions
            .iter()
            .map(|c| c.process.text(self.doc))
            .collect::<Vec<_>>()
            .join(", ");
        let mut out = String::new();
        let mut count = 0;
        for ch in text.chars() {
            count += 1;
            if ch == ' ' && count > self.config.condition_wrap {
                out.push_str("\\n");
                count = 0;
            } else {
                out.push(ch);
            }
        }
        out
    }

    fn emit_condition(&mut self, block: &ConditionBlock) {
        let gateway = block.element_id();
        let join = format!("{gateway}_end");
        let simple = block.is_simple();
        let first_condition = block.branches.first().and_then(|b| b.conditions.first());

        if let Some(condition) = first_condition {
            self.key = self.lanes.lane_for(condition, &self.key);
        }
        let element = match first_condition {
            Some(condition) if simple => {
                format!("<{}?> as {gateway}", condition.process.text(self.doc))
            }
            _ => format!("<> as {gateway}"),
        };
        self.append(element, &gateway);

        for (n, branch) in block.branches.iter().enumerate() {
            self.connection_id += 1;
            let start = if simple {
                let answer = if n == 0 { "yes" } else { "no" };
                format!("{gateway}-\"{answer}\"")
            } else {
                format!("{gateway}-\"{}\"", self.branch_label(&branch.conditions))
            };
            self.connections.push(start);

            let mut needs_join = true;
            for activity in &branch.actions {
                self.emit_activity(activity);
                if activity.is_end_activity {
                    needs_join = false;
                    let end = format!("end_{}", activity.id);
                    self.push_element(format!("(end) as {end}"));
                    self.extend_chain(self.connection_id, &end);
                }
            }
            if needs_join {
                self.extend_chain(self.connection_id, &join);
            }
        }

        self.push_element(format!("<> as {join}"));
        self.connection_id += 1;
        self.last_gateway = Some(join);
    }

    fn emit_parallel(&mut self, block: &AndBlock) {
        let gateway = block.element_id();
        let join = format!("{gateway}_end");
        self.append(format!("<@parallel> as {gateway}"), &gateway);

        for branch in &block.branches {
            self.connection_id += 1;
            self.connections.push(gateway.clone());
            for activity in branch {
                self.emit_activity(activity);
            }
            self.extend_chain(self.connection_id, &join);
        }

        self.push_element(format!("<@parallel> as {join}"));
        self.connection_id += 1;
        self.last_gateway = Some(join);
    }

    fn emit_end(&mut self) {
        self.push_element("(end) as end".to_string());
        if self.connection_id < self.connections.len() {
            self.extend_chain(self.connection_id, "end");
        } else {
            let from = self.last_gateway.clone().unwrap_or_else(|| "start".to_string());
            self.connections.push(format!("{from}->end"));
        }
    }
}

/// Build the diagram description of a flow.
pub fn describe_flow(
    doc: &ParsedDocument,
    flow: &[Structure],
    lanes: &Lanes,
    config: &DiagramConfig,
    title: &str,
    resolve_first_lane: bool,
) -> DiagramDescription {
    let mut emitter = Emitter {
        doc,
        lanes,
        config,
        lane_elements: lanes
            .names()
            .iter()
            .map(|name| Lane {
                name: name.clone(),
                elements: Vec::new(),
            })
            .collect(),
        connections: Vec::new(),
        connection_id: 0,
        last_gateway: None,
        key: String::new(),
    };

    for (n, structure) in flow.iter().enumerate() {
        if n == 0 {
            emitter.key = lanes.first_lane(flow, resolve_first_lane);
            emitter.push_element("(start) as start".to_string());
            emitter.connections.push("start".to_string());
        }
        match structure {
            Structure::Activity(activity) => emitter.emit_activity(activity),
            Structure::ConditionBlock(block) => emitter.emit_condition(block),
            Structure::AndBlock(block) => emitter.emit_parallel(block),
        }
        if structure.is_end_activity() {
            emitter.emit_end();
        }
    }

    DiagramDescription {
        title: title.to_string(),
        width: config.width,
        theme: config.theme.clone(),
        lanes: emitter.lane_elements,
        connections: emitter.connections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_lane() -> DiagramDescription {
        DiagramDescription {
            title: "t".to_string(),
            width: 10000,
            theme: "BLUEMOUNTAIN".to_string(),
            lanes: vec![Lane {
                name: String::new(),
                elements: vec!["(start) as start".to_string(), "(end) as end".to_string()],
            }],
            connections: vec!["start->end".to_string()],
        }
    }

    #[test]
    fn test_to_syntax_layout() {
        assert_eq!(
            single_lane().to_syntax(),
            "title: t\nwidth: 10000\ncolourtheme: BLUEMOUNTAIN\nlane: \n\t(start) as start\n\t(end) as end\n\nstart->end\n"
        );
    }

    #[test]
    fn test_syntax_streams_into_writer() {
        use std::fmt::Write;

        let description = single_lane();
        let mut out = String::from("# generated\n");
        write!(out, "{description}").unwrap();
        assert_eq!(out, format!("# generated\n{}", description.to_syntax()));
    }
}
