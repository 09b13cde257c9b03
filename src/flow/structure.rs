//! Flow structures: activities, exclusive and parallel blocks.

use serde::Serialize;

use crate::model::{Marker, Process, SentenceContainer};
use crate::nlp::ParsedDocument;

pub type StructureId = u32;

/// Hands out structure ids. Ids start at 1, are shared by activities and
/// gateways, and keep rising for as long as the allocator lives; a
/// `Pipeline` keeps one for every document it processes.
#[derive(Debug)]
pub struct StructureIdAllocator {
    next: StructureId,
}

impl Default for StructureIdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl StructureIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> StructureId {
        let id = self.next;
        self.next += 1;
        id
    }
}

// ── Activity ──

#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    pub id: StructureId,
    pub process: Process,
    pub is_end_activity: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<StructureId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<StructureId>,
}

impl Activity {
    pub fn new(ids: &mut StructureIdAllocator, process: Process) -> Self {
        Self {
            id: ids.allocate(),
            process,
            is_end_activity: false,
            previous: None,
            next: None,
        }
    }

    pub fn element_id(&self) -> String {
        format!("activity_{}", self.id)
    }
}

// ── ConditionBlock ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionType {
    If,
    Else,
}

#[derive(Debug, Clone, Serialize)]
pub struct Branch {
    pub kind: ConditionType,
    pub conditions: Vec<Activity>,
    pub actions: Vec<Activity>,
}

impl Branch {
    fn new(kind: ConditionType) -> Self {
        Self {
            kind,
            conditions: Vec::new(),
            actions: Vec::new(),
        }
    }
}

/// Exclusive gateway with one branch per condition.
#[derive(Debug, Clone, Serialize)]
pub struct ConditionBlock {
    pub id: StructureId,
    pub branches: Vec<Branch>,
    pub is_end_activity: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<StructureId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<StructureId>,
}

impl ConditionBlock {
    pub fn new(ids: &mut StructureIdAllocator) -> Self {
        Self {
            id: ids.allocate(),
            branches: Vec::new(),
            is_end_activity: false,
            previous: None,
            next: None,
        }
    }

    /// Add the processes of a conditional sentence. An if-marked process
    /// opens a branch whose condition is the process (or its folded
    /// complement clause); an else-marked one opens a branch with the
    /// process as first action. A conjunct of a condition joins the
    /// conditions, anything else the current branch's actions.
    pub fn add_branch(&mut self, ids: &mut StructureIdAllocator, doc: &ParsedDocument, container: SentenceContainer) {
        for mut process in container.processes {
            let Some(action) = process.action.as_mut() else {
                continue;
            };
            let verb = action.token;
            let marker = action.marker;
            let subclause = action.subclause.take();
            match marker {
                Some(Marker::If) => {
                    let condition = match subclause {
                        Some(sub) => *sub,
                        None => process,
                    };
                    let mut branch = Branch::new(ConditionType::If);
                    branch.conditions.push(Activity::new(ids, condition));
                    self.branches.push(branch);
                }
                Some(Marker::Else) => {
                    if let Some(action) = process.action.as_mut() {
                        action.subclause = subclause;
                    }
                    let mut branch = Branch::new(ConditionType::Else);
                    branch.actions.push(Activity::new(ids, process));
                    self.branches.push(branch);
                }
                _ => {
                    if let Some(action) = process.action.as_mut() {
                        action.subclause = subclause;
                    }
                    let Some(branch) = self.branches.last_mut() else {
                        tracing::debug!(verb, "no open branch, process dropped");
                        continue;
                    };
                    let joins_condition = doc.token(verb).dep == "conj"
                        && doc.head(verb).is_some_and(|father| {
                            branch
                                .conditions
                                .iter()
                                .any(|c| c.process.action_token() == Some(father))
                        });
                    let activity = Activity::new(ids, process);
                    if joins_condition {
                        branch.conditions.push(activity);
                    } else {
                        branch.actions.push(activity);
                    }
                }
            }
        }
    }

    /// One ELSE branch per "or"-joined process.
    pub fn add_or_branches(&mut self, ids: &mut StructureIdAllocator, processes: Vec<Process>) {
        for process in processes {
            let mut branch = Branch::new(ConditionType::Else);
            branch.actions.push(Activity::new(ids, process));
            self.branches.push(branch);
        }
    }

    /// Append a jump-linked process to branch `index`, if it exists.
    pub fn add_to_branch(&mut self, ids: &mut StructureIdAllocator, index: usize, process: Process) {
        if let Some(branch) = self.branches.get_mut(index) {
            branch.actions.push(Activity::new(ids, process));
        }
    }

    /// A conditional sentence continues this block when it is an else, or
    /// when its if-condition is about the same participant as one of the
    /// existing conditions.
    pub fn can_be_added(&self, doc: &ParsedDocument, container: &SentenceContainer) -> bool {
        for process in &container.processes {
            match process.marker() {
                Some(Marker::Else) => return true,
                Some(Marker::If) => {
                    let Some(candidate) = process.reference_participant() else {
                        return false;
                    };
                    return self
                        .branches
                        .iter()
                        .flat_map(|b| b.conditions.iter())
                        .filter_map(|c| c.process.reference_participant())
                        .any(|existing| candidate.same_referent(&existing, doc));
                }
                _ => {}
            }
        }
        false
    }

    pub fn is_complete(&self) -> bool {
        self.branches.len() != 1
    }

    pub fn create_dummy_branch(&mut self) {
        self.branches.push(Branch::new(ConditionType::Else));
    }

    /// Plain if/else: exactly two branches, IF then ELSE.
    pub fn is_simple(&self) -> bool {
        matches!(
            self.branches.as_slice(),
            [first, second] if first.kind == ConditionType::If && second.kind == ConditionType::Else
        )
    }

    pub fn element_id(&self) -> String {
        format!("gateway_{}", self.id)
    }
}

// ── AndBlock ──

/// Parallel gateway; each branch is a sequence of activities.
#[derive(Debug, Clone, Serialize)]
pub struct AndBlock {
    pub id: StructureId,
    pub branches: Vec<Vec<Activity>>,
    pub is_end_activity: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<StructureId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<StructureId>,
}

impl AndBlock {
    pub fn new(ids: &mut StructureIdAllocator) -> Self {
        Self {
            id: ids.allocate(),
            branches: Vec::new(),
            is_end_activity: false,
            previous: None,
            next: None,
        }
    }

    pub fn add_branch(&mut self, ids: &mut StructureIdAllocator, processes: Vec<Process>) {
        let branch = processes
            .into_iter()
            .filter(|p| p.action.is_some())
            .map(|p| Activity::new(ids, p))
            .collect();
        self.branches.push(branch);
    }

    pub fn add_to_branch(&mut self, ids: &mut StructureIdAllocator, index: usize, process: Process) {
        if let Some(branch) = self.branches.get_mut(index) {
            branch.push(Activity::new(ids, process));
        }
    }

    pub fn element_id(&self) -> String {
        format!("gateway_{}", self.id)
    }
}

// ── Structure ──

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum Structure {
    Activity(Activity),
    ConditionBlock(ConditionBlock),
    AndBlock(AndBlock),
}

impl Structure {
    pub fn id(&self) -> StructureId {
        match self {
            Structure::Activity(a) => a.id,
            Structure::ConditionBlock(b) => b.id,
            Structure::AndBlock(b) => b.id,
        }
    }

    pub fn is_end_activity(&self) -> bool {
        match self {
            Structure::Activity(a) => a.is_end_activity,
            Structure::ConditionBlock(b) => b.is_end_activity,
            Structure::AndBlock(b) => b.is_end_activity,
        }
    }

    pub fn set_end_activity(&mut self, value: bool) {
        match self {
            Structure::Activity(a) => a.is_end_activity = value,
            Structure::ConditionBlock(b) => b.is_end_activity = value,
            Structure::AndBlock(b) => b.is_end_activity = value,
        }
    }

    pub fn set_links(&mut self, previous: Option<StructureId>, next: Option<StructureId>) {
        let (p, n) = match self {
            Structure::Activity(a) => (&mut a.previous, &mut a.next),
            Structure::ConditionBlock(b) => (&mut b.previous, &mut b.next),
            Structure::AndBlock(b) => (&mut b.previous, &mut b.next),
        };
        *p = previous;
        *n = next;
    }

    pub fn previous(&self) -> Option<StructureId> {
        match self {
            Structure::Activity(a) => a.previous,
            Structure::ConditionBlock(b) => b.previous,
            Structure::AndBlock(b) => b.previous,
        }
    }

    pub fn next(&self) -> Option<StructureId> {
        match self {
            Structure::Activity(a) => a.next,
            Structure::ConditionBlock(b) => b.next,
            Structure::AndBlock(b) => b.next,
        }
    }

    /// Every activity in document order, including those nested in blocks
    /// (conditions before actions within a branch).
    pub fn activities(&self) -> Vec<&Activity> {
        match self {
            Structure::Activity(a) => vec![a],
            Structure::ConditionBlock(b) => b
                .branches
                .iter()
                .flat_map(|br| br.conditions.iter().chain(br.actions.iter()))
                .collect(),
            Structure::AndBlock(b) => b.branches.iter().flatten().collect(),
        }
    }

    /// Debug rendering with block delimiters.
    pub fn describe(&self, doc: &ParsedDocument) -> String {
        match self {
            Structure::Activity(a) => a.process.text(doc),
            Structure::ConditionBlock(b) => {
                let mut out = vec![format!("BEGIN_IF {}", b.id)];
                for branch in &b.branches {
                    let kind = match branch.kind {
                        ConditionType::If => "IF",
                        ConditionType::Else => "ELSE",
                    };
                    let conditions: Vec<_> = branch.conditions.iter().map(|c| c.process.text(doc)).collect();
                    out.push(format!("  {kind} [{}]", conditions.join(", ")));
                    for action in &branch.actions {
                        out.push(format!("    {}", action.process.text(doc)));
                    }
                }
                out.push(format!("END_IF {}", b.id));
                out.join("\n")
            }
            Structure::AndBlock(b) => {
                let mut out = vec![format!("BEGIN_AND {}", b.id)];
                for (n, branch) in b.branches.iter().enumerate() {
                    out.push(format!("  BRANCH {n}"));
                    for activity in branch {
                        out.push(format!("    {}", activity.process.text(doc)));
                    }
                }
                out.push(format!("END_AND {}", b.id));
                out.join("\n")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Action;
    use crate::nlp::Span;

    fn process(verb: usize, marker: Option<Marker>) -> Process {
        let mut p = Process::new(Span::new(0, 1));
        let mut action = Action::new(verb);
        action.marker = marker;
        p.action = Some(action);
        p
    }

    #[test]
    fn test_ids_start_at_one_and_are_shared() {
        let mut ids = StructureIdAllocator::new();
        let block = ConditionBlock::new(&mut ids);
        let activity = Activity::new(&mut ids, process(0, None));
        assert_eq!(block.id, 1);
        assert_eq!(activity.id, 2);
        assert_eq!(block.element_id(), "gateway_1");
        assert_eq!(activity.element_id(), "activity_2");
    }

    #[test]
    fn test_dummy_branch_makes_block_simple() {
        let mut ids = StructureIdAllocator::new();
        let mut block = ConditionBlock::new(&mut ids);
        let mut branch = Branch::new(ConditionType::If);
        branch.conditions.push(Activity::new(&mut ids, process(0, Some(Marker::If))));
        block.branches.push(branch);
        assert!(!block.is_complete());
        block.create_dummy_branch();
        assert!(block.is_complete());
        assert!(block.is_simple());
    }

    #[test]
    fn test_add_to_missing_branch_is_ignored() {
        let mut ids = StructureIdAllocator::new();
        let mut block = AndBlock::new(&mut ids);
        block.add_branch(&mut ids, vec![process(0, None)]);
        block.add_to_branch(&mut ids, 3, process(1, None));
        assert_eq!(block.branches.len(), 1);
        assert_eq!(ids.allocate(), 3);
    }

    #[test]
    fn test_activities_include_nested() {
        let mut ids = StructureIdAllocator::new();
        let mut block = AndBlock::new(&mut ids);
        block.add_branch(&mut ids, vec![process(0, None), process(1, None)]);
        block.add_branch(&mut ids, vec![process(2, None)]);
        let s = Structure::AndBlock(block);
        assert_eq!(s.activities().len(), 3);
        assert_eq!(s.id(), 1);
    }
}
