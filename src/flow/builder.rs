//! Sentence containers to an ordered flow of structures.

use tracing::debug;

use super::structure::{Activity, AndBlock, ConditionBlock, Structure, StructureIdAllocator};
use crate::model::{LinkType, Process, SentenceContainer};
use crate::nlp::ParsedDocument;

/// Intermediate grouping: blocks, or a plain run of processes.
#[derive(Debug)]
pub enum FlowItem {
    Sequence(Vec<Process>),
    Condition(ConditionBlock),
    And(AndBlock),
}

pub struct FlowBuilder<'a> {
    doc: &'a ParsedDocument,
    ids: &'a mut StructureIdAllocator,
}

impl<'a> FlowBuilder<'a> {
    pub fn new(doc: &'a ParsedDocument, ids: &'a mut StructureIdAllocator) -> Self {
        Self { doc, ids }
    }

    /// Group containers into blocks. Roles are checked in this order:
    ///
    /// - A conditional sentence extends the previous block when the previous
    ///   sentence was conditional too and the block accepts it; otherwise it
    ///   opens a new block.
    /// - A parallel sentence turns the previous plain run into a parallel
    ///   block or adds a branch to the previous parallel block. After an
    ///   exclusive block, or at the start, it stays a plain run.
    /// - Otherwise "or"-joined processes become an exclusive block with one
    ///   ELSE branch each.
    pub fn construct(&mut self, containers: Vec<SentenceContainer>) -> Vec<FlowItem> {
        let doc = self.doc;
        let conditional: Vec<bool> = containers.iter().map(|c| c.has_conditional()).collect();
        let mut result: Vec<FlowItem> = Vec::new();

        for (n, container) in containers.into_iter().enumerate() {
            if container.has_conditional() {
                let continues = n > 0
                    && conditional[n - 1]
                    && matches!(result.last(), Some(FlowItem::Condition(b)) if b.can_be_added(doc, &container));
                if continues {
                    if let Some(FlowItem::Condition(block)) = result.last_mut() {
                        block.add_branch(self.ids, doc, container);
                        continue;
                    }
                }
                let mut block = ConditionBlock::new(self.ids);
                block.add_branch(self.ids, doc, container);
                result.push(FlowItem::Condition(block));
            } else if container.has_while() {
                match result.pop() {
                    Some(FlowItem::Sequence(previous)) => {
                        let mut block = AndBlock::new(self.ids);
                        block.add_branch(self.ids, previous);
                        block.add_branch(self.ids, container.processes);
                        result.push(FlowItem::And(block));
                    }
                    Some(FlowItem::And(mut block)) => {
                        block.add_branch(self.ids, container.processes);
                        result.push(FlowItem::And(block));
                    }
                    other => {
                        result.extend(other);
                        debug!("parallel marker without a preceding run, kept as sequence");
                        result.push(FlowItem::Sequence(container.processes));
                    }
                }
            } else if let Some([kid, host]) = container.or_positions(doc) {
                let kid_process = container.processes[kid].clone();
                let host_process = container.processes[host].clone();
                let mut block = ConditionBlock::new(self.ids);
                block.add_or_branches(self.ids, vec![kid_process, host_process]);
                result.push(FlowItem::Condition(block));
            } else {
                result.push(FlowItem::Sequence(container.processes));
            }
        }
        result
    }

    /// Flatten into top-level structures. Incomplete exclusive blocks get an
    /// empty ELSE branch; jump-linked processes join a branch of the last
    /// gateway instead of the main sequence.
    pub fn build_flows(&mut self, containers: Vec<SentenceContainer>) -> Vec<Structure> {
        let mut flow: Vec<Structure> = Vec::new();
        let mut last_gateway: Option<usize> = None;

        for item in self.construct(containers) {
            match item {
                FlowItem::Condition(mut block) => {
                    if !block.is_complete() {
                        block.create_dummy_branch();
                    }
                    flow.push(Structure::ConditionBlock(block));
                    last_gateway = Some(flow.len() - 1);
                }
                FlowItem::And(block) => {
                    flow.push(Structure::AndBlock(block));
                    last_gateway = Some(flow.len() - 1);
                }
                FlowItem::Sequence(processes) => {
                    for process in processes {
                        let link = process.action.as_ref().and_then(|a| a.link_type);
                        match link {
                            Some(link) => {
                                let Some(gateway) = last_gateway else {
                                    debug!("jump reference without a gateway, process dropped");
                                    continue;
                                };
                                let index = match link {
                                    LinkType::ToPrev => 1,
                                    LinkType::ToNext => 0,
                                };
                                match &mut flow[gateway] {
                                    Structure::ConditionBlock(b) => b.add_to_branch(self.ids, index, process),
                                    Structure::AndBlock(b) => b.add_to_branch(self.ids, index, process),
                                    Structure::Activity(_) => {}
                                }
                            }
                            None => flow.push(Structure::Activity(Activity::new(self.ids, process))),
                        }
                    }
                }
            }
        }
        flow
    }

    /// `build_flows` with previous / next links set between neighbours.
    pub fn build_linked_list(&mut self, containers: Vec<SentenceContainer>) -> Vec<Structure> {
        let mut flow = self.build_flows(containers);
        let ids: Vec<_> = flow.iter().map(Structure::id).collect();
        for (n, structure) in flow.iter_mut().enumerate() {
            let previous = n.checked_sub(1).map(|p| ids[p]);
            let next = ids.get(n + 1).copied();
            structure.set_links(previous, next);
        }
        flow
    }
}
