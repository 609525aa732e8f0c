use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{EdgeInfo, EdgeOutcome, GraphStore, Iter3Match, Iter5Match};
use crate::addr::{Addr, ElementId};
use crate::element_type::{ElementType, TypeFilter};
use crate::errors::{StoreError, StoreResult};
use crate::template::{Template, TemplateBinding, TemplateItem, TemplateTriple};

#[derive(Debug)]
enum Body {
    Node,
    Link(String),
    Edge { source: ElementId, target: ElementId },
}

#[derive(Debug)]
struct Element {
    ty: ElementType,
    body: Body,
    /// Edge ids in creation order
    outgoing: Vec<ElementId>,
    incoming: Vec<ElementId>,
    idtf: Option<String>,
}

#[derive(Debug, Default)]
struct Graph {
    next_id: u64,
    elements: BTreeMap<ElementId, Element>,
    idtfs: HashMap<String, ElementId>,
}

impl Graph {
    fn get(&self, addr: Addr) -> Option<&Element> {
        addr.id().and_then(|id| self.elements.get(&id))
    }

    fn live_id(&self, addr: Addr) -> StoreResult<ElementId> {
        addr.id()
            .filter(|id| self.elements.contains_key(id))
            .ok_or(StoreError::ElementNotFound { addr })
    }

    fn alloc(&mut self, ty: ElementType, body: Body) -> ElementId {
        self.next_id += 1;
        let id = ElementId::new(self.next_id);
        self.elements.insert(
            id,
            Element {
                ty,
                body,
                outgoing: Vec::new(),
                incoming: Vec::new(),
                idtf: None,
            },
        );
        id
    }

    fn edge_endpoints(&self, id: ElementId) -> Option<(ElementType, ElementId, ElementId)> {
        match self.elements.get(&id)? {
            Element {
                ty,
                body: Body::Edge { source, target },
                ..
            } => Some((*ty, *source, *target)),
            _ => None,
        }
    }

    fn find_edge(&self, ty: ElementType, source: ElementId, target: ElementId) -> Option<ElementId> {
        self.elements.get(&source)?.outgoing.iter().copied().find(|edge| {
            self.edge_endpoints(*edge)
                .is_some_and(|(t, _, to)| t == ty && to == target)
        })
    }

    fn add_edge(&mut self, ty: ElementType, source: Addr, target: Addr) -> StoreResult<ElementId> {
        if !ty.is_edge() {
            return Err(StoreError::InvalidType {
                operation: "create an edge",
                actual: ty,
            });
        }
        let source_id = self.live_id(source)?;
        let target_id = self.live_id(target)?;
        let id = self.alloc(
            ty,
            Body::Edge {
                source: source_id,
                target: target_id,
            },
        );
        if let Some(element) = self.elements.get_mut(&source_id) {
            element.outgoing.push(id);
        }
        if let Some(element) = self.elements.get_mut(&target_id) {
            element.incoming.push(id);
        }
        Ok(id)
    }

    fn erase(&mut self, root: ElementId) -> bool {
        if !self.elements.contains_key(&root) {
            return false;
        }
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            let Some(element) = self.elements.remove(&id) else {
                continue;
            };
            if let Some(idtf) = &element.idtf {
                self.idtfs.remove(idtf);
            }
            pending.extend(element.outgoing.iter().copied());
            pending.extend(element.incoming.iter().copied());
            if let Body::Edge { source, target } = element.body {
                if let Some(s) = self.elements.get_mut(&source) {
                    s.outgoing.retain(|e| *e != id);
                }
                if let Some(t) = self.elements.get_mut(&target) {
                    t.incoming.retain(|e| *e != id);
                }
            }
        }
        true
    }

    fn search(
        &self,
        triples: &[TemplateTriple],
        binding: TemplateBinding,
        out: &mut Vec<TemplateBinding>,
    ) {
        let Some((triple, rest)) = triples.split_first() else {
            out.push(binding);
            return;
        };
        for edge in self.candidate_edges(triple, &binding) {
            let Some((_, source, target)) = self.edge_endpoints(edge) else {
                continue;
            };
            let mut next = binding.clone();
            if self.accepts(&triple.source, source, &mut next)
                && self.accepts(&triple.edge, edge, &mut next)
                && self.accepts(&triple.target, target, &mut next)
            {
                self.search(rest, next, out);
            }
        }
    }

    /// Narrowest edge set that can satisfy `triple` under `binding`
    fn candidate_edges(&self, triple: &TemplateTriple, binding: &TemplateBinding) -> Vec<ElementId> {
        if let Some(source) = bound(&triple.source, binding) {
            return self
                .get(source)
                .map(|e| e.outgoing.clone())
                .unwrap_or_default();
        }
        if let Some(target) = bound(&triple.target, binding) {
            return self
                .get(target)
                .map(|e| e.incoming.clone())
                .unwrap_or_default();
        }
        if let Some(edge) = bound(&triple.edge, binding) {
            return edge.id().into_iter().collect();
        }
        self.elements
            .iter()
            .filter(|(_, e)| e.ty.is_edge())
            .map(|(id, _)| *id)
            .collect()
    }

    fn accepts(&self, item: &TemplateItem, id: ElementId, binding: &mut TemplateBinding) -> bool {
        let addr = Addr::from(id);
        match item {
            TemplateItem::Fixed(fixed) => *fixed == addr,
            TemplateItem::Var { filter, name } => {
                let type_ok = self
                    .elements
                    .get(&id)
                    .is_some_and(|e| filter.accepts(e.ty));
                type_ok && name.as_deref().map_or(true, |n| binding.bind(n, addr))
            }
            TemplateItem::Ref(name) => binding.bind(name, addr),
        }
    }
}

fn bound(item: &TemplateItem, binding: &TemplateBinding) -> Option<Addr> {
    match item {
        TemplateItem::Fixed(addr) => Some(*addr),
        TemplateItem::Var {
            name: Some(name), ..
        }
        | TemplateItem::Ref(name)
            if binding.contains(name) =>
        {
            Some(binding.get(name))
        }
        _ => None,
    }
}

fn valid_idtf(idtf: &str) -> bool {
    !idtf.is_empty() && !idtf.chars().any(char::is_whitespace)
}

/// In-memory reference store
///
/// A single `RwLock` guards the whole graph, so every trait method is atomic
/// with respect to the others. Element ids are never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    graph: RwLock<Graph>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Graph> {
        self.graph.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Graph> {
        self.graph.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GraphStore for MemoryStore {
    fn create_node(&self, ty: ElementType) -> StoreResult<Addr> {
        if !ty.is_node() {
            return Err(StoreError::InvalidType {
                operation: "create a node",
                actual: ty,
            });
        }
        let id = self.write().alloc(ty, Body::Node);
        tracing::trace!(element = %Addr::from(id), ty = %ty, "node created");
        Ok(id.into())
    }

    fn create_link(&self, content: &str) -> StoreResult<Addr> {
        let id = self
            .write()
            .alloc(ElementType::Link, Body::Link(content.to_string()));
        Ok(id.into())
    }

    fn create_edge(&self, ty: ElementType, source: Addr, target: Addr) -> StoreResult<Addr> {
        let id = self.write().add_edge(ty, source, target)?;
        tracing::trace!(element = %Addr::from(id), ty = %ty, %source, %target, "edge created");
        Ok(id.into())
    }

    fn create_edge_if_absent(
        &self,
        ty: ElementType,
        source: Addr,
        target: Addr,
    ) -> StoreResult<EdgeOutcome> {
        let mut graph = self.write();
        let source_id = graph.live_id(source)?;
        let target_id = graph.live_id(target)?;
        if let Some(existing) = graph.find_edge(ty, source_id, target_id) {
            return Ok(EdgeOutcome::Existing(existing.into()));
        }
        let id = graph.add_edge(ty, source, target)?;
        Ok(EdgeOutcome::Created(id.into()))
    }

    fn erase_element(&self, addr: Addr) -> bool {
        let Some(id) = addr.id() else {
            return false;
        };
        let erased = self.write().erase(id);
        if erased {
            tracing::trace!(element = %addr, "element erased");
        }
        erased
    }

    fn is_element(&self, addr: Addr) -> bool {
        self.read().get(addr).is_some()
    }

    fn element_type(&self, addr: Addr) -> Option<ElementType> {
        self.read().get(addr).map(|e| e.ty)
    }

    fn edge_info(&self, addr: Addr) -> Option<EdgeInfo> {
        let graph = self.read();
        let (ty, source, target) = graph.edge_endpoints(addr.id()?)?;
        Some(EdgeInfo {
            ty,
            source: source.into(),
            target: target.into(),
        })
    }

    fn edge_exists(&self, source: Addr, target: Addr, ty: ElementType) -> bool {
        let graph = self.read();
        match (source.id(), target.id()) {
            (Some(s), Some(t)) => graph.find_edge(ty, s, t).is_some(),
            _ => false,
        }
    }

    fn iter3(&self, source: Addr, edge: ElementType, target: TypeFilter) -> Vec<Iter3Match> {
        let graph = self.read();
        let Some(element) = graph.get(source) else {
            return Vec::new();
        };
        element
            .outgoing
            .iter()
            .filter_map(|e| {
                let (ty, _, to) = graph.edge_endpoints(*e)?;
                let to_ty = graph.elements.get(&to)?.ty;
                (ty == edge && target.accepts(to_ty)).then(|| Iter3Match {
                    source,
                    edge: (*e).into(),
                    target: to.into(),
                })
            })
            .collect()
    }

    fn iter5(
        &self,
        source: Addr,
        edge: ElementType,
        target: TypeFilter,
        attr_edge: ElementType,
        attr: Addr,
    ) -> Vec<Iter5Match> {
        let graph = self.read();
        let (Some(element), Some(attr_id)) = (graph.get(source), attr.id()) else {
            return Vec::new();
        };
        let mut matches = Vec::new();
        for e in &element.outgoing {
            let Some((ty, _, to)) = graph.edge_endpoints(*e) else {
                continue;
            };
            let Some(to_element) = graph.elements.get(&to) else {
                continue;
            };
            if ty != edge || !target.accepts(to_element.ty) {
                continue;
            }
            let Some(edge_element) = graph.elements.get(e) else {
                continue;
            };
            for a in &edge_element.incoming {
                if let Some((a_ty, from, _)) = graph.edge_endpoints(*a) {
                    if a_ty == attr_edge && from == attr_id {
                        matches.push(Iter5Match {
                            source,
                            edge: (*e).into(),
                            target: to.into(),
                            attr_edge: (*a).into(),
                            attr,
                        });
                    }
                }
            }
        }
        matches
    }

    fn search_template(&self, template: &Template) -> Vec<TemplateBinding> {
        let mut results = Vec::new();
        if !template.is_empty() {
            self.read()
                .search(template.triples(), TemplateBinding::default(), &mut results);
        }
        results
    }

    fn link_content(&self, addr: Addr) -> Option<String> {
        match &self.read().get(addr)?.body {
            Body::Link(content) => Some(content.clone()),
            _ => None,
        }
    }

    fn find_by_idtf(&self, idtf: &str) -> Addr {
        self.read()
            .idtfs
            .get(idtf)
            .map(|id| Addr::from(*id))
            .unwrap_or_default()
    }

    fn set_idtf(&self, addr: Addr, idtf: &str) -> StoreResult<()> {
        if !valid_idtf(idtf) {
            return Err(StoreError::InvalidIdtf {
                idtf: idtf.to_string(),
            });
        }
        let mut graph = self.write();
        let id = graph.live_id(addr)?;
        match graph.idtfs.get(idtf) {
            Some(owner) if *owner == id => return Ok(()),
            Some(owner) => {
                return Err(StoreError::IdtfTaken {
                    idtf: idtf.to_string(),
                    owner: (*owner).into(),
                })
            }
            None => {}
        }
        let previous = graph
            .elements
            .get_mut(&id)
            .and_then(|e| e.idtf.replace(idtf.to_string()));
        if let Some(previous) = previous {
            graph.idtfs.remove(&previous);
        }
        graph.idtfs.insert(idtf.to_string(), id);
        Ok(())
    }

    fn element_count(&self) -> usize {
        self.read().elements.len()
    }
}
