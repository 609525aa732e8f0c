//! Graph store interface
//!
//! The protocol never owns graph memory; it talks to a store through this
//! trait and holds only `Addr` handles. Methods take `&self` because a store is
//! shared between independent agents; implementations own their locking.

mod memory;

pub use memory::MemoryStore;

use crate::addr::Addr;
use crate::element_type::{ElementType, TypeFilter};
use crate::errors::StoreResult;
use crate::template::{Template, TemplateBinding};

/// Endpoints and type of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeInfo {
    pub ty: ElementType,
    pub source: Addr,
    pub target: Addr,
}

/// Outcome of a conditional edge creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    Created(Addr),
    /// An edge of the same type between the same endpoints was already there
    Existing(Addr),
}

impl EdgeOutcome {
    pub fn addr(self) -> Addr {
        match self {
            EdgeOutcome::Created(addr) | EdgeOutcome::Existing(addr) => addr,
        }
    }

    pub fn is_created(self) -> bool {
        matches!(self, EdgeOutcome::Created(_))
    }
}

/// Match of `(source) -edge-> (target)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iter3Match {
    pub source: Addr,
    pub edge: Addr,
    pub target: Addr,
}

/// Match of `(source) -edge-> (target) <-attr_edge- (attr)`
///
/// `attr_edge` points at `edge`, not at `target`: the attribute qualifies the
/// relationship, the way ordinal roles qualify command parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iter5Match {
    pub source: Addr,
    pub edge: Addr,
    pub target: Addr,
    pub attr_edge: Addr,
    pub attr: Addr,
}

pub trait GraphStore: Send + Sync {
    /// Create a node of one of the node kinds
    ///
    /// # Errors
    ///
    /// Returns `InvalidType` for edge and link types.
    fn create_node(&self, ty: ElementType) -> StoreResult<Addr>;

    fn create_link(&self, content: &str) -> StoreResult<Addr>;

    /// Create an edge of an edge type between two existing elements
    ///
    /// # Errors
    ///
    /// Returns `ElementNotFound` if an endpoint does not resolve and
    /// `InvalidType` for non-edge types.
    fn create_edge(&self, ty: ElementType, source: Addr, target: Addr) -> StoreResult<Addr>;

    /// Create an edge unless one with the same type and endpoints exists
    ///
    /// The existence check and the creation happen as one atomic step with
    /// respect to other callers of the same store.
    ///
    /// # Errors
    ///
    /// Same as `create_edge`.
    fn create_edge_if_absent(
        &self,
        ty: ElementType,
        source: Addr,
        target: Addr,
    ) -> StoreResult<EdgeOutcome>;

    /// Erase an element together with every edge incident to it
    ///
    /// Returns `true` only for the caller that actually removed the element.
    fn erase_element(&self, addr: Addr) -> bool;

    fn is_element(&self, addr: Addr) -> bool;

    fn element_type(&self, addr: Addr) -> Option<ElementType>;

    fn edge_info(&self, addr: Addr) -> Option<EdgeInfo>;

    fn edge_exists(&self, source: Addr, target: Addr, ty: ElementType) -> bool;

    /// Outgoing edges of `source` of type `edge`, with targets passing `target`
    fn iter3(&self, source: Addr, edge: ElementType, target: TypeFilter) -> Vec<Iter3Match>;

    /// Relation-qualified attachments of `source`
    ///
    /// Results are in edge creation order.
    fn iter5(
        &self,
        source: Addr,
        edge: ElementType,
        target: TypeFilter,
        attr_edge: ElementType,
        attr: Addr,
    ) -> Vec<Iter5Match>;

    fn search_template(&self, template: &Template) -> Vec<TemplateBinding>;

    fn link_content(&self, addr: Addr) -> Option<String>;

    /// Element carrying the system identifier, or `Addr::Invalid`
    fn find_by_idtf(&self, idtf: &str) -> Addr;

    /// # Errors
    ///
    /// Returns `IdtfTaken` when another element already carries `idtf`.
    fn set_idtf(&self, addr: Addr, idtf: &str) -> StoreResult<()>;

    /// Number of live elements, edges included
    fn element_count(&self) -> usize;
}
