//! Element types and type filters
//!
//! Only the constant, positive, permanent flavours the protocol uses are
//! modelled. Node kinds follow the usual semantic-network split: plain nodes,
//! classes, structures, role relations (`rrel_*`) and non-role relations
//! (`nrel_*`).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Node,
    NodeClass,
    NodeStruct,
    NodeRole,
    NodeNoRole,
    /// Node carrying string content
    Link,
    /// Positive permanent membership arc
    EdgeAccess,
    /// Directed relation between two elements
    EdgeCommon,
}

impl ElementType {
    pub fn is_node(self) -> bool {
        matches!(
            self,
            ElementType::Node
                | ElementType::NodeClass
                | ElementType::NodeStruct
                | ElementType::NodeRole
                | ElementType::NodeNoRole
        )
    }

    pub fn is_edge(self) -> bool {
        matches!(self, ElementType::EdgeAccess | ElementType::EdgeCommon)
    }

    pub fn is_link(self) -> bool {
        self == ElementType::Link
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementType::Node => "node",
            ElementType::NodeClass => "node_class",
            ElementType::NodeStruct => "node_struct",
            ElementType::NodeRole => "node_role",
            ElementType::NodeNoRole => "node_norole",
            ElementType::Link => "link",
            ElementType::EdgeAccess => "edge_access",
            ElementType::EdgeCommon => "edge_common",
        };
        f.write_str(name)
    }
}

/// Constraint on the type of an element matched by a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    Any,
    /// Any node kind (links excluded)
    AnyNode,
    AnyEdge,
    Exact(ElementType),
}

impl TypeFilter {
    pub fn accepts(self, ty: ElementType) -> bool {
        match self {
            TypeFilter::Any => true,
            TypeFilter::AnyNode => ty.is_node(),
            TypeFilter::AnyEdge => ty.is_edge(),
            TypeFilter::Exact(expected) => expected == ty,
        }
    }
}

impl From<ElementType> for TypeFilter {
    fn from(ty: ElementType) -> Self {
        TypeFilter::Exact(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_accepts_everything() {
        for ty in [
            ElementType::Node,
            ElementType::Link,
            ElementType::EdgeAccess,
            ElementType::EdgeCommon,
        ] {
            assert!(TypeFilter::Any.accepts(ty));
        }
    }

    #[test]
    fn test_any_node_excludes_links_and_edges() {
        assert!(TypeFilter::AnyNode.accepts(ElementType::NodeStruct));
        assert!(TypeFilter::AnyNode.accepts(ElementType::NodeRole));
        assert!(!TypeFilter::AnyNode.accepts(ElementType::Link));
        assert!(!TypeFilter::AnyNode.accepts(ElementType::EdgeAccess));
    }

    #[test]
    fn test_exact_is_strict() {
        let filter = TypeFilter::from(ElementType::NodeStruct);
        assert!(filter.accepts(ElementType::NodeStruct));
        assert!(!filter.accepts(ElementType::Node));
    }
}
