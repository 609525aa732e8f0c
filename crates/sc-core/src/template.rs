//! Declarative graph templates
//!
//! A template is an ordered list of triples `(source, edge, target)`. Each
//! position is either a fixed element, a typed variable (optionally named), or
//! a reference to a variable named earlier. Search results expose variables by
//! name only, so editing a template cannot silently shift a binding.
//!
//! ```
//! use sc_core::{ElementType, Template, TemplateItem};
//! # use sc_core::Addr;
//! # let root = Addr::Invalid;
//! # let target = Addr::Invalid;
//! let template = Template::new()
//!     .triple(
//!         root,
//!         ElementType::EdgeAccess,
//!         TemplateItem::var(ElementType::NodeClass).named("class"),
//!     )
//!     .triple("class", ElementType::EdgeAccess, target);
//! assert_eq!(template.len(), 2);
//! ```

use std::collections::BTreeMap;

use crate::addr::Addr;
use crate::element_type::{ElementType, TypeFilter};

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateItem {
    Fixed(Addr),
    Var {
        filter: TypeFilter,
        name: Option<String>,
    },
    /// Reference to a variable named in this or an earlier triple
    Ref(String),
}

impl TemplateItem {
    pub fn var(filter: impl Into<TypeFilter>) -> Self {
        TemplateItem::Var {
            filter: filter.into(),
            name: None,
        }
    }

    /// Name a variable so its binding shows up in search results
    pub fn named(self, alias: impl Into<String>) -> Self {
        match self {
            TemplateItem::Var { filter, .. } => TemplateItem::Var {
                filter,
                name: Some(alias.into()),
            },
            other => other,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            TemplateItem::Var { name, .. } => name.as_deref(),
            TemplateItem::Ref(name) => Some(name),
            TemplateItem::Fixed(_) => None,
        }
    }
}

impl From<Addr> for TemplateItem {
    fn from(addr: Addr) -> Self {
        TemplateItem::Fixed(addr)
    }
}

impl From<ElementType> for TemplateItem {
    fn from(ty: ElementType) -> Self {
        TemplateItem::var(ty)
    }
}

impl From<TypeFilter> for TemplateItem {
    fn from(filter: TypeFilter) -> Self {
        TemplateItem::var(filter)
    }
}

impl From<&str> for TemplateItem {
    fn from(alias: &str) -> Self {
        TemplateItem::Ref(alias.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateTriple {
    pub source: TemplateItem,
    pub edge: TemplateItem,
    pub target: TemplateItem,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    triples: Vec<TemplateTriple>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triple(
        mut self,
        source: impl Into<TemplateItem>,
        edge: impl Into<TemplateItem>,
        target: impl Into<TemplateItem>,
    ) -> Self {
        self.triples.push(TemplateTriple {
            source: source.into(),
            edge: edge.into(),
            target: target.into(),
        });
        self
    }

    pub fn triples(&self) -> &[TemplateTriple] {
        &self.triples
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

/// One consistent assignment of a template's named variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateBinding {
    values: BTreeMap<String, Addr>,
}

impl TemplateBinding {
    /// Bound element, or `Addr::Invalid` if the name is not part of the template
    pub fn get(&self, alias: &str) -> Addr {
        self.values.get(alias).copied().unwrap_or_default()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.values.contains_key(alias)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Bind `alias`; fails when it is already bound to another element
    pub(crate) fn bind(&mut self, alias: &str, addr: Addr) -> bool {
        match self.values.get(alias) {
            Some(existing) => *existing == addr,
            None => {
                self.values.insert(alias.to_string(), addr);
                true
            }
        }
    }
}
