use serde::Serialize;

/// Stable identifier of a graph element inside one store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Handle to a graph element
///
/// `Invalid` is the universal "not found" answer of queries. Handles are plain
/// values: holding one does not keep the element alive, and a handle to an
/// erased element stays `Element` but no longer resolves in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum Addr {
    #[default]
    Invalid,
    Element(ElementId),
}

impl Addr {
    pub fn is_valid(&self) -> bool {
        matches!(self, Addr::Element(_))
    }

    pub fn id(&self) -> Option<ElementId> {
        match self {
            Addr::Element(id) => Some(*id),
            Addr::Invalid => None,
        }
    }
}

impl From<ElementId> for Addr {
    fn from(id: ElementId) -> Self {
        Addr::Element(id)
    }
}

impl std::fmt::Display for Addr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Addr::Element(id) => write!(f, "#{}", id.0),
            Addr::Invalid => f.write_str("#invalid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_invalid() {
        let addr = Addr::default();
        assert!(!addr.is_valid());
        assert_eq!(addr.id(), None);
    }

    #[test]
    fn test_element_roundtrip() {
        let addr = Addr::from(ElementId::new(42));
        assert!(addr.is_valid());
        assert_eq!(addr.id().map(ElementId::get), Some(42));
        assert_eq!(addr.to_string(), "#42");
    }

    #[test]
    fn test_invalid_display() {
        assert_eq!(Addr::Invalid.to_string(), "#invalid");
    }
}
