//! Keynode registry
//!
//! Keynodes are well-known graph elements the protocol uses as constants.
//! `Keynodes::resolve` finds each one by system identifier and creates the
//! missing ones, so resolving against the same store twice yields the same
//! registry. An identifier already held by an element of another kind is
//! reused as is; `Keynodes::mismatched` reports such keynodes.

use std::collections::{BTreeMap, HashMap};

use crate::addr::Addr;
use crate::element_type::ElementType;
use crate::errors::StoreResult;
use crate::result_code::ResultCode;
use crate::store::GraphStore;

pub const IDTF_COMMAND_INITIATED: &str = "command_initiated";
pub const IDTF_COMMAND_IN_PROGRESS: &str = "command_in_progress";
pub const IDTF_COMMAND_FINISHED: &str = "command_finished";
/// Permanent mark of the dispatcher that owns a command
pub const IDTF_COMMAND_CLAIMED: &str = "command_claimed";
pub const IDTF_NREL_RESULT: &str = "nrel_result";
pub const IDTF_RESULT_CLASSES: &str = "sc_result";

/// Default number of ordinal relations (`rrel_1` .. `rrel_10`)
pub const DEFAULT_ORDINAL_RELATION_COUNT: usize = 10;

/// System identifier of the ordinal relation for zero-based `index`
pub fn ordinal_idtf(index: usize) -> String {
    format!("rrel_{}", index + 1)
}

/// One registry entry with the element kind the protocol expects for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeynodeEntry {
    pub idtf: String,
    pub addr: Addr,
    pub expected: ElementType,
}

#[derive(Debug, Clone)]
pub struct Keynodes {
    command_initiated: Addr,
    command_in_progress: Addr,
    command_finished: Addr,
    command_claimed: Addr,
    nrel_result: Addr,
    result_classes_root: Addr,
    ordinal_relations: Vec<Addr>,
    result_codes: BTreeMap<ResultCode, Addr>,
    codes_by_addr: HashMap<Addr, ResultCode>,
}

impl Keynodes {
    /// Resolve or create every keynode in `store`
    ///
    /// Every result-code keynode is made a member of the result classes root.
    ///
    /// # Errors
    ///
    /// Propagates store failures; a keynode identifier held by an element of
    /// another store-level kind is not an error, the existing element is used.
    pub fn resolve(store: &dyn GraphStore, ordinal_relation_count: usize) -> StoreResult<Self> {
        let command_initiated = resolve_node(store, IDTF_COMMAND_INITIATED, ElementType::NodeClass)?;
        let command_in_progress =
            resolve_node(store, IDTF_COMMAND_IN_PROGRESS, ElementType::NodeClass)?;
        let command_finished = resolve_node(store, IDTF_COMMAND_FINISHED, ElementType::NodeClass)?;
        let command_claimed = resolve_node(store, IDTF_COMMAND_CLAIMED, ElementType::NodeClass)?;
        let nrel_result = resolve_node(store, IDTF_NREL_RESULT, ElementType::NodeNoRole)?;
        let result_classes_root = resolve_node(store, IDTF_RESULT_CLASSES, ElementType::NodeClass)?;

        let ordinal_relations = (0..ordinal_relation_count)
            .map(|i| resolve_node(store, &ordinal_idtf(i), ElementType::NodeRole))
            .collect::<StoreResult<Vec<_>>>()?;

        let mut result_codes = BTreeMap::new();
        let mut codes_by_addr = HashMap::new();
        for code in ResultCode::ALL {
            let addr = resolve_node(store, &code.system_idtf(), ElementType::NodeClass)?;
            store.create_edge_if_absent(ElementType::EdgeAccess, result_classes_root, addr)?;
            result_codes.insert(code, addr);
            codes_by_addr.insert(addr, code);
        }

        tracing::debug!(
            ordinal_relations = ordinal_relations.len(),
            result_codes = result_codes.len(),
            "keynodes resolved"
        );

        Ok(Self {
            command_initiated,
            command_in_progress,
            command_finished,
            command_claimed,
            nrel_result,
            result_classes_root,
            ordinal_relations,
            result_codes,
            codes_by_addr,
        })
    }

    pub fn command_initiated(&self) -> Addr {
        self.command_initiated
    }

    pub fn command_in_progress(&self) -> Addr {
        self.command_in_progress
    }

    pub fn command_finished(&self) -> Addr {
        self.command_finished
    }

    /// Never erased once written, so a command is dispatched at most once
    pub fn command_claimed(&self) -> Addr {
        self.command_claimed
    }

    /// Relation tagging the command → result struct link
    pub fn nrel_result(&self) -> Addr {
        self.nrel_result
    }

    /// Class whose members are the result-code keynodes
    pub fn result_classes_root(&self) -> Addr {
        self.result_classes_root
    }

    /// Ordinal relation for zero-based `index`, `Addr::Invalid` past the end
    pub fn ordinal_relation(&self, index: usize) -> Addr {
        self.ordinal_relations
            .get(index)
            .copied()
            .unwrap_or_default()
    }

    pub fn ordinal_relation_count(&self) -> usize {
        self.ordinal_relations.len()
    }

    pub fn result_code(&self, code: ResultCode) -> Addr {
        self.result_codes.get(&code).copied().unwrap_or_default()
    }

    pub fn result_code_by_addr(&self, addr: Addr) -> Option<ResultCode> {
        self.codes_by_addr.get(&addr).copied()
    }

    /// Every keynode in registry order: markers, ordinals, result codes
    pub fn entries(&self) -> Vec<KeynodeEntry> {
        let entry = |idtf: String, addr: Addr, expected: ElementType| KeynodeEntry {
            idtf,
            addr,
            expected,
        };
        let mut entries = vec![
            entry(IDTF_COMMAND_INITIATED.into(), self.command_initiated, ElementType::NodeClass),
            entry(IDTF_COMMAND_IN_PROGRESS.into(), self.command_in_progress, ElementType::NodeClass),
            entry(IDTF_COMMAND_FINISHED.into(), self.command_finished, ElementType::NodeClass),
            entry(IDTF_COMMAND_CLAIMED.into(), self.command_claimed, ElementType::NodeClass),
            entry(IDTF_NREL_RESULT.into(), self.nrel_result, ElementType::NodeNoRole),
            entry(IDTF_RESULT_CLASSES.into(), self.result_classes_root, ElementType::NodeClass),
        ];
        entries.extend(
            self.ordinal_relations
                .iter()
                .enumerate()
                .map(|(i, addr)| entry(ordinal_idtf(i), *addr, ElementType::NodeRole)),
        );
        entries.extend(
            self.result_codes
                .iter()
                .map(|(code, addr)| entry(code.system_idtf(), *addr, ElementType::NodeClass)),
        );
        entries
    }

    /// Entries whose element is gone or is not of the expected kind
    pub fn mismatched(&self, store: &dyn GraphStore) -> Vec<KeynodeEntry> {
        self.entries()
            .into_iter()
            .filter(|e| store.element_type(e.addr) != Some(e.expected))
            .collect()
    }
}

fn resolve_node(store: &dyn GraphStore, idtf: &str, ty: ElementType) -> StoreResult<Addr> {
    let existing = store.find_by_idtf(idtf);
    if existing.is_valid() {
        return Ok(existing);
    }
    let addr = store.create_node(ty)?;
    store.set_idtf(addr, idtf)?;
    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_type::TypeFilter;
    use crate::store::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_resolve_is_idempotent() {
        let store = MemoryStore::new();
        let first = Keynodes::resolve(&store, 4).unwrap();
        let count = store.element_count();
        let second = Keynodes::resolve(&store, 4).unwrap();

        assert_eq!(store.element_count(), count);
        assert_eq!(first.command_initiated(), second.command_initiated());
        assert_eq!(first.ordinal_relation(3), second.ordinal_relation(3));
    }

    #[test]
    fn test_ordinal_relations_are_named_from_one() {
        let store = MemoryStore::new();
        let keynodes = Keynodes::resolve(&store, 3).unwrap();

        assert_eq!(keynodes.ordinal_relation_count(), 3);
        assert_eq!(store.find_by_idtf("rrel_1"), keynodes.ordinal_relation(0));
        assert_eq!(store.find_by_idtf("rrel_3"), keynodes.ordinal_relation(2));
        assert_eq!(keynodes.ordinal_relation(3), Addr::Invalid);
    }

    #[test]
    fn test_result_codes_are_members_of_root() {
        let store = MemoryStore::new();
        let keynodes = Keynodes::resolve(&store, 1).unwrap();
        let members = store.iter3(
            keynodes.result_classes_root(),
            ElementType::EdgeAccess,
            TypeFilter::Exact(ElementType::NodeClass),
        );
        assert_eq!(members.len(), ResultCode::ALL.len());
    }

    #[test]
    fn test_marker_keynodes_are_distinct() {
        let store = MemoryStore::new();
        let k = Keynodes::resolve(&store, 1).unwrap();
        let markers = [
            k.command_initiated(),
            k.command_in_progress(),
            k.command_finished(),
            k.command_claimed(),
            k.nrel_result(),
            k.result_classes_root(),
        ];
        for (i, a) in markers.iter().enumerate() {
            assert!(a.is_valid());
            for b in &markers[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_entries_cover_whole_registry() {
        let store = MemoryStore::new();
        let keynodes = Keynodes::resolve(&store, 2).unwrap();
        let entries = keynodes.entries();

        assert_eq!(entries.len(), 6 + 2 + ResultCode::ALL.len());
        for e in &entries {
            assert_eq!(store.find_by_idtf(&e.idtf), e.addr);
        }
        assert!(keynodes.mismatched(&store).is_empty());
    }

    #[test]
    fn test_foreign_kind_under_keynode_idtf_is_mismatched() {
        let store = MemoryStore::new();
        let impostor = store.create_link("not a class").unwrap();
        store.set_idtf(impostor, "sc_result_ok").unwrap();

        let keynodes = Keynodes::resolve(&store, 1).unwrap();
        let mismatched = keynodes.mismatched(&store);

        assert_eq!(keynodes.result_code(ResultCode::Ok), impostor);
        assert_eq!(mismatched.len(), 1);
        assert_eq!(mismatched[0].idtf, "sc_result_ok");
        assert_eq!(mismatched[0].expected, ElementType::NodeClass);
    }

    proptest! {
        #[test]
        fn prop_result_code_round_trip(index in 0usize..ResultCode::ALL.len()) {
            let store = MemoryStore::new();
            let keynodes = Keynodes::resolve(&store, 1).unwrap();
            let code = ResultCode::ALL[index];
            prop_assert_eq!(keynodes.result_code_by_addr(keynodes.result_code(code)), Some(code));
        }
    }
}
