//! Parameter lookup on command instances
//!
//! A parameter is reached through `(command) -access-> (param)` where the
//! access edge itself is tagged by a relation keynode.

use sc_core::{Addr, ElementType, GraphStore, Keynodes, TypeFilter};

/// Parameter of `command` attached under `relation`
///
/// Returns `Addr::Invalid` when nothing matches. With several matches the
/// first one in store order wins.
pub fn get_param(
    store: &dyn GraphStore,
    command: Addr,
    relation: Addr,
    filter: TypeFilter,
) -> Addr {
    if !command.is_valid() || !relation.is_valid() {
        return Addr::Invalid;
    }
    store
        .iter5(
            command,
            ElementType::EdgeAccess,
            filter,
            ElementType::EdgeAccess,
            relation,
        )
        .first()
        .map(|m| m.target)
        .unwrap_or_default()
}

/// Parameter at zero-based `index`, tagged by `rrel_{index+1}`
pub fn get_param_by_index(
    store: &dyn GraphStore,
    keynodes: &Keynodes,
    command: Addr,
    index: usize,
) -> Addr {
    get_param(
        store,
        command,
        keynodes.ordinal_relation(index),
        TypeFilter::Any,
    )
}
