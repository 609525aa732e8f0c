//! Read helpers over link contents and sets
//!
//! Action bodies use these to turn parameter elements into values.

use crate::addr::Addr;
use crate::element_type::{ElementType, TypeFilter};
use crate::store::GraphStore;

pub fn check_type(store: &dyn GraphStore, element: Addr, ty: ElementType) -> bool {
    store.element_type(element) == Some(ty)
}

/// Content of a link, `None` for anything that is not a link
pub fn read_string(store: &dyn GraphStore, link: Addr) -> Option<String> {
    store.link_content(link)
}

/// Link content parsed as an integer (surrounding whitespace ignored)
pub fn read_int(store: &dyn GraphStore, link: Addr) -> Option<i64> {
    read_string(store, link)?.trim().parse().ok()
}

/// Number of elements `set` points at through access edges
pub fn set_power(store: &dyn GraphStore, set: Addr) -> usize {
    store
        .iter3(set, ElementType::EdgeAccess, TypeFilter::Any)
        .len()
}

pub fn is_empty_set(store: &dyn GraphStore, set: Addr) -> bool {
    set_power(store, set) == 0
}
