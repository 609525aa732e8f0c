use std::sync::Arc;

use sc_agent::{ActionAgent, ActionContext, AgentConfig};
use sc_core::{Addr, ElementType, GraphStore, Keynodes, MemoryStore, ResultCode};

pub struct World {
    pub store: Arc<MemoryStore>,
    pub keynodes: Arc<Keynodes>,
}

/// Fresh store with the protocol keynodes bootstrapped
#[allow(dead_code)]
pub fn world() -> World {
    world_with_ordinals(AgentConfig::default().ordinal_relation_count)
}

#[allow(dead_code)]
pub fn world_with_ordinals(ordinal_relation_count: usize) -> World {
    let store = Arc::new(MemoryStore::new());
    let config = AgentConfig {
        ordinal_relation_count,
        ..AgentConfig::default()
    };
    let keynodes = Arc::new(sc_agent::initialize(store.as_ref(), &config).unwrap());
    World { store, keynodes }
}

impl World {
    #[allow(dead_code)]
    pub fn class(&self, idtf: &str) -> Addr {
        let class = self.store.create_node(ElementType::NodeClass).unwrap();
        self.store.set_idtf(class, idtf).unwrap();
        class
    }

    /// Agent for `class` whose body always answers `code`
    #[allow(dead_code)]
    pub fn fixed_agent(&self, class: Addr, code: ResultCode) -> ActionAgent {
        ActionAgent::new(
            format!("fixed_{}", code),
            class,
            self.store.clone(),
            self.keynodes.clone(),
            move |_: &ActionContext<'_>| code,
        )
    }

    /// Outgoing initiated marker pointing at `command`
    #[allow(dead_code)]
    pub fn initiated_edge(&self, command: Addr) -> Addr {
        self.store
            .iter3(
                self.keynodes.command_initiated(),
                ElementType::EdgeAccess,
                sc_core::TypeFilter::Any,
            )
            .into_iter()
            .find(|m| m.target == command)
            .map(|m| m.edge)
            .unwrap_or_default()
    }
}
