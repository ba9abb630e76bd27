// bind.rs — Instantiation assembler
//
// Walks a unit's port contract in order and produces the binding list for
// one instantiation: every contract port paired with the signal (or
// external port) it connects to, grouped for display. Neighbor slots bind
// in neighbor-pair order; getting that order wrong cross-wires two cores
// while still producing syntactically valid text, which is why the pairing
// lives here in one place.
//
// Preconditions: topology and config validated; signal set derivable.
// Postconditions: binding count equals contract port count for every unit.
// Failure modes: ContractMismatch when those counts disagree, which is a
//                defect in the generator rather than a configuration error.
// Side effects: none.

use std::fmt;

use crate::config::CoreSpec;
use crate::contract::{
    self, GlobalRole, NeighborSlot, UnitKind, WrapperRole,
};
use crate::ident::{self, CoreId, TopPortKind};
use crate::topology::NeighborPair;

/// One port-to-signal association, rendered as `.port(expr)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub port: String,
    pub expr: String,
}

/// Consecutive bindings sharing a contract group label.
#[derive(Debug, Clone)]
pub struct BindGroup {
    pub comment: Option<&'static str>,
    pub binds: Vec<Binding>,
}

/// One fully bound module instantiation, ready for the composer.
#[derive(Debug, Clone)]
pub struct Instantiation {
    pub unit: UnitKind,
    pub instance: String,
    pub header_comment: String,
    pub params: Vec<(String, String)>,
    pub groups: Vec<BindGroup>,
}

impl Instantiation {
    /// Total number of bindings across all groups.
    pub fn binding_count(&self) -> usize {
        self.groups.iter().map(|g| g.binds.len()).sum()
    }
}

/// The contract and the produced bindings disagree in count. Always a
/// generator defect, never user input; carries full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractMismatch {
    pub unit: UnitKind,
    pub core: Option<CoreId>,
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for ContractMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.core {
            Some(core) => write!(
                f,
                "contract mismatch in {} for core {}: contract lists {} ports, {} bindings produced; this is a generator defect",
                self.unit, core, self.expected, self.actual
            ),
            None => write!(
                f,
                "contract mismatch in {}: contract lists {} ports, {} bindings produced; this is a generator defect",
                self.unit, self.expected, self.actual
            ),
        }
    }
}

impl std::error::Error for ContractMismatch {}

// ── Grouping helper ─────────────────────────────────────────────────────────

fn group_bindings(
    entries: Vec<(Option<&'static str>, Binding)>,
) -> Vec<BindGroup> {
    let mut groups: Vec<BindGroup> = Vec::new();
    for (comment, bind) in entries {
        match groups.last_mut() {
            Some(last) if last.comment == comment => last.binds.push(bind),
            _ => groups.push(BindGroup {
                comment,
                binds: vec![bind],
            }),
        }
    }
    groups
}

fn check_count(
    unit: UnitKind,
    core: Option<CoreId>,
    expected: usize,
    inst: Instantiation,
) -> Result<Instantiation, ContractMismatch> {
    let actual = inst.binding_count();
    if actual != expected {
        return Err(ContractMismatch {
            unit,
            core,
            expected,
            actual,
        });
    }
    Ok(inst)
}

// ── Per-unit assembly ───────────────────────────────────────────────────────

/// Bind one core wrapper instance: task/memory/status signals for the core,
/// neighbor ports to the pair's link triples in declared order.
pub fn core_wrapper_instance(
    core: &CoreSpec,
    pair: NeighborPair,
) -> Result<Instantiation, ContractMismatch> {
    let ports = contract::core_wrapper_contract();
    let expected = ports.len();

    let entries = ports
        .iter()
        .map(|port| {
            let bind = match port.role {
                WrapperRole::Clk => Binding {
                    port: ident::port_name(TopPortKind::Clk).to_string(),
                    expr: ident::port_name(TopPortKind::Clk).to_string(),
                },
                WrapperRole::RstN => Binding {
                    port: ident::port_name(TopPortKind::RstN).to_string(),
                    expr: ident::port_name(TopPortKind::RstN).to_string(),
                },
                WrapperRole::Core(kind) => Binding {
                    port: kind.suffix().to_string(),
                    expr: ident::core_signal(core.id, kind),
                },
                WrapperRole::Neighbor { slot, kind } => {
                    let to = match slot {
                        NeighborSlot::First => pair.first(),
                        NeighborSlot::Second => pair.second(),
                    };
                    Binding {
                        port: ident::wrapper_neighbor_port(to, kind),
                        expr: ident::link_signal(core.id, to, kind),
                    }
                }
            };
            (port.group, bind)
        })
        .collect();

    let inst = Instantiation {
        unit: UnitKind::CoreWrapper,
        instance: ident::core_instance(core.id),
        header_comment: format!("Core {} ({})", core.id, core.isa),
        params: vec![
            ("CORE_ID".to_string(), core.id.to_string()),
            ("XLEN".to_string(), "XLEN".to_string()),
            ("ISA_STRING".to_string(), format!("\"{}\"", core.isa)),
        ],
        groups: group_bindings(entries),
    };
    check_count(UnitKind::CoreWrapper, Some(core.id), expected, inst)
}

fn global_binding(role: GlobalRole) -> Binding {
    match role {
        GlobalRole::Clk => Binding {
            port: ident::port_name(TopPortKind::Clk).to_string(),
            expr: ident::port_name(TopPortKind::Clk).to_string(),
        },
        GlobalRole::RstN => Binding {
            port: ident::port_name(TopPortKind::RstN).to_string(),
            expr: ident::port_name(TopPortKind::RstN).to_string(),
        },
        // These units name their per-core ports after the very signals the
        // enclosing scope declares, so port and expression coincide.
        GlobalRole::PerCore { core, kind } => {
            let name = ident::core_signal(core, kind);
            Binding {
                port: name.clone(),
                expr: name,
            }
        }
        GlobalRole::External(kind) => {
            let name = ident::port_name(kind).to_string();
            Binding {
                port: name.clone(),
                expr: name,
            }
        }
    }
}

/// Bind the single task dispatcher instance: every core's task triple,
/// cores ascending, then the completed-task counter.
pub fn dispatcher_instance(num_cores: u32) -> Result<Instantiation, ContractMismatch> {
    let ports = contract::dispatcher_contract(num_cores);
    let expected = ports.len();

    let entries = ports
        .iter()
        .map(|port| (port.group, global_binding(port.role)))
        .collect();

    let inst = Instantiation {
        unit: UnitKind::Dispatcher,
        instance: ident::DISPATCHER_INSTANCE.to_string(),
        header_comment: "Task dispatcher".to_string(),
        params: vec![
            ("NUM_CORES".to_string(), "NUM_CORES".to_string()),
            ("TASK_CACHE_DEPTH".to_string(), "TASK_CACHE_DEPTH".to_string()),
        ],
        groups: group_bindings(entries),
    };
    check_count(UnitKind::Dispatcher, None, expected, inst)
}

/// Bind the single memory arbiter instance: every core's memory sextuple,
/// cores ascending, then the unified external memory port.
pub fn arbiter_instance(num_cores: u32) -> Result<Instantiation, ContractMismatch> {
    let ports = contract::arbiter_contract(num_cores);
    let expected = ports.len();

    let entries = ports
        .iter()
        .map(|port| (port.group, global_binding(port.role)))
        .collect();

    let inst = Instantiation {
        unit: UnitKind::Arbiter,
        instance: ident::ARBITER_INSTANCE.to_string(),
        header_comment: "Memory arbiter".to_string(),
        params: vec![
            ("NUM_CORES".to_string(), "NUM_CORES".to_string()),
            ("XLEN".to_string(), "XLEN".to_string()),
            ("MEM_SIZE".to_string(), "DATA_MEM_SIZE".to_string()),
        ],
        groups: group_bindings(entries),
    };
    check_count(UnitKind::Arbiter, None, expected, inst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::CoreId;
    use crate::topology::NeighborPair;

    fn core(id: u32, isa: &str) -> CoreSpec {
        CoreSpec {
            id: CoreId(id),
            isa: isa.to_string(),
        }
    }

    #[test]
    fn wrapper_neighbor_ports_follow_pair_order() {
        let pair = NeighborPair::new(CoreId(3), CoreId(1));
        let inst = core_wrapper_instance(&core(0, "RV32IMC"), pair).unwrap();

        let nbr_group = inst
            .groups
            .iter()
            .find(|g| g.comment == Some("Neighbor register interfaces"))
            .unwrap();
        assert_eq!(nbr_group.binds.len(), 6);
        // First slot (neighbor 3) binds before second slot (neighbor 1).
        assert_eq!(nbr_group.binds[0].port, "nbr3_reg_addr");
        assert_eq!(nbr_group.binds[0].expr, "core0_nbr3_reg_addr");
        assert_eq!(nbr_group.binds[3].port, "nbr1_reg_addr");
        assert_eq!(nbr_group.binds[3].expr, "core0_nbr1_reg_addr");
    }

    #[test]
    fn wrapper_binding_count_matches_contract() {
        let pair = NeighborPair::new(CoreId(1), CoreId(2));
        let inst = core_wrapper_instance(&core(0, "RV32IMC"), pair).unwrap();
        assert_eq!(inst.binding_count(), 18);
        assert_eq!(inst.instance, "core_0_inst");
        assert_eq!(inst.params[2].1, "\"RV32IMC\"");
    }

    #[test]
    fn dispatcher_binds_every_task_triple() {
        let inst = dispatcher_instance(4).unwrap();
        assert_eq!(inst.binding_count(), 2 + 4 * 3 + 1);
        let task_group = inst
            .groups
            .iter()
            .find(|g| g.comment == Some("Task interfaces to cores"))
            .unwrap();
        assert_eq!(task_group.binds.len(), 12);
        assert_eq!(task_group.binds[0].port, "core0_task_req");
        assert_eq!(task_group.binds[11].port, "core3_task_data");
    }

    #[test]
    fn arbiter_ends_with_unified_port() {
        let inst = arbiter_instance(2).unwrap();
        assert_eq!(inst.binding_count(), 2 + 2 * 6 + 6);
        let last = inst.groups.last().unwrap();
        assert_eq!(last.comment, Some("Unified memory interface"));
        assert_eq!(last.binds.last().unwrap().port, "mem_ack");
    }

    #[test]
    fn mismatch_display_carries_context() {
        let err = ContractMismatch {
            unit: UnitKind::CoreWrapper,
            core: Some(CoreId(2)),
            expected: 18,
            actual: 17,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("core_wrapper"), "{}", msg);
        assert!(msg.contains("core 2"), "{}", msg);
        assert!(msg.contains("18"), "{}", msg);
        assert!(msg.contains("17"), "{}", msg);
    }
}
