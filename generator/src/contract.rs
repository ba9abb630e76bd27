// contract.rs — Unit port contracts and the top-level outward interface
//
// Each structural unit (core wrapper, task dispatcher, memory arbiter)
// exposes a fixed, versioned, ordered port list. The contracts here are the
// single description of those lists; the assembler binds against them in
// order and must never reorder or invent ports. A contract change (say, a
// third neighbor slot) is made here and nowhere else.

use crate::ident::{self, CoreId, CoreSignalKind, LinkSignalKind, TopPortKind};
use crate::signal::{SignalWidth, REG_ADDR_WIDTH, TASK_DATA_WIDTH};

/// Contract revision for each unit. Bump when a unit's port list changes.
pub const CORE_WRAPPER_CONTRACT_VERSION: u32 = 1;
pub const DISPATCHER_CONTRACT_VERSION: u32 = 1;
pub const ARBITER_CONTRACT_VERSION: u32 = 1;

/// The structural unit kinds instantiated by the assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    CoreWrapper,
    Dispatcher,
    Arbiter,
}

impl UnitKind {
    /// The Verilog module name of the unit.
    pub fn module_name(self) -> &'static str {
        match self {
            UnitKind::CoreWrapper => "core_wrapper",
            UnitKind::Dispatcher => "task_dispatcher",
            UnitKind::Arbiter => "memory_arbiter",
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.module_name())
    }
}

/// Port direction from the unit's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDir {
    Input,
    Output,
}

/// Width expression of a contract port, resolved against the global
/// configuration when concrete widths are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthExpr {
    Scalar,
    Literal(u32),
    Xlen,
    NumCores,
}

/// Which of the two neighbor slots of a core wrapper a port belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborSlot {
    First,
    Second,
}

// ── Core wrapper ────────────────────────────────────────────────────────────

/// What a core wrapper port carries, which also determines the signal the
/// assembler binds to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapperRole {
    Clk,
    RstN,
    Core(CoreSignalKind),
    Neighbor { slot: NeighborSlot, kind: LinkSignalKind },
}

#[derive(Debug, Clone, Copy)]
pub struct WrapperPort {
    pub role: WrapperRole,
    pub dir: PortDir,
    pub width: WidthExpr,
    pub group: Option<&'static str>,
}

fn core_kind_dir(kind: CoreSignalKind) -> PortDir {
    // Directions are from the wrapper's point of view: requests out,
    // acknowledgements and read data in.
    match kind {
        CoreSignalKind::TaskReq => PortDir::Output,
        CoreSignalKind::TaskAck => PortDir::Input,
        CoreSignalKind::TaskData => PortDir::Input,
        CoreSignalKind::MemReq => PortDir::Output,
        CoreSignalKind::MemWe => PortDir::Output,
        CoreSignalKind::MemAddr => PortDir::Output,
        CoreSignalKind::MemWdata => PortDir::Output,
        CoreSignalKind::MemRdata => PortDir::Input,
        CoreSignalKind::MemAck => PortDir::Input,
        CoreSignalKind::Active => PortDir::Output,
    }
}

fn core_kind_width(kind: CoreSignalKind) -> WidthExpr {
    match kind {
        CoreSignalKind::TaskData => WidthExpr::Literal(TASK_DATA_WIDTH),
        CoreSignalKind::MemAddr | CoreSignalKind::MemWdata | CoreSignalKind::MemRdata => {
            WidthExpr::Xlen
        }
        _ => WidthExpr::Scalar,
    }
}

fn link_kind_width(kind: LinkSignalKind) -> WidthExpr {
    match kind {
        LinkSignalKind::RegAddr => WidthExpr::Literal(REG_ADDR_WIDTH),
        LinkSignalKind::RegRdata => WidthExpr::Xlen,
        LinkSignalKind::RegReq => WidthExpr::Scalar,
    }
}

/// The core wrapper's port list, in contract order: clock/reset, task
/// triple, memory sextuple, the two neighbor triples (first slot before
/// second), status.
pub fn core_wrapper_contract() -> Vec<WrapperPort> {
    let mut ports = vec![
        WrapperPort {
            role: WrapperRole::Clk,
            dir: PortDir::Input,
            width: WidthExpr::Scalar,
            group: None,
        },
        WrapperPort {
            role: WrapperRole::RstN,
            dir: PortDir::Input,
            width: WidthExpr::Scalar,
            group: None,
        },
    ];

    for kind in CoreSignalKind::TASK {
        ports.push(WrapperPort {
            role: WrapperRole::Core(kind),
            dir: core_kind_dir(kind),
            width: core_kind_width(kind),
            group: Some("Task interface from scheduler"),
        });
    }
    for kind in CoreSignalKind::MEM {
        ports.push(WrapperPort {
            role: WrapperRole::Core(kind),
            dir: core_kind_dir(kind),
            width: core_kind_width(kind),
            group: Some("Memory interface"),
        });
    }
    for slot in [NeighborSlot::First, NeighborSlot::Second] {
        for kind in LinkSignalKind::ALL {
            ports.push(WrapperPort {
                role: WrapperRole::Neighbor { slot, kind },
                dir: match kind {
                    // The wrapper serves its neighbors' reads: index and
                    // request come in, register data goes out.
                    LinkSignalKind::RegAddr => PortDir::Input,
                    LinkSignalKind::RegRdata => PortDir::Output,
                    LinkSignalKind::RegReq => PortDir::Input,
                },
                width: link_kind_width(kind),
                group: Some("Neighbor register interfaces"),
            });
        }
    }
    ports.push(WrapperPort {
        role: WrapperRole::Core(CoreSignalKind::Active),
        dir: core_kind_dir(CoreSignalKind::Active),
        width: WidthExpr::Scalar,
        group: Some("Status"),
    });

    ports
}

// ── Dispatcher and arbiter ──────────────────────────────────────────────────

/// What a dispatcher or arbiter port carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalRole {
    Clk,
    RstN,
    /// One core's slice of the unit's fan-in, named `core{id}_{kind}`.
    PerCore { core: CoreId, kind: CoreSignalKind },
    /// A pass-through to a top-level external port.
    External(TopPortKind),
}

#[derive(Debug, Clone, Copy)]
pub struct GlobalPort {
    pub role: GlobalRole,
    pub dir: PortDir,
    pub width: WidthExpr,
    pub group: Option<&'static str>,
}

fn clk_rst_ports() -> [GlobalPort; 2] {
    [
        GlobalPort {
            role: GlobalRole::Clk,
            dir: PortDir::Input,
            width: WidthExpr::Scalar,
            group: None,
        },
        GlobalPort {
            role: GlobalRole::RstN,
            dir: PortDir::Input,
            width: WidthExpr::Scalar,
            group: None,
        },
    ]
}

/// The task dispatcher's port list for an `num_cores`-core array: one task
/// triple per core, ascending, then the completed-task counter.
pub fn dispatcher_contract(num_cores: u32) -> Vec<GlobalPort> {
    let mut ports: Vec<GlobalPort> = clk_rst_ports().to_vec();

    for id in 0..num_cores {
        for kind in CoreSignalKind::TASK {
            ports.push(GlobalPort {
                role: GlobalRole::PerCore {
                    core: CoreId(id),
                    kind,
                },
                // Mirror of the wrapper side.
                dir: match core_kind_dir(kind) {
                    PortDir::Input => PortDir::Output,
                    PortDir::Output => PortDir::Input,
                },
                width: core_kind_width(kind),
                group: Some("Task interfaces to cores"),
            });
        }
    }
    ports.push(GlobalPort {
        role: GlobalRole::External(TopPortKind::CompletedTasks),
        dir: PortDir::Output,
        width: WidthExpr::Literal(32),
        group: Some("Status"),
    });

    ports
}

/// The memory arbiter's port list for an `num_cores`-core array: one memory
/// sextuple per core, ascending, then the unified external memory port.
pub fn arbiter_contract(num_cores: u32) -> Vec<GlobalPort> {
    let mut ports: Vec<GlobalPort> = clk_rst_ports().to_vec();

    for id in 0..num_cores {
        for kind in CoreSignalKind::MEM {
            ports.push(GlobalPort {
                role: GlobalRole::PerCore {
                    core: CoreId(id),
                    kind,
                },
                dir: match core_kind_dir(kind) {
                    PortDir::Input => PortDir::Output,
                    PortDir::Output => PortDir::Input,
                },
                width: core_kind_width(kind),
                group: Some("Core memory interfaces"),
            });
        }
    }
    for kind in TopPortKind::MEM {
        ports.push(GlobalPort {
            role: GlobalRole::External(kind),
            dir: match kind {
                TopPortKind::MemRdata | TopPortKind::MemAck => PortDir::Input,
                _ => PortDir::Output,
            },
            width: match kind {
                TopPortKind::MemAddr | TopPortKind::MemWdata | TopPortKind::MemRdata => {
                    WidthExpr::Xlen
                }
                _ => WidthExpr::Scalar,
            },
            group: Some("Unified memory interface"),
        });
    }

    ports
}

// ── Top-level outward interface ─────────────────────────────────────────────

/// One external port of the generated top-level module, with its concrete
/// declaration width.
#[derive(Debug, Clone)]
pub struct TopPort {
    pub name: &'static str,
    pub dir: PortDir,
    pub width: SignalWidth,
    pub group: Option<&'static str>,
}

/// The top-level module's external port list, derived from the global
/// configuration only.
pub fn top_level_ports(num_cores: u32, word_width: u32) -> Vec<TopPort> {
    let mut ports = vec![
        TopPort {
            name: ident::port_name(TopPortKind::Clk),
            dir: PortDir::Input,
            width: SignalWidth::Scalar,
            group: Some("Clock and reset"),
        },
        TopPort {
            name: ident::port_name(TopPortKind::RstN),
            dir: PortDir::Input,
            width: SignalWidth::Scalar,
            group: Some("Clock and reset"),
        },
    ];

    for kind in TopPortKind::MEM {
        ports.push(TopPort {
            name: ident::port_name(kind),
            dir: match kind {
                TopPortKind::MemRdata | TopPortKind::MemAck => PortDir::Input,
                _ => PortDir::Output,
            },
            width: match kind {
                TopPortKind::MemAddr | TopPortKind::MemWdata | TopPortKind::MemRdata => {
                    SignalWidth::Bits(word_width)
                }
                _ => SignalWidth::Scalar,
            },
            group: Some("External memory interface"),
        });
    }

    ports.push(TopPort {
        name: ident::port_name(TopPortKind::CoreActive),
        dir: PortDir::Output,
        width: SignalWidth::Bits(num_cores),
        group: Some("Debug outputs"),
    });
    ports.push(TopPort {
        name: ident::port_name(TopPortKind::CoreTaskDone),
        dir: PortDir::Output,
        width: SignalWidth::Bits(num_cores),
        group: Some("Debug outputs"),
    });
    ports.push(TopPort {
        name: ident::port_name(TopPortKind::CompletedTasks),
        dir: PortDir::Output,
        width: SignalWidth::Bits(32),
        group: Some("Debug outputs"),
    });

    ports
}

/// The top-level module's parameter list, values rendered as Verilog
/// literals.
pub fn top_level_parameters(
    num_cores: u32,
    word_width: u32,
    data_mem_size: u32,
    task_cache_depth: u32,
) -> Vec<(String, String)> {
    vec![
        ("NUM_CORES".to_string(), num_cores.to_string()),
        ("XLEN".to_string(), word_width.to_string()),
        ("DATA_MEM_SIZE".to_string(), data_mem_size.to_string()),
        ("TASK_CACHE_DEPTH".to_string(), task_cache_depth.to_string()),
    ]
}
