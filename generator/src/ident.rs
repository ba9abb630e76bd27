// ident.rs — Deterministic identifier scheme for the generated assembly
//
// Every name that appears in more than one output fragment (a declaration
// here, a port binding there) is produced by these functions and nowhere
// else. The encoding is collision-free by construction: a core signal is
// `core{id}_{kind}` and a link signal is `core{from}_nbr{to}_{kind}`, where
// every kind suffix comes from a closed enum, never begins with a digit,
// and no core-signal suffix begins with `nbr`. The id digits therefore end
// at the first `_`, the `nbr` marker separates the two families, and the
// closed suffix sets decode the remainder uniquely.

use std::fmt;

/// Index of one core in the array. Ids are contiguous in `[0, num_cores)`
/// and are the sole cross-reference key between generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoreId(pub u32);

impl fmt::Display for CoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Signal kinds ────────────────────────────────────────────────────────────

/// The fixed set of per-core signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreSignalKind {
    TaskReq,
    TaskAck,
    TaskData,
    MemReq,
    MemWe,
    MemAddr,
    MemWdata,
    MemRdata,
    MemAck,
    Active,
}

impl CoreSignalKind {
    /// All per-core kinds, in declaration order.
    pub const ALL: [CoreSignalKind; 10] = [
        CoreSignalKind::TaskReq,
        CoreSignalKind::TaskAck,
        CoreSignalKind::TaskData,
        CoreSignalKind::MemReq,
        CoreSignalKind::MemWe,
        CoreSignalKind::MemAddr,
        CoreSignalKind::MemWdata,
        CoreSignalKind::MemRdata,
        CoreSignalKind::MemAck,
        CoreSignalKind::Active,
    ];

    /// The task-interface triple, in dispatcher binding order.
    pub const TASK: [CoreSignalKind; 3] = [
        CoreSignalKind::TaskReq,
        CoreSignalKind::TaskAck,
        CoreSignalKind::TaskData,
    ];

    /// The memory-interface sextuple, in arbiter binding order.
    pub const MEM: [CoreSignalKind; 6] = [
        CoreSignalKind::MemReq,
        CoreSignalKind::MemWe,
        CoreSignalKind::MemAddr,
        CoreSignalKind::MemWdata,
        CoreSignalKind::MemRdata,
        CoreSignalKind::MemAck,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            CoreSignalKind::TaskReq => "task_req",
            CoreSignalKind::TaskAck => "task_ack",
            CoreSignalKind::TaskData => "task_data",
            CoreSignalKind::MemReq => "mem_req",
            CoreSignalKind::MemWe => "mem_we",
            CoreSignalKind::MemAddr => "mem_addr",
            CoreSignalKind::MemWdata => "mem_wdata",
            CoreSignalKind::MemRdata => "mem_rdata",
            CoreSignalKind::MemAck => "mem_ack",
            CoreSignalKind::Active => "active",
        }
    }
}

/// The register-sharing triple carried by every neighbor link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkSignalKind {
    RegAddr,
    RegRdata,
    RegReq,
}

impl LinkSignalKind {
    /// All link kinds, in declaration and binding order.
    pub const ALL: [LinkSignalKind; 3] = [
        LinkSignalKind::RegAddr,
        LinkSignalKind::RegRdata,
        LinkSignalKind::RegReq,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            LinkSignalKind::RegAddr => "reg_addr",
            LinkSignalKind::RegRdata => "reg_rdata",
            LinkSignalKind::RegReq => "reg_req",
        }
    }
}

// ── Naming functions ────────────────────────────────────────────────────────

/// Name of a per-core signal in the enclosing assembly scope.
pub fn core_signal(core: CoreId, kind: CoreSignalKind) -> String {
    format!("core{}_{}", core.0, kind.suffix())
}

/// Name of one wire of the link-signal triple for the directed link
/// `from -> to`.
pub fn link_signal(from: CoreId, to: CoreId, kind: LinkSignalKind) -> String {
    format!("core{}_nbr{}_{}", from.0, to.0, kind.suffix())
}

/// Name of the core wrapper's neighbor-facing port bound to neighbor `to`.
pub fn wrapper_neighbor_port(to: CoreId, kind: LinkSignalKind) -> String {
    format!("nbr{}_{}", to.0, kind.suffix())
}

/// Instance name of the wrapper for `core`.
pub fn core_instance(core: CoreId) -> String {
    format!("core_{}_inst", core.0)
}

/// Instance name of the task dispatcher.
pub const DISPATCHER_INSTANCE: &str = "dispatcher_inst";

/// Instance name of the memory arbiter.
pub const ARBITER_INSTANCE: &str = "mem_arbiter_inst";

// ── Top-level port names ────────────────────────────────────────────────────

/// External ports of the generated top-level module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopPortKind {
    Clk,
    RstN,
    MemAddr,
    MemWdata,
    MemRdata,
    MemWe,
    MemReq,
    MemAck,
    CoreActive,
    CoreTaskDone,
    CompletedTasks,
}

impl TopPortKind {
    /// The unified external memory interface, in arbiter binding order.
    pub const MEM: [TopPortKind; 6] = [
        TopPortKind::MemAddr,
        TopPortKind::MemWdata,
        TopPortKind::MemRdata,
        TopPortKind::MemWe,
        TopPortKind::MemReq,
        TopPortKind::MemAck,
    ];
}

/// Name of a top-level external port.
pub fn port_name(kind: TopPortKind) -> &'static str {
    match kind {
        TopPortKind::Clk => "clk",
        TopPortKind::RstN => "rst_n",
        TopPortKind::MemAddr => "mem_addr",
        TopPortKind::MemWdata => "mem_wdata",
        TopPortKind::MemRdata => "mem_rdata",
        TopPortKind::MemWe => "mem_we",
        TopPortKind::MemReq => "mem_req",
        TopPortKind::MemAck => "mem_ack",
        TopPortKind::CoreActive => "core_active",
        TopPortKind::CoreTaskDone => "core_task_done",
        TopPortKind::CompletedTasks => "completed_tasks",
    }
}

/// Derive the generated module name from the project name: lowercase,
/// non-alphanumerics folded to `_`, `_top` suffix. A leading digit gets an
/// underscore prefix so the result stays a legal Verilog identifier.
pub fn module_name(project_name: &str) -> String {
    let mut name = String::with_capacity(project_name.len() + 4);
    for ch in project_name.chars() {
        if ch.is_ascii_alphanumeric() {
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push('_');
        }
    }
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name.push_str("_top");
    name
}
