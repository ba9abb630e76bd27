// signal.rs — Signal set derivation
//
// Derives every wire of the assembly from the topology model: ten per-core
// signals plus one three-wire triple per directed neighbor link, each with
// its bit width. Knows nothing about instantiation syntax; the output is
// typed descriptors for the assembler and composer.
//
// Preconditions: topology is validated.
// Postconditions: exactly num_cores * PER_CORE_SIGNAL_COUNT + links * 3
//                 descriptors, no duplicate names, link triples in
//                 neighbor-pair order per core.
// Failure modes: none (guarantees re-checked by verify_signal_set).
// Side effects: none.

use std::collections::HashSet;

use crate::ident::{self, CoreId, CoreSignalKind, LinkSignalKind};
use crate::topology::{NeighborLink, Topology, NEIGHBOR_ARITY};

/// Bit width of a declared wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalWidth {
    /// A single-bit wire, declared without a range.
    Scalar,
    /// A bus of `n` bits, declared `[n-1:0]`.
    Bits(u32),
}

impl SignalWidth {
    /// The declaration range, or None for a scalar wire.
    pub fn range(self) -> Option<String> {
        match self {
            SignalWidth::Scalar => None,
            SignalWidth::Bits(n) => Some(format!("[{}:0]", n - 1)),
        }
    }
}

/// One declared wire of the assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalDesc {
    pub name: String,
    pub width: SignalWidth,
}

/// Number of signals declared for every core.
pub const PER_CORE_SIGNAL_COUNT: usize = CoreSignalKind::ALL.len();

/// Task payload width in bits, fixed by the dispatcher's task format.
pub const TASK_DATA_WIDTH: u32 = 128;

/// Register-index width in bits on the neighbor interface.
pub const REG_ADDR_WIDTH: u32 = 5;

/// Width of a per-core signal kind given the configured word width.
pub fn core_signal_width(kind: CoreSignalKind, word_width: u32) -> SignalWidth {
    match kind {
        CoreSignalKind::TaskData => SignalWidth::Bits(TASK_DATA_WIDTH),
        CoreSignalKind::MemAddr | CoreSignalKind::MemWdata | CoreSignalKind::MemRdata => {
            SignalWidth::Bits(word_width)
        }
        _ => SignalWidth::Scalar,
    }
}

/// Width of a link signal kind given the configured word width.
pub fn link_signal_width(kind: LinkSignalKind, word_width: u32) -> SignalWidth {
    match kind {
        LinkSignalKind::RegAddr => SignalWidth::Bits(REG_ADDR_WIDTH),
        LinkSignalKind::RegRdata => SignalWidth::Bits(word_width),
        LinkSignalKind::RegReq => SignalWidth::Scalar,
    }
}

/// The ten wires of one core, in declaration order.
#[derive(Debug, Clone)]
pub struct CoreSignalGroup {
    pub core: CoreId,
    pub signals: Vec<SignalDesc>,
}

/// The three wires of one directed neighbor link.
#[derive(Debug, Clone)]
pub struct LinkSignalGroup {
    pub link: NeighborLink,
    pub signals: Vec<SignalDesc>,
}

/// Every wire of the assembly, grouped for declaration.
#[derive(Debug, Clone)]
pub struct SignalSet {
    pub cores: Vec<CoreSignalGroup>,
    pub links: Vec<LinkSignalGroup>,
}

impl SignalSet {
    /// Total number of declared wires.
    pub fn total(&self) -> usize {
        self.cores.iter().map(|g| g.signals.len()).sum::<usize>()
            + self.links.iter().map(|g| g.signals.len()).sum::<usize>()
    }
}

/// Derive the full signal set for a validated topology.
pub fn build_signal_set(topology: &Topology, word_width: u32) -> SignalSet {
    let cores = topology
        .cores()
        .map(|core| CoreSignalGroup {
            core,
            signals: CoreSignalKind::ALL
                .iter()
                .map(|&kind| SignalDesc {
                    name: ident::core_signal(core, kind),
                    width: core_signal_width(kind, word_width),
                })
                .collect(),
        })
        .collect();

    let links = topology
        .links()
        .into_iter()
        .map(|link| LinkSignalGroup {
            signals: LinkSignalKind::ALL
                .iter()
                .map(|&kind| SignalDesc {
                    name: ident::link_signal(link.from, link.to, kind),
                    width: link_signal_width(kind, word_width),
                })
                .collect(),
            link,
        })
        .collect();

    SignalSet { cores, links }
}

// ── Verification ────────────────────────────────────────────────────────────

/// Result of re-checking the signal set guarantees as named obligations.
#[derive(Debug)]
pub struct SignalSetCert {
    obligations: Vec<(&'static str, bool)>,
}

impl SignalSetCert {
    pub fn obligations(&self) -> &[(&'static str, bool)] {
        &self.obligations
    }

    pub fn all_pass(&self) -> bool {
        self.obligations.iter().all(|(_, ok)| *ok)
    }

    /// Names of the failed obligations.
    pub fn failed(&self) -> Vec<&'static str> {
        self.obligations
            .iter()
            .filter(|(_, ok)| !*ok)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Re-check the builder's postconditions against the topology:
/// group counts, per-group sizes, link ordering, and name uniqueness.
pub fn verify_signal_set(set: &SignalSet, topology: &Topology) -> SignalSetCert {
    let n = topology.num_cores() as usize;

    let core_count = set.cores.len() == n;
    let per_core_count = set
        .cores
        .iter()
        .all(|g| g.signals.len() == PER_CORE_SIGNAL_COUNT);
    let link_count = set.links.len() == topology.total_links()
        && set.links.iter().all(|g| g.signals.len() == 3);

    // Link groups must mirror the topology exactly: cores ascending, the
    // first slot of each pair before the second.
    let link_order = set.links.len() == n * NEIGHBOR_ARITY
        && topology.cores().enumerate().all(|(i, core)| {
            let pair = topology.neighbor_pair(core);
            let first = &set.links[i * NEIGHBOR_ARITY].link;
            let second = &set.links[i * NEIGHBOR_ARITY + 1].link;
            first.from == core
                && first.to == pair.first()
                && second.from == core
                && second.to == pair.second()
        });

    let mut names = HashSet::new();
    let unique_names = set
        .cores
        .iter()
        .flat_map(|g| g.signals.iter())
        .chain(set.links.iter().flat_map(|g| g.signals.iter()))
        .all(|desc| names.insert(desc.name.as_str()));

    SignalSetCert {
        obligations: vec![
            ("core-count", core_count),
            ("per-core-count", per_core_count),
            ("link-count", link_count),
            ("link-order", link_order),
            ("unique-names", unique_names),
        ],
    }
}
