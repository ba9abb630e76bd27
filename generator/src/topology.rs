// topology.rs — Typed neighbor-connectivity model
//
// Builds the core-id -> neighbor-pair mapping from the raw connections list
// and validates it completely before any generation stage runs.
//
// Preconditions: none (validation is this module's job).
// Postconditions: a returned Topology has exactly one arity-2 entry per core
//                 id in [0, num_cores), with every referenced id in range.
// Failure modes: TopologyError on any malformed connections list.
// Side effects: none.

use std::fmt;

use crate::ident::CoreId;

/// Number of neighbor ports on every core wrapper. This is a fixed
/// system-wide constant of the wrapper's port contract: a connections entry
/// listing any other number of neighbors is rejected, including an empty
/// list for a single-core array.
pub const NEIGHBOR_ARITY: usize = 2;

/// One raw connections entry: a core and its ordered neighbor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub core: u32,
    pub neighbors: Vec<u32>,
}

/// The two neighbors of one core, in declared order. Order is significant:
/// the first neighbor binds the wrapper's first neighbor port, the second
/// the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborPair {
    first: CoreId,
    second: CoreId,
}

impl NeighborPair {
    pub fn new(first: CoreId, second: CoreId) -> Self {
        Self { first, second }
    }

    pub fn first(self) -> CoreId {
        self.first
    }

    pub fn second(self) -> CoreId {
        self.second
    }

    /// Both neighbors, in declared order.
    pub fn as_array(self) -> [CoreId; NEIGHBOR_ARITY] {
        [self.first, self.second]
    }
}

/// A directed neighbor link between two cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborLink {
    pub from: CoreId,
    pub to: CoreId,
}

// ── Errors ──────────────────────────────────────────────────────────────────

/// A malformed connections list. Generation must not proceed on any of
/// these; each variant carries the offending identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    OutOfRange { core: u32, num_cores: u32 },
    DuplicateCore { core: u32 },
    MissingCore { core: u32 },
    WrongArity { core: u32, expected: usize, actual: usize },
    DuplicateNeighbor { core: u32, neighbor: u32 },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::OutOfRange { core, num_cores } => {
                write!(
                    f,
                    "core id {} is out of range for a {}-core array",
                    core, num_cores
                )
            }
            TopologyError::DuplicateCore { core } => {
                write!(f, "core {} appears more than once in the connections list", core)
            }
            TopologyError::MissingCore { core } => {
                write!(f, "core {} has no entry in the connections list", core)
            }
            TopologyError::WrongArity {
                core,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "core {} lists {} neighbors, expected exactly {}",
                    core, actual, expected
                )
            }
            TopologyError::DuplicateNeighbor { core, neighbor } => {
                write!(
                    f,
                    "core {} lists neighbor {} twice; the two neighbor slots must target distinct cores",
                    core, neighbor
                )
            }
        }
    }
}

impl std::error::Error for TopologyError {}

// ── Topology ────────────────────────────────────────────────────────────────

/// The validated connectivity of the whole array: a named shape plus one
/// neighbor pair per core, indexed by core id.
#[derive(Debug, Clone)]
pub struct Topology {
    kind: String,
    pairs: Vec<NeighborPair>,
}

impl Topology {
    /// Validate a connections list against `num_cores` and construct the
    /// model. Checks, in order per entry: key in range, key not duplicated,
    /// neighbor arity, neighbor targets in range; then a completeness scan
    /// for gaps.
    pub fn build(
        kind: impl Into<String>,
        num_cores: u32,
        connections: &[Connection],
    ) -> Result<Self, TopologyError> {
        let mut pairs: Vec<Option<NeighborPair>> = vec![None; num_cores as usize];

        for conn in connections {
            if conn.core >= num_cores {
                return Err(TopologyError::OutOfRange {
                    core: conn.core,
                    num_cores,
                });
            }
            if pairs[conn.core as usize].is_some() {
                return Err(TopologyError::DuplicateCore { core: conn.core });
            }
            if conn.neighbors.len() != NEIGHBOR_ARITY {
                return Err(TopologyError::WrongArity {
                    core: conn.core,
                    expected: NEIGHBOR_ARITY,
                    actual: conn.neighbors.len(),
                });
            }
            for &nbr in &conn.neighbors {
                if nbr >= num_cores {
                    return Err(TopologyError::OutOfRange {
                        core: nbr,
                        num_cores,
                    });
                }
            }
            // Repeated targets would collapse two link triples onto the
            // same wire names; the link signal set must stay duplicate-free.
            if conn.neighbors[0] == conn.neighbors[1] {
                return Err(TopologyError::DuplicateNeighbor {
                    core: conn.core,
                    neighbor: conn.neighbors[0],
                });
            }
            pairs[conn.core as usize] = Some(NeighborPair::new(
                CoreId(conn.neighbors[0]),
                CoreId(conn.neighbors[1]),
            ));
        }

        let mut resolved = Vec::with_capacity(pairs.len());
        for (id, pair) in pairs.into_iter().enumerate() {
            match pair {
                Some(p) => resolved.push(p),
                None => return Err(TopologyError::MissingCore { core: id as u32 }),
            }
        }

        Ok(Topology {
            kind: kind.into(),
            pairs: resolved,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn num_cores(&self) -> u32 {
        self.pairs.len() as u32
    }

    /// All core ids, ascending.
    pub fn cores(&self) -> impl Iterator<Item = CoreId> + '_ {
        (0..self.num_cores()).map(CoreId)
    }

    /// The neighbor pair of `core`. Panics only on an id outside the model,
    /// which validated callers cannot produce.
    pub fn neighbor_pair(&self, core: CoreId) -> NeighborPair {
        self.pairs[core.0 as usize]
    }

    /// Every directed link, cores ascending, pair order within a core.
    pub fn links(&self) -> Vec<NeighborLink> {
        let mut links = Vec::with_capacity(self.total_links());
        for core in self.cores() {
            for to in self.neighbor_pair(core).as_array() {
                links.push(NeighborLink { from: core, to });
            }
        }
        links
    }

    pub fn total_links(&self) -> usize {
        self.pairs.len() * NEIGHBOR_ARITY
    }
}

/// Build the connections list of a ring: each core's neighbors are
/// `[(id + n - 1) % n, (id + 1) % n]`. Rings need at least three cores;
/// below that the two slots would target the same core and be rejected.
pub fn ring_connections(num_cores: u32) -> Vec<Connection> {
    (0..num_cores)
        .map(|id| Connection {
            core: id,
            neighbors: vec![(id + num_cores - 1) % num_cores, (id + 1) % num_cores],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_of_four() {
        let topo = Topology::build("ring", 4, &ring_connections(4)).unwrap();
        assert_eq!(topo.num_cores(), 4);
        assert_eq!(topo.total_links(), 8);
        let pair = topo.neighbor_pair(CoreId(0));
        assert_eq!(pair.first(), CoreId(3));
        assert_eq!(pair.second(), CoreId(1));
        let links = topo.links();
        assert_eq!(links.len(), 8);
        assert_eq!(links[0], NeighborLink { from: CoreId(0), to: CoreId(3) });
        assert_eq!(links[1], NeighborLink { from: CoreId(0), to: CoreId(1) });
    }

    #[test]
    fn missing_core_rejected() {
        let mut conns = ring_connections(4);
        conns.remove(3);
        let err = Topology::build("ring", 4, &conns).unwrap_err();
        assert_eq!(err, TopologyError::MissingCore { core: 3 });
    }

    #[test]
    fn wrong_arity_rejected() {
        let mut conns = ring_connections(4);
        conns[1].neighbors.push(3);
        let err = Topology::build("ring", 4, &conns).unwrap_err();
        assert_eq!(
            err,
            TopologyError::WrongArity {
                core: 1,
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn single_core_without_links_rejected() {
        // Arity is fixed system-wide; a lone core with no neighbor slots is
        // rejected on arity, not silently padded.
        let conns = vec![Connection {
            core: 0,
            neighbors: vec![],
        }];
        let err = Topology::build("ring", 1, &conns).unwrap_err();
        assert_eq!(
            err,
            TopologyError::WrongArity {
                core: 0,
                expected: 2,
                actual: 0
            }
        );
    }

    #[test]
    fn repeated_neighbor_target_rejected() {
        // A degenerate two-core ring points both slots at the same core,
        // which would collapse the two link triples onto one set of names.
        let conns = vec![
            Connection { core: 0, neighbors: vec![1, 1] },
            Connection { core: 1, neighbors: vec![0, 0] },
        ];
        let err = Topology::build("ring", 2, &conns).unwrap_err();
        assert_eq!(err, TopologyError::DuplicateNeighbor { core: 0, neighbor: 1 });
    }

    #[test]
    fn out_of_range_neighbor_rejected() {
        let conns = vec![
            Connection { core: 0, neighbors: vec![1, 2] },
            Connection { core: 1, neighbors: vec![0, 0] },
        ];
        let err = Topology::build("custom", 2, &conns).unwrap_err();
        assert_eq!(err, TopologyError::OutOfRange { core: 2, num_cores: 2 });
    }

    #[test]
    fn out_of_range_key_rejected() {
        let conns = vec![Connection { core: 5, neighbors: vec![0, 1] }];
        let err = Topology::build("custom", 2, &conns).unwrap_err();
        assert_eq!(err, TopologyError::OutOfRange { core: 5, num_cores: 2 });
    }

    #[test]
    fn duplicate_core_rejected() {
        let mut conns = ring_connections(3);
        conns.push(Connection { core: 0, neighbors: vec![1, 2] });
        let err = Topology::build("ring", 3, &conns).unwrap_err();
        assert_eq!(err, TopologyError::DuplicateCore { core: 0 });
    }

    #[test]
    fn error_display_names_offender() {
        let e = TopologyError::WrongArity { core: 2, expected: 2, actual: 3 };
        assert_eq!(format!("{}", e), "core 2 lists 3 neighbors, expected exactly 2");
        let e = TopologyError::MissingCore { core: 3 };
        assert_eq!(format!("{}", e), "core 3 has no entry in the connections list");
    }
}
