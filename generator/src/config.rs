// config.rs — Input-contract loading and validation
//
// Deserializes the array description JSON and performs the semantic checks
// the type system cannot: positive sizes, one core type per core, and a
// named topology. The raw serde structs mirror the input contract exactly;
// the validated types are what the generation stages consume.
//
// Preconditions: none.
// Postconditions: a returned LoadedConfig has num_cores > 0, all sizes > 0,
//                 and exactly num_cores CoreSpec entries with contiguous ids.
// Failure modes: ConfigError on malformed JSON or failed semantic checks.
// Side effects: none (file I/O belongs to the driver).

use std::fmt;

use serde::Deserialize;

use crate::ident::CoreId;
use crate::topology::Connection;

// ── Raw input contract ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    pub project: ProjectSection,
    pub cores: CoresSection,
    pub topology: TopologySection,
    pub memory: MemorySection,
    pub scheduler: SchedulerSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoresSection {
    pub num_cores: u32,
    pub xlen: u32,
    pub core_types: Vec<CoreTypeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoreTypeEntry {
    pub isa: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopologySection {
    #[serde(rename = "type")]
    pub kind: String,
    pub connections: Vec<ConnectionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionEntry {
    pub core: u32,
    pub neighbors: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemorySection {
    pub data_mem_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSection {
    pub task_cache_depth: u32,
}

// ── Validated configuration ─────────────────────────────────────────────────

/// Global generation parameters, immutable for the duration of one run.
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    pub project_name: String,
    pub project_version: String,
    pub num_cores: u32,
    pub word_width: u32,
    pub data_mem_size: u32,
    pub task_cache_depth: u32,
    pub topology_kind: String,
}

/// One core of the array. Ids are contiguous; `id` is the only key other
/// stages use to refer to this core.
#[derive(Debug, Clone)]
pub struct CoreSpec {
    pub id: CoreId,
    pub isa: String,
}

/// Everything the generation pipeline needs, fully validated.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub global: GlobalConfig,
    pub cores: Vec<CoreSpec>,
    pub connections: Vec<Connection>,
}

// ── Errors ──────────────────────────────────────────────────────────────────

/// A missing, malformed, or semantically invalid configuration. Fatal;
/// generation does not start.
#[derive(Debug)]
pub enum ConfigError {
    Parse { message: String },
    Invalid { field: &'static str, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse { message } => write!(f, "config parse error: {}", message),
            ConfigError::Invalid { field, message } => {
                write!(f, "invalid config: {}: {}", field, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ── Loading ─────────────────────────────────────────────────────────────────

/// Parse and validate a configuration from JSON text.
pub fn parse(source: &str) -> Result<LoadedConfig, ConfigError> {
    let raw: RawConfig = serde_json::from_str(source).map_err(|e| ConfigError::Parse {
        message: e.to_string(),
    })?;
    validate(raw)
}

fn validate(raw: RawConfig) -> Result<LoadedConfig, ConfigError> {
    if raw.project.name.is_empty() {
        return Err(invalid("project.name", "must not be empty"));
    }
    if raw.cores.num_cores == 0 {
        return Err(invalid("cores.num_cores", "must be greater than zero"));
    }
    if raw.cores.xlen == 0 {
        return Err(invalid("cores.xlen", "must be greater than zero"));
    }
    if raw.memory.data_mem_size == 0 {
        return Err(invalid("memory.data_mem_size", "must be greater than zero"));
    }
    if raw.scheduler.task_cache_depth == 0 {
        return Err(invalid("scheduler.task_cache_depth", "must be greater than zero"));
    }
    if raw.topology.kind.is_empty() {
        return Err(invalid("topology.type", "must not be empty"));
    }
    if raw.cores.core_types.len() != raw.cores.num_cores as usize {
        return Err(ConfigError::Invalid {
            field: "cores.core_types",
            message: format!(
                "expected {} entries (one per core), found {}",
                raw.cores.num_cores,
                raw.cores.core_types.len()
            ),
        });
    }
    for (id, entry) in raw.cores.core_types.iter().enumerate() {
        if entry.isa.is_empty() {
            return Err(ConfigError::Invalid {
                field: "cores.core_types",
                message: format!("core {} has an empty isa string", id),
            });
        }
    }

    let cores = raw
        .cores
        .core_types
        .iter()
        .enumerate()
        .map(|(id, entry)| CoreSpec {
            id: CoreId(id as u32),
            isa: entry.isa.clone(),
        })
        .collect();

    let connections = raw
        .topology
        .connections
        .iter()
        .map(|c| Connection {
            core: c.core,
            neighbors: c.neighbors.clone(),
        })
        .collect();

    Ok(LoadedConfig {
        global: GlobalConfig {
            project_name: raw.project.name,
            project_version: raw.project.version,
            num_cores: raw.cores.num_cores,
            word_width: raw.cores.xlen,
            data_mem_size: raw.memory.data_mem_size,
            task_cache_depth: raw.scheduler.task_cache_depth,
            topology_kind: raw.topology.kind,
        },
        cores,
        connections,
    })
}

fn invalid(field: &'static str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.to_string(),
    }
}
