// pipeline.rs — Generation orchestration, summary sidecar, and provenance
//
// Runs the stages in order (signal derivation, verification, binding,
// composition) over one validated configuration and returns the generated
// text together with the summary the caller logs. Pure: all file I/O
// belongs to the driver.
//
// Preconditions: config and topology validated; cores contiguous.
// Postconditions: byte-identical output for identical inputs.
// Failure modes: GenerateError on an internal invariant violation; never
//                on user input, which was rejected earlier.
// Side effects: none.

use std::fmt;

use crate::bind::{self, ContractMismatch};
use crate::compose::Composer;
use crate::config::{CoreSpec, GlobalConfig};
use crate::contract;
use crate::ident;
use crate::signal::{build_signal_set, verify_signal_set};
use crate::topology::Topology;

/// Logical name of the generated file, recorded in the summary.
pub const OUTPUT_FILE_NAME: &str = "top.v";

// ── Provenance ──────────────────────────────────────────────────────────────

/// Provenance metadata for hermetic generation and cache-key use.
///
/// `config_hash`: SHA-256 of the raw configuration JSON text.
/// `generator_version`: crate version from `Cargo.toml`.
#[derive(Debug, Clone)]
pub struct Provenance {
    pub config_hash: [u8; 32],
    pub generator_version: &'static str,
}

impl Provenance {
    /// Hex string of the config hash (64 characters).
    pub fn config_hash_hex(&self) -> String {
        let mut s = String::with_capacity(64);
        for b in &self.config_hash {
            use std::fmt::Write;
            let _ = write!(s, "{:02x}", b);
        }
        s
    }
}

/// Compute provenance from the raw configuration text.
pub fn compute_provenance(config_source: &str) -> Provenance {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(config_source.as_bytes());
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);

    Provenance {
        config_hash: hash,
        generator_version: env!("CARGO_PKG_VERSION"),
    }
}

// ── Summary sidecar ─────────────────────────────────────────────────────────

/// The sidecar record describing one generation run, enough for a log line.
#[derive(Debug, Clone)]
pub struct Summary {
    pub file_name: &'static str,
    pub num_cores: u32,
    pub topology: String,
    pub word_width: u32,
}

impl Summary {
    /// Serialize the summary plus provenance as a JSON string for
    /// `--emit summary`.
    pub fn to_json(&self, prov: &Provenance) -> String {
        format!(
            "{{\n  \"file_name\": \"{}\",\n  \"num_cores\": {},\n  \"topology\": \"{}\",\n  \"word_width\": {},\n  \"config_hash\": \"{}\",\n  \"generator_version\": \"{}\"\n}}\n",
            self.file_name,
            self.num_cores,
            self.topology,
            self.word_width,
            prov.config_hash_hex(),
            prov.generator_version,
        )
    }
}

/// The result of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedTop {
    pub verilog: String,
    pub summary: Summary,
}

// ── Errors ──────────────────────────────────────────────────────────────────

/// An internal invariant failed between stages. A defect in the generator,
/// not a configuration problem.
#[derive(Debug)]
pub enum GenerateError {
    Contract(ContractMismatch),
    SignalSet { failed: Vec<&'static str> },
    CoreListShape { topology_cores: u32, core_specs: usize },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Contract(inner) => fmt::Display::fmt(inner, f),
            GenerateError::SignalSet { failed } => {
                write!(f, "signal set verification failed: {}", failed.join(", "))
            }
            GenerateError::CoreListShape {
                topology_cores,
                core_specs,
            } => {
                write!(
                    f,
                    "core list does not match topology: {} core specs for a {}-core topology",
                    core_specs, topology_cores
                )
            }
        }
    }
}

impl std::error::Error for GenerateError {}

impl From<ContractMismatch> for GenerateError {
    fn from(e: ContractMismatch) -> Self {
        GenerateError::Contract(e)
    }
}

// ── Pipeline runner ─────────────────────────────────────────────────────────

/// Run the full generation pipeline.
///
/// Order of the produced document: framing, includes, parameters, external
/// ports, per-core signal declarations, per-link signal declarations, core
/// wrapper instantiations ascending, dispatcher, arbiter, aggregate status.
pub fn generate(
    global: &GlobalConfig,
    cores: &[CoreSpec],
    topology: &Topology,
) -> Result<GeneratedTop, GenerateError> {
    if cores.len() != topology.num_cores() as usize || global.num_cores != topology.num_cores() {
        return Err(GenerateError::CoreListShape {
            topology_cores: topology.num_cores(),
            core_specs: cores.len(),
        });
    }

    let signals = build_signal_set(topology, global.word_width);
    let cert = verify_signal_set(&signals, topology);
    if !cert.all_pass() {
        return Err(GenerateError::SignalSet {
            failed: cert.failed(),
        });
    }

    let mut composer = Composer::new();
    composer.emit_header(global);
    composer.emit_includes();
    composer.emit_module_open(
        &ident::module_name(&global.project_name),
        &contract::top_level_parameters(
            global.num_cores,
            global.word_width,
            global.data_mem_size,
            global.task_cache_depth,
        ),
        &contract::top_level_ports(global.num_cores, global.word_width),
    );

    for group in &signals.cores {
        composer.emit_core_signals(group);
    }
    for group in &signals.links {
        composer.emit_link_signals(group);
    }

    for core in cores {
        let inst = bind::core_wrapper_instance(core, topology.neighbor_pair(core.id))?;
        composer.emit_instantiation(&inst);
    }
    composer.emit_instantiation(&bind::dispatcher_instance(global.num_cores)?);
    composer.emit_instantiation(&bind::arbiter_instance(global.num_cores)?);

    composer.emit_aggregates(global.num_cores);
    composer.emit_module_close();

    Ok(GeneratedTop {
        verilog: composer.finish(),
        summary: Summary {
            file_name: OUTPUT_FILE_NAME,
            num_cores: global.num_cores,
            topology: global.topology_kind.clone(),
            word_width: global.word_width,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    fn ring4() -> config::LoadedConfig {
        config::parse(include_str!("../../configs/default.json")).unwrap()
    }

    fn generate_ring4() -> GeneratedTop {
        let loaded = ring4();
        let topo = Topology::build(
            loaded.global.topology_kind.clone(),
            loaded.global.num_cores,
            &loaded.connections,
        )
        .unwrap();
        generate(&loaded.global, &loaded.cores, &topo).unwrap()
    }

    #[test]
    fn summary_reflects_config() {
        let top = generate_ring4();
        assert_eq!(top.summary.file_name, "top.v");
        assert_eq!(top.summary.num_cores, 4);
        assert_eq!(top.summary.topology, "ring");
        assert_eq!(top.summary.word_width, 32);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_ring4();
        let b = generate_ring4();
        assert_eq!(a.verilog, b.verilog);
    }

    #[test]
    fn mismatched_core_list_is_reported_not_panicked() {
        let loaded = ring4();
        let wrong = Topology::build("ring", 3, &crate::topology::ring_connections(3)).unwrap();
        let err = generate(&loaded.global, &loaded.cores, &wrong).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::CoreListShape {
                topology_cores: 3,
                core_specs: 4
            }
        ));
    }

    #[test]
    fn provenance_distinguishes_configs() {
        let a = compute_provenance("{\"a\": 1}");
        let b = compute_provenance("{\"a\": 2}");
        let c = compute_provenance("{\"a\": 1}");
        assert_ne!(a.config_hash, b.config_hash);
        assert_eq!(a.config_hash, c.config_hash);
        assert_eq!(a.config_hash_hex().len(), 64);
    }

    #[test]
    fn summary_json_shape() {
        let top = generate_ring4();
        let prov = compute_provenance("{}");
        let json = top.summary.to_json(&prov);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["num_cores"], 4);
        assert_eq!(parsed["file_name"], "top.v");
        assert_eq!(parsed["config_hash"], prov.config_hash_hex());
    }
}
