use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, clap::ValueEnum)]
enum EmitStage {
    Verilog,
    Summary,
}

#[derive(Parser, Debug)]
#[command(
    name = "corebind",
    version,
    about = "Corebind — generates structural Verilog top-levels for multi-core arrays"
)]
struct Cli {
    /// Input configuration JSON file
    config: PathBuf,

    /// Output file path
    #[arg(short, long, default_value = "top.v")]
    output: PathBuf,

    /// Output stage
    #[arg(long, value_enum, default_value_t = EmitStage::Verilog)]
    emit: EmitStage,

    /// Print generator phases
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        eprintln!("corebind: config = {}", cli.config.display());
        eprintln!("corebind: output = {}", cli.output.display());
        eprintln!("corebind: emit   = {:?}", cli.emit);
    }

    // ── Read and validate configuration ──
    let source = match std::fs::read_to_string(&cli.config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("corebind: error: {}: {}", cli.config.display(), e);
            std::process::exit(2);
        }
    };

    let loaded = match corebind::config::parse(&source) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("corebind: error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.verbose {
        eprintln!(
            "corebind: {} cores, {} topology, XLEN={}",
            loaded.global.num_cores, loaded.global.topology_kind, loaded.global.word_width
        );
    }

    // ── Build topology model ──
    let topology = match corebind::topology::Topology::build(
        loaded.global.topology_kind.clone(),
        loaded.global.num_cores,
        &loaded.connections,
    ) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("corebind: error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.verbose {
        eprintln!("corebind: topology validated, {} links", topology.total_links());
    }

    // ── Generate ──
    let generated =
        match corebind::pipeline::generate(&loaded.global, &loaded.cores, &topology) {
            Ok(g) => g,
            Err(e) => {
                eprintln!("corebind: internal error: {}", e);
                std::process::exit(1);
            }
        };
    let provenance = corebind::pipeline::compute_provenance(&source);

    match cli.emit {
        EmitStage::Summary => {
            print!("{}", generated.summary.to_json(&provenance));
        }
        EmitStage::Verilog => {
            if let Some(parent) = cli.output.parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(e) = std::fs::create_dir_all(parent) {
                        eprintln!("corebind: error: {}: {}", parent.display(), e);
                        std::process::exit(2);
                    }
                }
            }
            if let Err(e) = std::fs::write(&cli.output, &generated.verilog) {
                eprintln!("corebind: error: {}: {}", cli.output.display(), e);
                std::process::exit(2);
            }
            eprintln!(
                "corebind: generated {} ({} cores, {} topology, XLEN={})",
                cli.output.display(),
                generated.summary.num_cores,
                generated.summary.topology,
                generated.summary.word_width
            );
        }
    }
}
