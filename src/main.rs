use anyhow::Result;
use clap::Parser;
use duck_machine::*;
use log::info;
use std::path::PathBuf;

/// Exécute un programme Duck Machine
#[derive(Parser, Debug)]
#[command(name = "duck-machine", version, about = "Duck Machine (DM2022) simulator")]
struct Args {
    /// Fichier de code objet (un mot décimal par ligne)
    program: PathBuf,

    /// Fichier de configuration TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Adresse de départ (remplace la configuration)
    #[arg(long)]
    start: Option<i64>,

    /// Attend entrée avant chaque pas
    #[arg(long)]
    step: bool,

    /// Journalise chaque instruction exécutée
    #[arg(long)]
    trace: bool,

    /// Nombre maximal de pas
    #[arg(long)]
    step_limit: Option<u64>,

    /// Affiche les registres et la condition après HALT
    #[arg(long)]
    dump_registers: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulatorConfig::load_from_file(path)?,
        None => SimulatorConfig::default(),
    };
    if let Some(start) = args.start {
        config.execution.start_address = start;
    }
    if args.step_limit.is_some() {
        config.execution.step_limit = args.step_limit;
    }
    config.execution.single_step |= args.step;
    config.trace.enabled |= args.trace;

    // Initialiser le logging; RUST_LOG reste prioritaire
    let mut level = config.log_level();
    if config.trace.enabled {
        level = level.max(log::LevelFilter::Debug);
    }
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
    info!("Duck Machine v{}", VERSION);

    let program = ObjectCode::from_file(&args.program)?;
    let mut memory = Ram::new(config.memory.size);
    program.load_into(&mut memory, 0)?;

    let mut cpu = DuckCpu::new(memory);
    cpu.set_step_limit(config.execution.step_limit);
    if config.trace.enabled {
        cpu.add_observer(Box::new(TraceObserver));
    }
    if config.execution.single_step {
        cpu.set_step_gate(Box::new(StdinGate));
    }

    let summary = cpu.run(config.execution.start_address, config.execution.single_step)?;

    println!("Halted after {} steps", summary.steps);
    if args.dump_registers {
        for (index, value) in cpu.registers.snapshot().iter().enumerate() {
            println!("  r{:<2} = {}", index, value);
        }
        println!("  cond = {}", cpu.condition);
    }

    let stats = &cpu.stats;
    info!(
        "{} exécutées, {} ignorées, {} lectures, {} écritures, {} erreurs ALU",
        stats.instructions_executed,
        stats.instructions_skipped,
        stats.memory_reads,
        stats.memory_writes,
        stats.alu_faults
    );

    Ok(())
}
