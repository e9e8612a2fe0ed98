//! Observation et cadencement de l'exécution
//!
//! Les observateurs reçoivent une copie de l'état avant chaque exécution :
//! ils ne peuvent pas modifier le processeur.

use super::condition::CondFlag;
use super::instructions::Instruction;
use crate::NUM_REGISTERS;
use anyhow::Result;
use log::debug;
use std::io::{self, BufRead, Write};

/// Début d'un pas : instruction décodée, pas encore exécutée
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuStep {
    /// Adresse de l'instruction (valeur du PC)
    pub pc_addr: i64,

    /// Mot lu en mémoire
    pub instr_word: i64,

    /// Instruction décodée
    pub instr: Instruction,

    /// Code de condition avant exécution
    pub condition: CondFlag,

    /// Registres avant exécution
    pub registers: [i64; NUM_REGISTERS],
}

/// Reçoit un événement par pas d'exécution
pub trait CpuObserver {
    fn on_step(&mut self, event: &CpuStep);
}

impl<F> CpuObserver for F
where
    F: FnMut(&CpuStep),
{
    fn on_step(&mut self, event: &CpuStep) {
        self(event)
    }
}

/// Journalise chaque pas au niveau `debug`
#[derive(Debug, Default)]
pub struct TraceObserver;

impl TraceObserver {
    /// Ligne de trace d'un pas; le mot est affiché sur ses 32 bits décodés
    pub fn format_step(event: &CpuStep) -> String {
        format!(
            "{:>5}: {:#010x}  {:<28} cond={}",
            event.pc_addr, event.instr_word as u32, event.instr.to_string(), event.condition
        )
    }
}

impl CpuObserver for TraceObserver {
    fn on_step(&mut self, event: &CpuStep) {
        debug!("{}", Self::format_step(event));
    }
}

/// Point d'attente entre deux pas en mode pas à pas
pub trait StepGate {
    /// Appelé avant le pas numéro `step`
    fn wait(&mut self, step: u64) -> Result<()>;
}

/// Attend que l'utilisateur appuie sur entrée
#[derive(Debug, Default)]
pub struct StdinGate;

impl StepGate for StdinGate {
    fn wait(&mut self, step: u64) -> Result<()> {
        prompt(&mut io::stdin().lock(), &mut io::stdout(), step)
    }
}

/// Affiche l'invite du pas `step` puis consomme une ligne de `input`
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, step: u64) -> Result<()> {
    write!(output, "Step {}; press enter", step)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
