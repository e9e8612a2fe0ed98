//! Émulation du processeur Duck Machine (DM2022)
//!
//! Le CPU possède 16 registres (r0 toujours nul, r15 compteur de programme),
//! un code de condition et un état d'arrêt. La mémoire n'en fait pas partie :
//! le CPU n'en possède que la connexion.

pub mod condition;
pub mod registers;
pub mod instructions;
pub mod instruction_formats;
pub mod arithmetic;
pub mod executor;
pub mod observer;

use crate::error::DuckError;
use crate::memory::MemoryInterface;
use crate::NUM_REGISTERS;
use anyhow::{Context, Result};
use log::info;

pub use condition::*;
pub use registers::*;
pub use instructions::*;
pub use instruction_formats::*;
pub use arithmetic::*;
pub use executor::*;
pub use observer::*;

/// Structure principale du processeur Duck Machine
pub struct DuckCpu<M: MemoryInterface> {
    /// Registres du processeur
    pub registers: RegisterFile,

    /// Code de condition de la dernière opération arithmétique
    pub condition: CondFlag,

    /// État d'arrêt du processeur
    pub halted: bool,

    /// Statistiques d'exécution
    pub stats: ExecutionStats,

    /// Connexion à la mémoire
    memory: M,

    /// Observateurs notifiés avant chaque exécution, dans l'ordre d'ajout
    observers: Vec<Box<dyn CpuObserver>>,

    /// Attente entre deux pas en mode pas à pas
    step_gate: Option<Box<dyn StepGate>>,

    /// Nombre maximal de pas par `run`
    step_limit: Option<u64>,
}

/// Bilan d'un appel à `run`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Nombre de pas exécutés, HALT compris
    pub steps: u64,
}

impl<M: MemoryInterface> DuckCpu<M> {
    /// Crée un processeur connecté à `memory`
    pub fn new(memory: M) -> Self {
        Self {
            registers: RegisterFile::new(),
            condition: CondFlag::ALWAYS,
            halted: false,
            stats: ExecutionStats::new(),
            memory,
            observers: Vec::new(),
            step_gate: None,
            step_limit: None,
        }
    }

    /// Réinitialise le processeur à son état initial
    pub fn reset(&mut self) {
        self.registers.reset();
        self.condition = CondFlag::ALWAYS;
        self.halted = false;
        self.stats.reset();
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Rend la mémoire en consommant le processeur
    pub fn into_memory(self) -> M {
        self.memory
    }

    /// Ajoute un observateur des pas d'exécution
    pub fn add_observer(&mut self, observer: Box<dyn CpuObserver>) {
        self.observers.push(observer);
    }

    /// Installe l'attente utilisée par `run` en mode pas à pas
    pub fn set_step_gate(&mut self, gate: Box<dyn StepGate>) {
        self.step_gate = Some(gate);
    }

    /// Limite le nombre de pas d'un `run`; `None` supprime la limite
    pub fn set_step_limit(&mut self, limit: Option<u64>) {
        self.step_limit = limit;
    }

    /// Un cycle fetch/decode/execute
    pub fn step(&mut self) -> Result<()> {
        let pc_addr = self.registers.pc();
        let instr_word = self
            .memory
            .get(pc_addr)
            .with_context(|| format!("Lecture de l'instruction à l'adresse {}", pc_addr))?;
        let instr = decode(instr_word as u32)
            .with_context(|| format!("Décodage de l'instruction à l'adresse {}", pc_addr))?;

        // Les observateurs voient l'état avant exécution
        let event = CpuStep {
            pc_addr,
            instr_word,
            instr,
            condition: self.condition,
            registers: self.registers.snapshot(),
        };
        for observer in self.observers.iter_mut() {
            observer.on_step(&event);
        }

        self.stats.steps += 1;
        self.execute_instruction(&instr)
    }

    /// Exécute pas à pas jusqu'à une instruction HALT
    pub fn run(&mut self, from_addr: i64, single_step: bool) -> Result<RunSummary> {
        self.halted = false;
        self.condition = CondFlag::ALWAYS;
        self.registers.set_pc(from_addr);
        info!("Démarrage à l'adresse {}", from_addr);

        let mut steps = 0;
        while !self.halted {
            if let Some(limit) = self.step_limit {
                if steps >= limit {
                    return Err(DuckError::StepLimitExceeded(limit).into());
                }
            }
            if single_step {
                if let Some(gate) = self.step_gate.as_mut() {
                    gate.wait(steps)?;
                }
            }
            self.step()?;
            steps += 1;
        }

        info!("HALT après {} pas, PC = {}", steps, self.registers.pc());
        Ok(RunSummary { steps })
    }

    /// Obtient l'état actuel du processeur pour le débogage
    pub fn get_debug_state(&self) -> CpuDebugState {
        CpuDebugState {
            registers: self.registers.snapshot(),
            condition: self.condition,
            halted: self.halted,
            stats: self.stats.clone(),
        }
    }
}

/// État de débogage du processeur
#[derive(Debug, Clone)]
pub struct CpuDebugState {
    pub registers: [i64; NUM_REGISTERS],
    pub condition: CondFlag,
    pub halted: bool,
    pub stats: ExecutionStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Ram;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn word(instr: Instruction) -> i64 {
        instr.encode() as i64
    }

    fn cpu_with(program: &[Instruction]) -> DuckCpu<Ram> {
        let mut ram = Ram::new(64);
        let words: Vec<i64> = program.iter().map(|&i| word(i)).collect();
        ram.load_block(0, &words).unwrap();
        DuckCpu::new(ram)
    }

    #[test]
    fn test_cpu_initialization() {
        let cpu = DuckCpu::new(Ram::new(4));
        assert_eq!(cpu.condition, CondFlag::ALWAYS);
        assert!(!cpu.halted);
        assert_eq!(cpu.registers.snapshot(), [0; NUM_REGISTERS]);
    }

    #[test]
    fn test_add_then_halt() {
        let add = Instruction::new(OpCode::Add, CondFlag::ALWAYS, 1, 0, 0, 5).unwrap();
        let mut cpu = cpu_with(&[add, Instruction::halt()]);

        let summary = cpu.run(0, false).unwrap();

        assert_eq!(summary.steps, 2);
        assert_eq!(cpu.registers.get(1), 5);
        assert!(cpu.halted);
        assert_eq!(cpu.registers.pc(), 2);
        assert_eq!(cpu.condition, CondFlag::P);
    }

    #[test]
    fn test_never_predicate_only_advances_pc() {
        let never = Instruction::new(OpCode::Add, CondFlag::NEVER, 1, 0, 0, 9).unwrap();
        let mut cpu = cpu_with(&[never]);
        cpu.registers.put(1, 3);
        cpu.condition = CondFlag::ALWAYS;

        cpu.step().unwrap();

        assert_eq!(cpu.registers.get(1), 3);
        assert_eq!(cpu.registers.pc(), 1);
        assert_eq!(cpu.condition, CondFlag::ALWAYS);
        assert_eq!(cpu.stats.instructions_skipped, 1);
    }

    #[test]
    fn test_observers_see_pre_execution_state_in_order() {
        let add = Instruction::new(OpCode::Add, CondFlag::ALWAYS, 2, 0, 0, 7).unwrap();
        let mut cpu = cpu_with(&[add, Instruction::halt()]);

        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            cpu.add_observer(Box::new(move |event: &CpuStep| {
                seen.borrow_mut().push((tag, event.pc_addr, event.registers[2]));
            }));
        }

        cpu.run(0, false).unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![("first", 0, 0), ("second", 0, 0), ("first", 1, 7), ("second", 1, 7)]
        );
    }

    #[test]
    fn test_step_limit() {
        // ADD r15 <- r0 + 0 : boucle infinie sur l'adresse 0
        let jump = Instruction::new(OpCode::Add, CondFlag::ALWAYS, 15, 0, 0, 0).unwrap();
        let mut cpu = cpu_with(&[jump]);
        cpu.set_step_limit(Some(10));

        let err = cpu.run(0, false).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DuckError>(),
            Some(&DuckError::StepLimitExceeded(10))
        );
        assert_eq!(cpu.stats.steps, 10);
    }

    #[test]
    fn test_single_step_waits_on_gate() {
        struct CountingGate(Rc<RefCell<Vec<u64>>>);

        impl StepGate for CountingGate {
            fn wait(&mut self, step: u64) -> Result<()> {
                self.0.borrow_mut().push(step);
                Ok(())
            }
        }

        let add = Instruction::new(OpCode::Add, CondFlag::ALWAYS, 1, 0, 0, 1).unwrap();
        let mut cpu = cpu_with(&[add, Instruction::halt()]);
        let waits = Rc::new(RefCell::new(Vec::new()));
        cpu.set_step_gate(Box::new(CountingGate(Rc::clone(&waits))));

        cpu.run(0, false).unwrap();
        assert!(waits.borrow().is_empty());

        cpu.run(0, true).unwrap();
        assert_eq!(*waits.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_decode_fault_stops_run() {
        let mut ram = Ram::new(4);
        ram.put(0, OPCODE_FIELD.insert(0, 9) as i64).unwrap();
        let mut cpu = DuckCpu::new(ram);

        let err = cpu.run(0, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DuckError>(),
            Some(DuckError::UnknownOpcode { opcode: 9, .. })
        ));
        assert!(!cpu.halted);
    }

    #[test]
    fn test_fetch_outside_memory_fails() {
        let mut cpu = DuckCpu::new(Ram::new(2));
        let err = cpu.run(5, false).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DuckError>(),
            Some(DuckError::SegmentationFault { address: 5, .. })
        ));
    }

    #[test]
    fn test_reset() {
        let add = Instruction::new(OpCode::Add, CondFlag::ALWAYS, 4, 0, 0, -3).unwrap();
        let mut cpu = cpu_with(&[add, Instruction::halt()]);
        cpu.run(0, false).unwrap();
        assert_eq!(cpu.condition, CondFlag::M);

        cpu.reset();

        let state = cpu.get_debug_state();
        assert_eq!(state.registers, [0; NUM_REGISTERS]);
        assert_eq!(state.condition, CondFlag::ALWAYS);
        assert!(!state.halted);
        assert_eq!(state.stats.steps, 0);
    }
}
