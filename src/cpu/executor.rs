//! Exécuteur d'instructions Duck Machine

use super::{arithmetic::ArithmeticUnit, condition::CondFlag, instructions::*, DuckCpu};
use crate::memory::MemoryInterface;
use anyhow::Result;
use log::trace;

/// Statistiques d'exécution pour profilage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Pas effectués (instructions lues et décodées)
    pub steps: u64,
    pub instructions_executed: u64,
    /// Instructions dont le prédicat n'a pas été satisfait
    pub instructions_skipped: u64,
    pub memory_reads: u64,
    pub memory_writes: u64,
    /// Erreurs de calcul absorbées par l'ALU
    pub alu_faults: u64,
}

impl ExecutionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl<M: MemoryInterface> DuckCpu<M> {
    /// Exécute une instruction décodée si son prédicat le permet
    ///
    /// Le PC est incrémenté avant l'écriture du résultat : une instruction
    /// qui cible r15 réalise donc un saut. Une instruction dont un champ
    /// sort de sa plage est refusée sans modifier l'état.
    pub fn execute_instruction(&mut self, instr: &Instruction) -> Result<()> {
        instr.validate()?;

        if !instr.cond.permits(self.condition) {
            trace!("{} ignorée (condition {})", instr, self.condition);
            self.stats.instructions_skipped += 1;
            self.advance_pc();
            return Ok(());
        }

        self.stats.instructions_executed += 1;
        let left = self.registers.get(instr.reg_src1);
        // Même arithmétique 64 bits que l'ALU, quel que soit l'ordre des opérandes
        let right = i64::from(instr.offset).wrapping_add(self.registers.get(instr.reg_src2));
        let (result, flag) = ArithmeticUnit::exec(instr.op, left, right);
        if flag == CondFlag::V {
            self.stats.alu_faults += 1;
        }
        self.advance_pc();

        match instr.op {
            OpCode::Store => {
                let value = self.registers.get(instr.reg_target);
                self.memory.put(result, value)?;
                self.stats.memory_writes += 1;
            }
            OpCode::Load => {
                let value = self.memory.get(result)?;
                self.stats.memory_reads += 1;
                self.registers.put(instr.reg_target, value);
            }
            OpCode::Halt => {
                self.halted = true;
            }
            OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div => {
                self.registers.put(instr.reg_target, result);
                self.condition = flag;
            }
        }

        Ok(())
    }

    fn advance_pc(&mut self) {
        let pc = self.registers.pc();
        self.registers.set_pc(pc.wrapping_add(1));
    }
}
