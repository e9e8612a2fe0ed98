//! Instructions du Duck Machine

use super::condition::CondFlag;
use crate::error::DuckError;
use std::fmt;

/// Opérations supportées par le Duck Machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    // Opérations arithmétiques
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,

    // Accès mémoire (l'ALU calcule l'adresse)
    Load = 4,
    Store = 5,

    Halt = 6,
}

impl OpCode {
    /// Toutes les opérations, dans l'ordre de leur code
    pub const ALL: [OpCode; 7] = [
        OpCode::Add,
        OpCode::Sub,
        OpCode::Mul,
        OpCode::Div,
        OpCode::Load,
        OpCode::Store,
        OpCode::Halt,
    ];

    /// Code numérique stocké dans le champ opcode
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Retrouve une opération depuis son code
    pub fn from_code(code: u32) -> Option<OpCode> {
        Self::ALL.get(code as usize).copied()
    }

    /// Mnémonique en assembleur
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Add => "ADD",
            OpCode::Sub => "SUB",
            OpCode::Mul => "MUL",
            OpCode::Div => "DIV",
            OpCode::Load => "LOAD",
            OpCode::Store => "STORE",
            OpCode::Halt => "HALT",
        }
    }

    /// Vrai pour les opérations qui mettent à jour le code de condition
    pub fn is_arithmetic(self) -> bool {
        matches!(self, OpCode::Add | OpCode::Sub | OpCode::Mul | OpCode::Div)
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Plus petit déplacement encodable (champ signé de 11 bits)
pub const OFFSET_MIN: i32 = -1024;

/// Plus grand déplacement encodable
pub const OFFSET_MAX: i32 = 1023;

/// Plus grand index de registre
pub const REGISTER_MAX: u8 = 15;

/// Instruction décodée
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Opération à effectuer
    pub op: OpCode,

    /// Prédicat : l'instruction n'est exécutée que s'il recouvre la condition courante
    pub cond: CondFlag,

    /// Registre destination
    pub reg_target: u8,

    /// Premier registre source
    pub reg_src1: u8,

    /// Second registre source, ajouté au déplacement
    pub reg_src2: u8,

    /// Déplacement signé
    pub offset: i32,
}

impl Instruction {
    /// Construit une instruction en vérifiant la plage de chaque champ
    pub fn new(
        op: OpCode,
        cond: CondFlag,
        reg_target: u8,
        reg_src1: u8,
        reg_src2: u8,
        offset: i32,
    ) -> Result<Self, DuckError> {
        let instr = Self {
            op,
            cond,
            reg_target,
            reg_src1,
            reg_src2,
            offset,
        };
        instr.validate()?;
        Ok(instr)
    }

    /// Vérifie que chaque champ tient dans sa plage encodable
    ///
    /// Les champs étant publics, une instruction construite à la main peut
    /// porter un index de registre supérieur à 15.
    pub fn validate(&self) -> Result<(), DuckError> {
        check_register("reg_target", self.reg_target)?;
        check_register("reg_src1", self.reg_src1)?;
        check_register("reg_src2", self.reg_src2)?;
        if !(OFFSET_MIN..=OFFSET_MAX).contains(&self.offset) {
            return Err(DuckError::FieldOutOfRange {
                field: "offset",
                value: self.offset as i64,
                min: OFFSET_MIN as i64,
                max: OFFSET_MAX as i64,
            });
        }
        Ok(())
    }

    pub fn halt() -> Self {
        Self {
            op: OpCode::Halt,
            cond: CondFlag::ALWAYS,
            reg_target: 0,
            reg_src1: 0,
            reg_src2: 0,
            offset: 0,
        }
    }
}

fn check_register(field: &'static str, index: u8) -> Result<(), DuckError> {
    if index > REGISTER_MAX {
        return Err(DuckError::FieldOutOfRange {
            field,
            value: index as i64,
            min: 0,
            max: REGISTER_MAX as i64,
        });
    }
    Ok(())
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Le prédicat ALWAYS n'est pas affiché
        if self.cond == CondFlag::ALWAYS {
            write!(f, "{}", self.op)?;
        } else {
            write!(f, "{}/{}", self.op, self.cond)?;
        }
        write!(
            f,
            "   r{},r{},r{}[{}]",
            self.reg_src1, self.reg_src2, self.reg_target, self.offset
        )
    }
}
