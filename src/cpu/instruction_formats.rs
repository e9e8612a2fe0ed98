//! Format binaire des instructions du Duck Machine
//!
//! Toutes les instructions occupent un mot de 32 bits :
//!
//! ```text
//! +--------+------+------+------+------+------------+
//! |   op   | cond |target| src1 | src2 |   offset   |
//! | 31..27 |26..23|22..19|18..15|14..11|   10..0    |
//! +--------+------+------+------+------+------------+
//! ```
//!
//! Le déplacement est stocké en complément à deux sur 11 bits.

use super::condition::CondFlag;
use super::instructions::{Instruction, OpCode};
use crate::error::DuckError;

/// Champ de bits `[from_bit, from_bit + width)` d'un mot d'instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub from_bit: u32,
    pub width: u32,
}

impl BitField {
    pub const fn new(from_bit: u32, width: u32) -> Self {
        Self { from_bit, width }
    }

    fn mask(self) -> u32 {
        ((1u64 << self.width) - 1) as u32
    }

    /// Extrait la valeur non signée du champ
    pub fn extract(self, word: u32) -> u32 {
        (word >> self.from_bit) & self.mask()
    }

    /// Extrait le champ en étendant son bit de signe
    pub fn extract_signed(self, word: u32) -> i32 {
        let shift = 32 - self.width;
        ((self.extract(word) << shift) as i32) >> shift
    }

    /// Place `value` dans le champ; les bits excédentaires sont tronqués
    pub fn insert(self, word: u32, value: u32) -> u32 {
        let cleared = word & !(self.mask() << self.from_bit);
        cleared | ((value & self.mask()) << self.from_bit)
    }

    /// Place une valeur signée (complément à deux) dans le champ
    pub fn insert_signed(self, word: u32, value: i32) -> u32 {
        self.insert(word, value as u32)
    }
}

pub const OPCODE_FIELD: BitField = BitField::new(27, 5);
pub const COND_FIELD: BitField = BitField::new(23, 4);
pub const TARGET_FIELD: BitField = BitField::new(19, 4);
pub const SRC1_FIELD: BitField = BitField::new(15, 4);
pub const SRC2_FIELD: BitField = BitField::new(11, 4);
pub const OFFSET_FIELD: BitField = BitField::new(0, 11);

impl Instruction {
    /// Encode l'instruction en mot machine
    pub fn encode(&self) -> u32 {
        encode(self)
    }
}

/// Encode une instruction en mot de 32 bits
pub fn encode(instr: &Instruction) -> u32 {
    let mut word = 0;
    word = OPCODE_FIELD.insert(word, instr.op.code());
    word = COND_FIELD.insert(word, instr.cond.bits());
    word = TARGET_FIELD.insert(word, instr.reg_target as u32);
    word = SRC1_FIELD.insert(word, instr.reg_src1 as u32);
    word = SRC2_FIELD.insert(word, instr.reg_src2 as u32);
    OFFSET_FIELD.insert_signed(word, instr.offset)
}

/// Décode un mot machine en instruction structurée
///
/// Un champ opcode inconnu produit `DuckError::UnknownOpcode`.
pub fn decode(word: u32) -> Result<Instruction, DuckError> {
    let opcode = OPCODE_FIELD.extract(word);
    let op = OpCode::from_code(opcode).ok_or(DuckError::UnknownOpcode { opcode, word })?;

    Ok(Instruction {
        op,
        cond: CondFlag::from_bits_truncate(COND_FIELD.extract(word)),
        reg_target: TARGET_FIELD.extract(word) as u8,
        reg_src1: SRC1_FIELD.extract(word) as u8,
        reg_src2: SRC2_FIELD.extract(word) as u8,
        offset: OFFSET_FIELD.extract_signed(word),
    })
}
