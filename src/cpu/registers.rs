//! Registres du Duck Machine

use crate::{NUM_REGISTERS, PC_REGISTER};

/// Contrat d'un registre : lecture et écriture d'un mot
pub trait Register: std::fmt::Debug {
    fn get(&self) -> i64;
    fn put(&mut self, value: i64);
}

/// Registre général en lecture/écriture
#[derive(Debug, Clone, Default)]
pub struct GeneralRegister {
    value: i64,
}

impl GeneralRegister {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Register for GeneralRegister {
    fn get(&self) -> i64 {
        self.value
    }

    fn put(&mut self, value: i64) {
        self.value = value;
    }
}

/// Registre câblé à zéro : les écritures sont ignorées
#[derive(Debug, Clone, Default)]
pub struct ZeroRegister;

impl Register for ZeroRegister {
    fn get(&self) -> i64 {
        0
    }

    fn put(&mut self, _value: i64) {}
}

/// Banc de 16 registres; r0 vaut toujours zéro et r15 sert de PC
#[derive(Debug)]
pub struct RegisterFile {
    slots: Vec<Box<dyn Register>>,
}

impl RegisterFile {
    /// Crée un banc de registres à zéro
    pub fn new() -> Self {
        let slots = (0..NUM_REGISTERS)
            .map(|index| -> Box<dyn Register> {
                if index == 0 {
                    Box::new(ZeroRegister)
                } else {
                    Box::new(GeneralRegister::new())
                }
            })
            .collect();
        Self { slots }
    }

    /// Réinitialise tous les registres à zéro
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.put(0);
        }
    }

    /// Lit un registre par son index (0..=15)
    ///
    /// # Panics
    ///
    /// Si `index` dépasse 15; `Instruction::validate` écarte ce cas.
    pub fn get(&self, index: u8) -> i64 {
        self.slots[index as usize].get()
    }

    /// Écrit un registre par son index (0..=15)
    ///
    /// # Panics
    ///
    /// Si `index` dépasse 15.
    pub fn put(&mut self, index: u8, value: i64) {
        self.slots[index as usize].put(value);
    }

    /// Lit le compteur de programme
    pub fn pc(&self) -> i64 {
        self.slots[PC_REGISTER].get()
    }

    /// Écrit le compteur de programme
    pub fn set_pc(&mut self, value: i64) {
        self.slots[PC_REGISTER].put(value);
    }

    /// Copie des valeurs courantes
    pub fn snapshot(&self) -> [i64; NUM_REGISTERS] {
        let mut values = [0; NUM_REGISTERS];
        for (value, slot) in values.iter_mut().zip(&self.slots) {
            *value = slot.get();
        }
        values
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Index d'un registre à partir de son nom d'assembleur
///
/// Accepte `zero`, `pc` et `r0`..`r15`.
pub fn register_index(name: &str) -> Option<u8> {
    match name {
        "zero" => Some(0),
        "pc" => Some(PC_REGISTER as u8),
        _ => name
            .strip_prefix('r')
            .and_then(|digits| digits.parse::<u8>().ok())
            .filter(|&index| (index as usize) < NUM_REGISTERS),
    }
}
