//! Duck Machine - Simulateur du processeur DM2022
//!
//! Cette bibliothèque fournit les composants du simulateur : codec
//! d'instructions, ALU, banc de registres, moteur d'exécution, mémoire,
//! chargeur de code objet et configuration.

pub mod cpu;
pub mod memory;
pub mod program;
pub mod config;
pub mod error;

pub use cpu::*;
pub use memory::*;
pub use program::*;
pub use config::*;
pub use error::*;

/// Version du simulateur
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Nombre de registres généraux (r0 = zéro, r15 = PC)
pub const NUM_REGISTERS: usize = 16;

/// Index du registre compteur de programme
pub const PC_REGISTER: usize = 15;

/// Taille par défaut de la mémoire, en mots de 32 bits
pub const DEFAULT_MEMORY_SIZE: usize = 1024;
