//! Mémoire du Duck Machine
//!
//! Le CPU ne connaît la mémoire qu'à travers `MemoryInterface`; `Ram` en est
//! l'implémentation par défaut.

pub mod interface;
pub mod ram;

pub use interface::*;
pub use ram::*;
