//! Interface mémoire commune

use crate::error::DuckError;
use anyhow::Result;

/// Trait définissant l'interface de la mémoire vue par le CPU
///
/// La mémoire est adressée par mots (entiers 64 bits). Une adresse invalide est une
/// erreur de la mémoire; le CPU se contente de la propager.
pub trait MemoryInterface {
    /// Lit le mot à l'adresse spécifiée
    fn get(&self, address: i64) -> Result<i64>;

    /// Écrit un mot à l'adresse spécifiée
    fn put(&mut self, address: i64, value: i64) -> Result<()>;

    /// Lit un bloc de mots
    fn dump_block(&self, address: i64, size: usize) -> Result<Vec<i64>> {
        let mut words = Vec::with_capacity(size);
        for i in 0..size {
            words.push(self.get(block_address(address, i, size)?)?);
        }
        Ok(words)
    }

    /// Écrit un bloc de mots
    fn load_block(&mut self, address: i64, words: &[i64]) -> Result<()> {
        for (i, &word) in words.iter().enumerate() {
            self.put(block_address(address, i, words.len())?, word)?;
        }
        Ok(())
    }
}

/// Adresse du `index`-ième mot d'un bloc de `len` mots commençant à `address`
fn block_address(address: i64, index: usize, len: usize) -> Result<i64> {
    i64::try_from(index)
        .ok()
        .and_then(|offset| address.checked_add(offset))
        .ok_or_else(|| DuckError::AddressOverflow { address, len }.into())
}
