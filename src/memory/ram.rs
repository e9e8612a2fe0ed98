//! Implémentation de la mémoire RAM

use super::interface::MemoryInterface;
use crate::error::DuckError;
use anyhow::Result;
use std::ops::Range;

/// Mémoire vive de taille fixe, adressée par mots
#[derive(Debug, Clone)]
pub struct Ram {
    /// Données de la mémoire
    data: Vec<i64>,
}

impl Ram {
    /// Crée une nouvelle RAM de `size` mots à zéro
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    /// Crée une RAM initialisée avec des données
    pub fn from_data(data: Vec<i64>) -> Self {
        Self { data }
    }

    /// Nombre de mots adressables
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Efface le contenu de la RAM
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Vérifie qu'une adresse est valide et renvoie son index
    fn check_bounds(&self, address: i64) -> Result<usize> {
        match usize::try_from(address) {
            Ok(index) if index < self.data.len() => Ok(index),
            _ => Err(DuckError::SegmentationFault {
                address,
                size: self.data.len(),
            }
            .into()),
        }
    }

    /// Vérifie qu'un bloc de `len` mots tient en mémoire
    fn check_block(&self, address: i64, len: usize) -> Result<Range<usize>> {
        let start = self.check_bounds(address)?;
        match start.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(start..end),
            _ => {
                // Dernière adresse du bloc, bornée à l'espace représentable
                let last = i64::try_from(len - 1)
                    .ok()
                    .and_then(|offset| address.checked_add(offset))
                    .unwrap_or(i64::MAX);
                Err(DuckError::SegmentationFault {
                    address: last,
                    size: self.data.len(),
                }
                .into())
            }
        }
    }
}

impl MemoryInterface for Ram {
    fn get(&self, address: i64) -> Result<i64> {
        let index = self.check_bounds(address)?;
        Ok(self.data[index])
    }

    fn put(&mut self, address: i64, value: i64) -> Result<()> {
        let index = self.check_bounds(address)?;
        self.data[index] = value;
        Ok(())
    }

    fn dump_block(&self, address: i64, size: usize) -> Result<Vec<i64>> {
        let range = self.check_block(address, size)?;
        Ok(self.data[range].to_vec())
    }

    fn load_block(&mut self, address: i64, words: &[i64]) -> Result<()> {
        let range = self.check_block(address, words.len())?;
        self.data[range].copy_from_slice(words);
        Ok(())
    }
}
