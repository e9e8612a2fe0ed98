//! Chargement du code objet Duck Machine
//!
//! Le code objet est un fichier texte contenant un mot signé de 32 bits
//! par ligne, en décimal. Les lignes vides et le texte après `#` sont ignorés.

use crate::cpu::Instruction;
use crate::error::DuckError;
use crate::memory::MemoryInterface;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

/// Programme prêt à être chargé en mémoire
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectCode {
    /// Mots du programme, dans l'ordre des adresses
    pub words: Vec<i64>,
}

impl ObjectCode {
    /// Analyse le texte d'un fichier de code objet
    pub fn parse(text: &str) -> Result<Self, DuckError> {
        let mut words = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            let word = content.parse::<i64>().map_err(|_| DuckError::ObjectCode {
                line: index + 1,
                text: raw.to_string(),
            })?;
            words.push(word);
        }
        Ok(Self { words })
    }

    /// Charge un fichier de code objet
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Lecture du code objet {}", path.display()))?;
        let code = Self::parse(&text)?;
        info!("{} mots lus depuis {}", code.words.len(), path.display());
        Ok(code)
    }

    /// Assemble une suite d'instructions décodées
    pub fn from_instructions(instructions: &[Instruction]) -> Self {
        Self {
            words: instructions.iter().map(|i| i.encode() as i64).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Copie le programme en mémoire à partir de `base`
    pub fn load_into<M: MemoryInterface + ?Sized>(&self, memory: &mut M, base: i64) -> Result<()> {
        memory
            .load_block(base, &self.words)
            .with_context(|| format!("Chargement de {} mots à l'adresse {}", self.words.len(), base))
    }
}
