//! Erreurs du simulateur

use thiserror::Error;

/// Erreurs typées remontées par le décodeur, la mémoire et le moteur
///
/// Les couches CPU/mémoire renvoient `anyhow::Result`; ces variantes peuvent
/// être récupérées avec `downcast_ref::<DuckError>()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuckError {
    /// Le champ opcode ne correspond à aucune opération connue
    #[error("Opcode inconnu {opcode} dans le mot {word:#010x}")]
    UnknownOpcode { opcode: u32, word: u32 },

    /// Champ d'instruction hors de sa plage encodable
    #[error("Champ {field} hors limites: {value} (attendu {min}..={max})")]
    FieldOutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Accès mémoire à une adresse invalide
    #[error("Accès mémoire hors limites: adresse {address} (taille {size})")]
    SegmentationFault { address: i64, size: usize },

    /// Un bloc dépasse la plus grande adresse représentable
    #[error("Bloc de {len} mots hors de l'espace d'adressage depuis {address}")]
    AddressOverflow { address: i64, len: usize },

    /// Le programme n'a pas exécuté HALT dans la limite imposée
    #[error("Limite de {0} pas atteinte sans HALT")]
    StepLimitExceeded(u64),

    /// Ligne de code objet illisible
    #[error("Code objet invalide ligne {line}: {text:?}")]
    ObjectCode { line: usize, text: String },
}
