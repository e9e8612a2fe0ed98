//! Codes de condition du Duck Machine

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Masque de condition : résultat de la dernière opération arithmétique,
    /// ou prédicat d'une instruction.
    ///
    /// `NEVER` (aucun bit) et `ALWAYS` (les quatre bits) sont des valeurs
    /// canoniques uniques; les bits primitifs se combinent par union.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CondFlag: u32 {
        /// Résultat négatif
        const M = 1 << 0;

        /// Résultat nul
        const Z = 1 << 1;

        /// Résultat positif
        const P = 1 << 2;

        /// Débordement ou erreur de calcul
        const V = 1 << 3;

        /// Exécution inconditionnelle
        const ALWAYS = Self::M.bits() | Self::Z.bits() | Self::P.bits() | Self::V.bits();
    }
}

impl CondFlag {
    /// Aucun bit : l'instruction n'est jamais exécutée
    pub const NEVER: CondFlag = CondFlag::empty();

    /// Ordre d'affichage des bits primitifs
    const RENDER_ORDER: [(CondFlag, char); 4] = [
        (CondFlag::Z, 'Z'),
        (CondFlag::M, 'M'),
        (CondFlag::P, 'P'),
        (CondFlag::V, 'V'),
    ];

    /// Drapeau correspondant au signe d'un résultat
    pub fn from_result(value: i64) -> Self {
        match value {
            0 => CondFlag::Z,
            v if v < 0 => CondFlag::M,
            _ => CondFlag::P,
        }
    }

    /// Vrai si le prédicat `self` autorise l'exécution sous l'état `state`
    pub fn permits(self, state: CondFlag) -> bool {
        self.intersects(state)
    }
}

impl Default for CondFlag {
    fn default() -> Self {
        CondFlag::ALWAYS
    }
}

impl fmt::Display for CondFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == CondFlag::ALWAYS {
            return f.write_str("ALWAYS");
        }
        if self.is_empty() {
            return f.write_str("NEVER");
        }
        for (flag, letter) in Self::RENDER_ORDER {
            if self.contains(flag) {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}
