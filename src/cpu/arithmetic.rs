//! Unité arithmétique et logique du Duck Machine

use super::condition::CondFlag;
use super::instructions::OpCode;
use thiserror::Error;

/// Erreur de calcul détectée par l'ALU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AluFault {
    #[error("Division par zéro")]
    DivisionByZero,

    /// Seul cas non représentable sur 64 bits : `i64::MIN / -1`
    #[error("Débordement arithmétique")]
    Overflow,
}

/// ALU sans état : calcule un résultat et le drapeau associé
///
/// Les mots sont des entiers 64 bits : les opérandes issus de mots de
/// 32 bits ne débordent jamais. LOAD et STORE n'y effectuent que le calcul
/// d'adresse.
pub struct ArithmeticUnit;

impl ArithmeticUnit {
    /// Calcule le résultat brut de l'opération
    pub fn compute(op: OpCode, in1: i64, in2: i64) -> Result<i64, AluFault> {
        match op {
            OpCode::Add | OpCode::Load | OpCode::Store => Ok(in1.wrapping_add(in2)),
            OpCode::Sub => Ok(in1.wrapping_sub(in2)),
            OpCode::Mul => Ok(in1.wrapping_mul(in2)),
            OpCode::Div => floor_div(in1, in2),
            OpCode::Halt => Ok(0),
        }
    }

    /// Exécute l'opération; une erreur de calcul devient `(0, V)`
    pub fn exec(op: OpCode, in1: i64, in2: i64) -> (i64, CondFlag) {
        match Self::compute(op, in1, in2) {
            Ok(result) => (result, CondFlag::from_result(result)),
            Err(fault) => {
                log::warn!("{} {} {}: {}", op, in1, in2, fault);
                (0, CondFlag::V)
            }
        }
    }
}

/// Division entière arrondie vers moins l'infini
fn floor_div(dividend: i64, divisor: i64) -> Result<i64, AluFault> {
    if divisor == 0 {
        return Err(AluFault::DivisionByZero);
    }
    let quotient = dividend.checked_div(divisor).ok_or(AluFault::Overflow)?;
    if dividend % divisor != 0 && ((dividend < 0) != (divisor < 0)) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_op() {
        // Addition
        assert_eq!(ArithmeticUnit::exec(OpCode::Add, 5, 3), (8, CondFlag::P));
        assert_eq!(ArithmeticUnit::exec(OpCode::Add, -5, 3), (-2, CondFlag::M));
        assert_eq!(ArithmeticUnit::exec(OpCode::Add, -10, 10), (0, CondFlag::Z));
        // Soustraction
        assert_eq!(ArithmeticUnit::exec(OpCode::Sub, 5, 3), (2, CondFlag::P));
        assert_eq!(ArithmeticUnit::exec(OpCode::Sub, 3, 5), (-2, CondFlag::M));
        assert_eq!(ArithmeticUnit::exec(OpCode::Sub, 3, 3), (0, CondFlag::Z));
        // Multiplication
        assert_eq!(ArithmeticUnit::exec(OpCode::Mul, 3, 5), (15, CondFlag::P));
        assert_eq!(ArithmeticUnit::exec(OpCode::Mul, -3, 5), (-15, CondFlag::M));
        assert_eq!(ArithmeticUnit::exec(OpCode::Mul, 0, 22), (0, CondFlag::Z));
        // Division
        assert_eq!(ArithmeticUnit::exec(OpCode::Div, 5, 3), (1, CondFlag::P));
        assert_eq!(ArithmeticUnit::exec(OpCode::Div, 12, -3), (-4, CondFlag::M));
        assert_eq!(ArithmeticUnit::exec(OpCode::Div, 3, 4), (0, CondFlag::Z));
        assert_eq!(ArithmeticUnit::exec(OpCode::Div, 12, 0), (0, CondFlag::V));
        // Calcul d'adresse et HALT
        assert_eq!(ArithmeticUnit::exec(OpCode::Load, 12, 13), (25, CondFlag::P));
        assert_eq!(ArithmeticUnit::exec(OpCode::Store, 27, 13), (40, CondFlag::P));
        assert_eq!(ArithmeticUnit::exec(OpCode::Halt, 99, 98), (0, CondFlag::Z));
    }

    #[test]
    fn test_division_rounds_toward_negative_infinity() {
        assert_eq!(ArithmeticUnit::exec(OpCode::Div, -7, 2), (-4, CondFlag::M));
        assert_eq!(ArithmeticUnit::exec(OpCode::Div, 7, -2), (-4, CondFlag::M));
        assert_eq!(ArithmeticUnit::exec(OpCode::Div, -7, -2), (3, CondFlag::P));
        assert_eq!(ArithmeticUnit::exec(OpCode::Div, -1, 4), (-1, CondFlag::M));
    }

    #[test]
    fn test_add_extremes() {
        let max = i32::MAX as i64;
        let min = i32::MIN as i64;
        assert_eq!(ArithmeticUnit::exec(OpCode::Add, max, 1), (max + 1, CondFlag::P));
        assert_eq!(ArithmeticUnit::exec(OpCode::Add, min, -1), (min - 1, CondFlag::M));
        assert_eq!(ArithmeticUnit::exec(OpCode::Sub, min, 1), (min - 1, CondFlag::M));
        assert_eq!(ArithmeticUnit::exec(OpCode::Mul, 1 << 20, 1 << 12), (1 << 32, CondFlag::P));
        assert_eq!(ArithmeticUnit::exec(OpCode::Mul, max, max), (max * max, CondFlag::P));
        assert_eq!(ArithmeticUnit::exec(OpCode::Div, min, -1), (max + 1, CondFlag::P));
    }

    #[test]
    fn test_only_division_faults() {
        assert_eq!(
            ArithmeticUnit::compute(OpCode::Div, 10, 0),
            Err(AluFault::DivisionByZero)
        );
        assert_eq!(
            ArithmeticUnit::compute(OpCode::Div, i64::MIN, -1),
            Err(AluFault::Overflow)
        );
        assert_eq!(ArithmeticUnit::exec(OpCode::Div, i64::MIN, -1), (0, CondFlag::V));
        assert_eq!(ArithmeticUnit::exec(OpCode::Mul, 1234, 0), (0, CondFlag::Z));
    }
}
