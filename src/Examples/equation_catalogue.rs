// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
use crate::numerical::roots_api::Equation;

/// Kind of problem shown in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquationKind {
    Scalar,
    System,
}

/// Immutable table of ready-made equations offered by the menu
#[derive(Debug, Clone, PartialEq)]
pub struct EquationCatalogue {
    scalar: Vec<Equation>,
    systems: Vec<Equation>,
}

impl EquationCatalogue {
    pub fn new(scalar: &[&str], systems: &[(&str, &str)]) -> Self {
        Self {
            scalar: scalar.iter().map(|e| Equation::single(e)).collect(),
            systems: systems
                .iter()
                .map(|(first, second)| Equation::pair(first, second))
                .collect(),
        }
    }

    pub fn equations(&self, kind: EquationKind) -> &[Equation] {
        match kind {
            EquationKind::Scalar => &self.scalar,
            EquationKind::System => &self.systems,
        }
    }

    /// 1-based, as numbered in the menu
    pub fn get(&self, kind: EquationKind, number: usize) -> Option<&Equation> {
        number
            .checked_sub(1)
            .and_then(|i| self.equations(kind).get(i))
    }
}

impl Default for EquationCatalogue {
    fn default() -> Self {
        Self::new(
            &["x^2 - 5 = 0", "sin(x) - x/2 = 0", "e^x + x = 0"],
            &[
                ("x^2 + y^2 -1 = 0", "x^3 - y = 0"),
                ("sin(x) + cos(y) = 0", "ln(x) + y^2 - 1 = 0"),
            ],
        )
    }
}
