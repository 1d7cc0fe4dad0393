/// Binding strength of an operator. Higher binds tighter.
///
/// The levels are sparse on purpose: the in-between levels (`SubAdd`,
/// `AddMul`, `MulExp`, `ExpApp`) are left free so new operators can sit
/// between the default ones, and the discriminant 8 is unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    SubAdd = 0,
    Addition = 1,
    AddMul = 2,
    Multiplication = 3,
    MulExp = 4,
    Exponentiation = 5,
    ExpApp = 6,
    Application = 7,
    Grouping = 9,
}

impl Precedence {
    pub fn level(self) -> u8 {
        self as u8
    }
}
