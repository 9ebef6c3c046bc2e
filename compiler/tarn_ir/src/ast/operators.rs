//! Binary, unary, boolean and comparison operators.
//!
//! All operator types are `Copy` and carry their source symbol for
//! diagnostics and trace output.

/// Binary arithmetic and bitwise operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,

    // Bitwise
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::LShift => "<<",
            Self::RShift => ">>",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitAnd => "&",
        }
    }

    /// Returns the precedence level of this operator.
    ///
    /// Higher number = binds more tightly.
    /// - 1: `|`
    /// - 2: `^`
    /// - 3: `&`
    /// - 4: `<<` `>>`
    /// - 5: `+` `-`
    /// - 6: `*` `/` `//` `%`
    /// - 8: `**` (unary minus sits at 7)
    pub const fn precedence(self) -> u8 {
        match self {
            Self::BitOr => 1,
            Self::BitXor => 2,
            Self::BitAnd => 3,
            Self::LShift | Self::RShift => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::FloorDiv | Self::Mod => 6,
            Self::Pow => 8,
        }
    }

    /// Whether `a op b op c` groups as `a op (b op c)`.
    pub const fn is_right_assoc(self) -> bool {
        matches!(self, Self::Pow)
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Logical negation: `not x`
    Not,
    /// Bitwise inversion: `~x`
    Invert,
    /// Unary plus: `+x`
    UAdd,
    /// Arithmetic negation: `-x`
    USub,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Not => "not ",
            Self::Invert => "~",
            Self::UAdd => "+",
            Self::USub => "-",
        }
    }
}

/// Short-circuit boolean operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// Comparison operators. Comparisons chain: `a < b < c`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CmpOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtE => "<=",
            Self::Gt => ">",
            Self::GtE => ">=",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }
}
