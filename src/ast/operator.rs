//! Binary path operators and their binding strength

use super::expression::ExpressionNode;
use std::fmt;

/// Operator precedence levels (higher = tighter binding)
///
/// Every binary operator is left associative. Bracketed child access
/// (`a[0]`) shares the [`Precedence::Child`] level with the `.` operator.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Recursive descent (`..`), the loosest operator
    Descendants = 1,
    /// Union (`|`)
    Union = 2,
    /// Intersection (`&`)
    Intersect = 3,
    /// Filtering (`where`)
    Where = 4,
    /// Child access (`.` and postfix `[...]`)
    Child = 5,
    /// Primary expressions; no operator binds this tightly
    Atom = 6,
}

impl Precedence {
    /// Minimum precedence used when parsing a complete expression
    #[inline(always)]
    pub const fn lowest() -> Self {
        Precedence::Descendants
    }

    /// Convert precedence to raw u8 for fast comparison
    #[inline(always)]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Get the next higher precedence level for left-associative operators
    #[inline(always)]
    pub const fn next_level(self) -> Self {
        match self {
            Precedence::Descendants => Precedence::Union,
            Precedence::Union => Precedence::Intersect,
            Precedence::Intersect => Precedence::Where,
            Precedence::Where => Precedence::Child,
            Precedence::Child => Precedence::Atom,
            Precedence::Atom => Precedence::Atom,
        }
    }
}

/// The five binary path operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOperator {
    /// `left.right`
    Child,
    /// `left..right`
    Descendants,
    /// `left where right`
    Where,
    /// `left | right`
    Union,
    /// `left & right`
    Intersect,
}

impl BinaryOperator {
    /// Binding strength of this operator
    #[inline]
    pub const fn precedence(self) -> Precedence {
        match self {
            BinaryOperator::Child => Precedence::Child,
            BinaryOperator::Descendants => Precedence::Descendants,
            BinaryOperator::Where => Precedence::Where,
            BinaryOperator::Union => Precedence::Union,
            BinaryOperator::Intersect => Precedence::Intersect,
        }
    }

    /// Source text of the operator
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Child => ".",
            BinaryOperator::Descendants => "..",
            BinaryOperator::Where => "where",
            BinaryOperator::Union => "|",
            BinaryOperator::Intersect => "&",
        }
    }

    /// Build the node this operator produces for the given operands
    pub fn build(self, left: ExpressionNode, right: ExpressionNode) -> ExpressionNode {
        match self {
            BinaryOperator::Child => ExpressionNode::child(left, right),
            BinaryOperator::Descendants => ExpressionNode::descendants(left, right),
            BinaryOperator::Where => ExpressionNode::filter(left, right),
            BinaryOperator::Union => ExpressionNode::union(left, right),
            BinaryOperator::Intersect => ExpressionNode::intersect(left, right),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
