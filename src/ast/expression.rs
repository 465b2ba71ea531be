// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Expression AST node definitions

use super::operator::{BinaryOperator, Precedence};
use super::visitor::{ShapeVisitor, Visitor};
use crate::parser::lexer::{is_identifier_continue, is_identifier_start};
use crate::parser::tokenizer::Token;
use smallvec::SmallVec;
use std::fmt;

/// AST representation of a compiled path expression
///
/// The set of variants is closed. Binary variants always own both operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpressionNode {
    /// The document root (`$`)
    Root,

    /// The current context node (`` `this` ``)
    This,

    /// The parent of the context node (`` `parent` ``)
    Parent,

    /// Named child fields, or every child field
    Fields(FieldSelector),

    /// Array element at an integer offset (`[3]`)
    Index(i64),

    /// Array sub-range (`[start:end:step]`)
    ///
    /// `None` means the bound was not written, which is not the same as zero.
    Slice {
        /// Inclusive start offset
        start: Option<i64>,
        /// Exclusive end offset
        end: Option<i64>,
        /// Step between selected elements
        step: Option<i64>,
    },

    /// Apply `right` to every result of `left` (`left.right`, `left[...]`)
    Child {
        /// Base expression
        left: Box<ExpressionNode>,
        /// Expression applied to each base result
        right: Box<ExpressionNode>,
    },

    /// Apply `right` to `left` and all of its descendants (`left..right`)
    Descendants {
        /// Base expression
        left: Box<ExpressionNode>,
        /// Expression searched for recursively
        right: Box<ExpressionNode>,
    },

    /// Keep results of `left` for which `right` matches (`left where right`)
    Where {
        /// Expression being filtered
        left: Box<ExpressionNode>,
        /// Filter condition
        right: Box<ExpressionNode>,
    },

    /// Union of both result sets (`left | right`)
    Union {
        /// Left collection
        left: Box<ExpressionNode>,
        /// Right collection
        right: Box<ExpressionNode>,
    },

    /// Intersection of both result sets (`left & right`)
    Intersect {
        /// Left collection
        left: Box<ExpressionNode>,
        /// Right collection
        right: Box<ExpressionNode>,
    },
}

/// Field selection held by [`ExpressionNode::Fields`]
///
/// Either one or more literal names or the wildcard, never both.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldSelector {
    /// Every field (`*`)
    Wildcard,
    /// Named fields in source order; duplicates are kept
    Names(SmallVec<[String; 2]>),
}

impl FieldSelector {
    /// Build a name list, returning `None` for an empty list
    pub fn names<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: SmallVec<[String; 2]> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            None
        } else {
            Some(FieldSelector::Names(names))
        }
    }

    /// Check for the wildcard selector
    pub fn is_wildcard(&self) -> bool {
        matches!(self, FieldSelector::Wildcard)
    }

    /// The selected names; empty for the wildcard
    pub fn as_names(&self) -> &[String] {
        match self {
            FieldSelector::Wildcard => &[],
            FieldSelector::Names(names) => names,
        }
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSelector::Wildcard => f.write_str("*"),
            FieldSelector::Names(names) => {
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_field_name(f, name)?;
                }
                Ok(())
            }
        }
    }
}

/// Discriminant of an [`ExpressionNode`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// [`ExpressionNode::Root`]
    Root,
    /// [`ExpressionNode::This`]
    This,
    /// [`ExpressionNode::Parent`]
    Parent,
    /// [`ExpressionNode::Fields`]
    Fields,
    /// [`ExpressionNode::Index`]
    Index,
    /// [`ExpressionNode::Slice`]
    Slice,
    /// [`ExpressionNode::Child`]
    Child,
    /// [`ExpressionNode::Descendants`]
    Descendants,
    /// [`ExpressionNode::Where`]
    Where,
    /// [`ExpressionNode::Union`]
    Union,
    /// [`ExpressionNode::Intersect`]
    Intersect,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Root => "Root",
            NodeKind::This => "This",
            NodeKind::Parent => "Parent",
            NodeKind::Fields => "Fields",
            NodeKind::Index => "Index",
            NodeKind::Slice => "Slice",
            NodeKind::Child => "Child",
            NodeKind::Descendants => "Descendants",
            NodeKind::Where => "Where",
            NodeKind::Union => "Union",
            NodeKind::Intersect => "Intersect",
        };
        f.write_str(name)
    }
}

impl ExpressionNode {
    /// Create a field selection for a single name
    pub fn field(name: impl Into<String>) -> Self {
        let mut names = SmallVec::new();
        names.push(name.into());
        Self::Fields(FieldSelector::Names(names))
    }

    /// Create a field selection for several names, in order
    ///
    /// # Panics
    ///
    /// Panics if `names` is empty. The grammar has no empty field list, so
    /// such a node could not be displayed and compiled back.
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: SmallVec<[String; 2]> = names.into_iter().map(Into::into).collect();
        assert!(!names.is_empty(), "field list must not be empty");
        Self::Fields(FieldSelector::Names(names))
    }

    /// Create the wildcard field selection (`*`)
    pub fn wildcard() -> Self {
        Self::Fields(FieldSelector::Wildcard)
    }

    /// Create an index expression
    pub fn index(index: i64) -> Self {
        Self::Index(index)
    }

    /// Create a slice expression
    pub fn slice(start: Option<i64>, end: Option<i64>, step: Option<i64>) -> Self {
        Self::Slice { start, end, step }
    }

    /// Create a slice covering the whole array (`[*]`)
    pub fn full_slice() -> Self {
        Self::slice(None, None, None)
    }

    /// Create a child expression
    pub fn child(left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::Child {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a descendants expression
    pub fn descendants(left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::Descendants {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a `where` filter expression
    pub fn filter(left: ExpressionNode, condition: ExpressionNode) -> Self {
        Self::Where {
            left: Box::new(left),
            right: Box::new(condition),
        }
    }

    /// Create a union expression
    pub fn union(left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::Union {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create an intersection expression
    pub fn intersect(left: ExpressionNode, right: ExpressionNode) -> Self {
        Self::Intersect {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Get the payload-free kind of this node
    pub fn kind(&self) -> NodeKind {
        match self {
            ExpressionNode::Root => NodeKind::Root,
            ExpressionNode::This => NodeKind::This,
            ExpressionNode::Parent => NodeKind::Parent,
            ExpressionNode::Fields(_) => NodeKind::Fields,
            ExpressionNode::Index(_) => NodeKind::Index,
            ExpressionNode::Slice { .. } => NodeKind::Slice,
            ExpressionNode::Child { .. } => NodeKind::Child,
            ExpressionNode::Descendants { .. } => NodeKind::Descendants,
            ExpressionNode::Where { .. } => NodeKind::Where,
            ExpressionNode::Union { .. } => NodeKind::Union,
            ExpressionNode::Intersect { .. } => NodeKind::Intersect,
        }
    }

    /// Split a binary node into its operator and operands
    pub fn as_binary(&self) -> Option<(BinaryOperator, &ExpressionNode, &ExpressionNode)> {
        match self {
            ExpressionNode::Child { left, right } => Some((BinaryOperator::Child, left, right)),
            ExpressionNode::Descendants { left, right } => {
                Some((BinaryOperator::Descendants, left, right))
            }
            ExpressionNode::Where { left, right } => Some((BinaryOperator::Where, left, right)),
            ExpressionNode::Union { left, right } => Some((BinaryOperator::Union, left, right)),
            ExpressionNode::Intersect { left, right } => {
                Some((BinaryOperator::Intersect, left, right))
            }
            _ => None,
        }
    }

    /// Check if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.as_binary().is_none()
    }

    /// Binding strength of the node when written as text
    pub fn precedence(&self) -> Precedence {
        match self.as_binary() {
            Some((op, _, _)) => op.precedence(),
            None => Precedence::Atom,
        }
    }

    /// Length of the longest root-to-leaf path (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        ShapeVisitor.visit_expression(self).depth
    }

    /// Total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        ShapeVisitor.visit_expression(self).nodes
    }

    fn is_bracketed(&self) -> bool {
        matches!(self, ExpressionNode::Index(_) | ExpressionNode::Slice { .. })
    }
}

impl fmt::Display for ExpressionNode {
    /// Render canonical path text that compiles back to an equal tree
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionNode::Root => f.write_str("$"),
            ExpressionNode::This => f.write_str("`this`"),
            ExpressionNode::Parent => f.write_str("`parent`"),
            ExpressionNode::Fields(selector) => write!(f, "{selector}"),
            ExpressionNode::Index(index) => write!(f, "[{index}]"),
            ExpressionNode::Slice { start, end, step } => {
                if start.is_none() && end.is_none() && step.is_none() {
                    return f.write_str("[*]");
                }
                f.write_str("[")?;
                write_bound(f, *start)?;
                f.write_str(":")?;
                write_bound(f, *end)?;
                if let Some(step) = step {
                    write!(f, ":{step}")?;
                }
                f.write_str("]")
            }
            _ => {
                let Some((op, left, right)) = self.as_binary() else {
                    return Ok(());
                };
                let precedence = op.precedence();
                write_operand(f, left, left.precedence() < precedence)?;
                match op {
                    BinaryOperator::Child if right.is_bracketed() => {}
                    BinaryOperator::Where => f.write_str(" where ")?,
                    _ => f.write_str(op.symbol())?,
                }
                write_operand(f, right, right.precedence() <= precedence)
            }
        }
    }
}

fn write_operand(
    f: &mut fmt::Formatter<'_>,
    operand: &ExpressionNode,
    parenthesize: bool,
) -> fmt::Result {
    if parenthesize {
        write!(f, "({operand})")
    } else {
        write!(f, "{operand}")
    }
}

fn write_bound(f: &mut fmt::Formatter<'_>, bound: Option<i64>) -> fmt::Result {
    match bound {
        Some(value) => write!(f, "{value}"),
        None => Ok(()),
    }
}

/// Write a field name bare when the tokenizer would read it back as the
/// same identifier, single-quoted otherwise
fn write_field_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let mut chars = name.chars();
    let plain = chars.next().is_some_and(is_identifier_start)
        && chars.all(is_identifier_continue)
        && Token::from_keyword(name).is_none();
    if plain {
        return f.write_str(name);
    }

    f.write_str("'")?;
    for ch in name.chars() {
        match ch {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            other => write!(f, "{other}")?,
        }
    }
    f.write_str("'")
}
