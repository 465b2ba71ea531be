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

//! Visitor pattern for AST traversal

use super::expression::{ExpressionNode, FieldSelector};
use super::operator::BinaryOperator;

/// Trait for visiting AST nodes
///
/// Binary variants fall back to [`Visitor::visit_binary`] unless overridden.
pub trait Visitor: Sized {
    /// The result type of visiting a node
    type Result;

    /// Visit an expression node
    fn visit_expression(&mut self, expr: &ExpressionNode) -> Self::Result {
        walk_expression(self, expr)
    }

    /// Visit the document root
    fn visit_root(&mut self) -> Self::Result;

    /// Visit the current context node
    fn visit_this(&mut self) -> Self::Result;

    /// Visit the parent of the context node
    fn visit_parent(&mut self) -> Self::Result;

    /// Visit a field selection
    fn visit_fields(&mut self, selector: &FieldSelector) -> Self::Result;

    /// Visit an array index
    fn visit_index(&mut self, index: i64) -> Self::Result;

    /// Visit an array slice
    fn visit_slice(
        &mut self,
        start: Option<i64>,
        end: Option<i64>,
        step: Option<i64>,
    ) -> Self::Result;

    /// Visit any binary node
    fn visit_binary(
        &mut self,
        op: BinaryOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) -> Self::Result;

    /// Visit a child expression
    fn visit_child(&mut self, left: &ExpressionNode, right: &ExpressionNode) -> Self::Result {
        self.visit_binary(BinaryOperator::Child, left, right)
    }

    /// Visit a descendants expression
    fn visit_descendants(
        &mut self,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) -> Self::Result {
        self.visit_binary(BinaryOperator::Descendants, left, right)
    }

    /// Visit a filter expression
    fn visit_where(&mut self, left: &ExpressionNode, condition: &ExpressionNode) -> Self::Result {
        self.visit_binary(BinaryOperator::Where, left, condition)
    }

    /// Visit a union expression
    fn visit_union(&mut self, left: &ExpressionNode, right: &ExpressionNode) -> Self::Result {
        self.visit_binary(BinaryOperator::Union, left, right)
    }

    /// Visit an intersection expression
    fn visit_intersect(&mut self, left: &ExpressionNode, right: &ExpressionNode) -> Self::Result {
        self.visit_binary(BinaryOperator::Intersect, left, right)
    }
}

/// Default implementation of walking an expression tree
pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &ExpressionNode) -> V::Result {
    match expr {
        ExpressionNode::Root => visitor.visit_root(),
        ExpressionNode::This => visitor.visit_this(),
        ExpressionNode::Parent => visitor.visit_parent(),
        ExpressionNode::Fields(selector) => visitor.visit_fields(selector),
        ExpressionNode::Index(index) => visitor.visit_index(*index),
        ExpressionNode::Slice { start, end, step } => visitor.visit_slice(*start, *end, *step),
        ExpressionNode::Child { left, right } => visitor.visit_child(left, right),
        ExpressionNode::Descendants { left, right } => visitor.visit_descendants(left, right),
        ExpressionNode::Where { left, right } => visitor.visit_where(left, right),
        ExpressionNode::Union { left, right } => visitor.visit_union(left, right),
        ExpressionNode::Intersect { left, right } => visitor.visit_intersect(left, right),
    }
}

/// Depth and size of a subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Shape {
    pub depth: usize,
    pub nodes: usize,
}

impl Shape {
    const LEAF: Shape = Shape { depth: 1, nodes: 1 };
}

/// Computes [`Shape`] for `ExpressionNode::depth` and `ExpressionNode::node_count`
pub(crate) struct ShapeVisitor;

impl Visitor for ShapeVisitor {
    type Result = Shape;

    fn visit_root(&mut self) -> Shape {
        Shape::LEAF
    }

    fn visit_this(&mut self) -> Shape {
        Shape::LEAF
    }

    fn visit_parent(&mut self) -> Shape {
        Shape::LEAF
    }

    fn visit_fields(&mut self, _selector: &FieldSelector) -> Shape {
        Shape::LEAF
    }

    fn visit_index(&mut self, _index: i64) -> Shape {
        Shape::LEAF
    }

    fn visit_slice(&mut self, _start: Option<i64>, _end: Option<i64>, _step: Option<i64>) -> Shape {
        Shape::LEAF
    }

    fn visit_binary(
        &mut self,
        _op: BinaryOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) -> Shape {
        let left = self.visit_expression(left);
        let right = self.visit_expression(right);
        Shape {
            depth: 1 + left.depth.max(right.depth),
            nodes: 1 + left.nodes + right.nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects field names in traversal order
    struct FieldCollector(Vec<String>);

    impl Visitor for FieldCollector {
        type Result = ();

        fn visit_root(&mut self) {}
        fn visit_this(&mut self) {}
        fn visit_parent(&mut self) {}

        fn visit_fields(&mut self, selector: &FieldSelector) {
            self.0.extend(selector.as_names().iter().cloned());
        }

        fn visit_index(&mut self, _index: i64) {}
        fn visit_slice(&mut self, _start: Option<i64>, _end: Option<i64>, _step: Option<i64>) {}

        fn visit_binary(&mut self, _op: BinaryOperator, left: &ExpressionNode, right: &ExpressionNode) {
            self.visit_expression(left);
            self.visit_expression(right);
        }

        fn visit_where(&mut self, left: &ExpressionNode, _condition: &ExpressionNode) {
            // Conditions are not part of the selected path
            self.visit_expression(left);
        }
    }

    #[test]
    fn test_walk_visits_operands_left_to_right() {
        let expr = ExpressionNode::union(
            ExpressionNode::child(ExpressionNode::field("a"), ExpressionNode::field("b")),
            ExpressionNode::filter(ExpressionNode::field("c"), ExpressionNode::field("d")),
        );
        let mut collector = FieldCollector(Vec::new());
        collector.visit_expression(&expr);
        assert_eq!(collector.0, ["a", "b", "c"]);
    }

    #[test]
    fn test_shape_of_leaf_and_chain() {
        let chain = ExpressionNode::child(
            ExpressionNode::child(ExpressionNode::field("a"), ExpressionNode::field("b")),
            ExpressionNode::field("c"),
        );
        assert_eq!(ShapeVisitor.visit_expression(&chain), Shape { depth: 3, nodes: 5 });
        assert_eq!(ShapeVisitor.visit_expression(&ExpressionNode::Root), Shape::LEAF);
    }
}
