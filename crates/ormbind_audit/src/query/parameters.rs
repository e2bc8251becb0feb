//! Where-clause accumulator.
//!
//! Clauses are kept structured until [`Parameters::build`] renders them, at
//! which point values are bound to sequential named parameters (`:_p0`,
//! `:_p1`, ...). Naming at render time keeps detached sub-trees independent:
//! a combinator can build a sub-tree aside and attach it only on success.

use super::value::ParameterValue;
use std::collections::BTreeMap;
use std::fmt::Write;

/// How sibling clauses are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    /// All clauses must hold.
    And,
    /// Any clause must hold.
    Or,
}

impl Connective {
    fn as_str(self) -> &'static str {
        match self {
            Self::And => " and ",
            Self::Or => " or ",
        }
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A property of the queried entity, qualified with the alias.
    Property(String),
    /// A literal fragment written as-is.
    Literal(String),
    /// A single bound value.
    Param(ParameterValue),
    /// A parenthesized list of bound values.
    Params(Vec<ParameterValue>),
}

/// One node of the where-clause tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `left op right`.
    Comparison {
        /// Left side: an aliased property or a literal.
        left: Operand,
        /// Operator token.
        op: String,
        /// Right side.
        right: Operand,
    },
    /// `property is null` / `property is not null`.
    Null {
        /// The property.
        property: String,
        /// True for `is not null`.
        negated: bool,
    },
    /// A parenthesized group.
    Group(Parameters),
}

/// A group of where clauses joined by one connective.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    alias: String,
    connective: Connective,
    negated: bool,
    expressions: Vec<Expression>,
}

impl Parameters {
    /// Creates an empty group.
    pub fn new(alias: impl Into<String>, connective: Connective) -> Self {
        Self {
            alias: alias.into(),
            connective,
            negated: false,
            expressions: Vec::new(),
        }
    }

    /// Creates a detached, empty group with the same alias.
    ///
    /// Attach it with [`add_sub_parameters`](Self::add_sub_parameters).
    pub fn detached(&self, connective: Connective) -> Self {
        Self::new(self.alias.clone(), connective)
    }

    /// Negates the whole group.
    #[must_use]
    pub fn negated(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Returns the alias properties are qualified with.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the connective.
    pub fn connective(&self) -> Connective {
        self.connective
    }

    /// Returns the expressions in insertion order.
    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    /// Returns the number of direct expressions.
    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    /// Returns true if no expression was added.
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }

    /// Adds `alias.left op alias.right`: a property-to-property comparison.
    pub fn add_where(&mut self, left: &str, op: &str, right: &str) {
        self.push_comparison(
            Operand::Property(left.to_string()),
            op,
            Operand::Property(right.to_string()),
        );
    }

    /// Adds `left op right` with neither side qualified.
    pub fn add_where_literal(&mut self, left: &str, op: &str, right: &str) {
        self.push_comparison(
            Operand::Literal(left.to_string()),
            op,
            Operand::Literal(right.to_string()),
        );
    }

    /// Adds `alias.left op :param`.
    pub fn add_where_with_param(&mut self, left: &str, op: &str, value: ParameterValue) {
        self.push_comparison(Operand::Property(left.to_string()), op, Operand::Param(value));
    }

    /// Adds `alias.left op (:p0, :p1, ...)`.
    pub fn add_where_with_params(&mut self, left: &str, op: &str, values: Vec<ParameterValue>) {
        self.push_comparison(Operand::Property(left.to_string()), op, Operand::Params(values));
    }

    /// Adds `alias.property is null`.
    pub fn add_null_restriction(&mut self, property: &str) {
        self.expressions.push(Expression::Null {
            property: property.to_string(),
            negated: false,
        });
    }

    /// Adds `alias.property is not null`.
    pub fn add_not_null_restriction(&mut self, property: &str) {
        self.expressions.push(Expression::Null {
            property: property.to_string(),
            negated: true,
        });
    }

    /// Attaches a group built with [`detached`](Self::detached).
    pub fn add_sub_parameters(&mut self, sub: Parameters) {
        self.expressions.push(Expression::Group(sub));
    }

    fn push_comparison(&mut self, left: Operand, op: &str, right: Operand) {
        self.expressions.push(Expression::Comparison {
            left,
            op: op.to_string(),
            right,
        });
    }

    /// Renders the group into `out`, binding values into `params`.
    ///
    /// Parameter names continue from the number of entries already in
    /// `params`, so several groups can share one map.
    pub fn build(&self, out: &mut String, params: &mut BTreeMap<String, ParameterValue>) {
        let parts: Vec<String> = self
            .expressions
            .iter()
            .filter_map(|expr| self.render_expression(expr, params))
            .collect();
        if parts.is_empty() {
            return;
        }
        let body = parts.join(self.connective.as_str());
        if self.negated {
            let _ = write!(out, "not ({body})");
        } else {
            out.push_str(&body);
        }
    }

    /// Renders the group on its own.
    pub fn render(&self) -> (String, BTreeMap<String, ParameterValue>) {
        let mut out = String::new();
        let mut params = BTreeMap::new();
        self.build(&mut out, &mut params);
        (out, params)
    }

    fn render_expression(
        &self,
        expr: &Expression,
        params: &mut BTreeMap<String, ParameterValue>,
    ) -> Option<String> {
        match expr {
            Expression::Comparison { left, op, right } => Some(format!(
                "{} {op} {}",
                self.render_operand(left, params),
                self.render_operand(right, params)
            )),
            Expression::Null { property, negated } => Some(format!(
                "{}.{property} is {}null",
                self.alias,
                if *negated { "not " } else { "" }
            )),
            Expression::Group(sub) => {
                let mut inner = String::new();
                sub.build(&mut inner, params);
                if inner.is_empty() {
                    None
                } else {
                    Some(format!("({inner})"))
                }
            }
        }
    }

    fn render_operand(
        &self,
        operand: &Operand,
        params: &mut BTreeMap<String, ParameterValue>,
    ) -> String {
        match operand {
            Operand::Property(name) => format!("{}.{name}", self.alias),
            Operand::Literal(text) => text.clone(),
            Operand::Param(value) => bind(params, value.clone()),
            Operand::Params(values) => {
                let names: Vec<String> = values.iter().map(|v| bind(params, v.clone())).collect();
                format!("({})", names.join(", "))
            }
        }
    }
}

fn bind(params: &mut BTreeMap<String, ParameterValue>, value: ParameterValue) -> String {
    let name = format!("_p{}", params.len());
    let placeholder = format!(":{name}");
    params.insert(name, value);
    placeholder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_comparison_is_aliased() {
        let mut params = Parameters::new("e", Connective::And);
        params.add_where("age", "=", "age");
        let (text, values) = params.render();
        assert_eq!(text, "e.age = e.age");
        assert!(values.is_empty());
    }

    #[test]
    fn params_are_numbered_in_order() {
        let mut params = Parameters::new("e", Connective::And);
        params.add_where_with_param("age", ">", 30.into());
        params.add_where_with_params("name", "in", vec!["a".into(), "b".into()]);
        let (text, values) = params.render();
        assert_eq!(text, "e.age > :_p0 and e.name in (:_p1, :_p2)");
        assert_eq!(values["_p0"], ParameterValue::Integer(30));
        assert_eq!(values["_p2"], ParameterValue::Text("b".into()));
    }

    #[test]
    fn groups_nest_and_negate() {
        let mut root = Parameters::new("e", Connective::And);
        root.add_null_restriction("nickname");
        let mut or = root.detached(Connective::Or);
        or.add_where_with_param("age", "<", 18.into());
        or.add_not_null_restriction("guardian");
        root.add_sub_parameters(or.negated());
        let (text, _) = root.render();
        assert_eq!(
            text,
            "e.nickname is null and (not (e.age < :_p0 or e.guardian is not null))"
        );
    }

    #[test]
    fn empty_groups_vanish() {
        let mut root = Parameters::new("e", Connective::And);
        let empty = root.detached(Connective::Or);
        root.add_sub_parameters(empty);
        root.add_where_literal("1", "=", "1");
        assert_eq!(root.render().0, "1 = 1");
    }
}
