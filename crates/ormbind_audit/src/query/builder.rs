//! Query builder over one audit entity.

use super::parameters::{Connective, Parameters};
use super::value::ParameterValue;
use std::collections::BTreeMap;

/// A rendered query and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    /// Query text.
    pub text: String,
    /// Values of the named parameters in `text`.
    pub parameters: BTreeMap<String, ParameterValue>,
}

/// Builds a select over one entity, aliased.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    entity_name: String,
    alias: String,
    root: Parameters,
    projections: Vec<String>,
    distinct: bool,
    orders: Vec<(String, bool)>,
}

impl QueryBuilder {
    /// Creates a builder selecting `entity_name alias`.
    pub fn new(entity_name: impl Into<String>, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            entity_name: entity_name.into(),
            root: Parameters::new(alias.clone(), Connective::And),
            alias,
            projections: Vec::new(),
            distinct: false,
            orders: Vec::new(),
        }
    }

    /// Returns the queried entity name.
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// Returns the alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the root where-clause group.
    pub fn root_parameters(&self) -> &Parameters {
        &self.root
    }

    /// Returns the root where-clause group for writing.
    pub fn root_parameters_mut(&mut self) -> &mut Parameters {
        &mut self.root
    }

    /// Replaces the root where-clause group.
    pub fn set_root_parameters(&mut self, root: Parameters) {
        self.root = root;
    }

    /// Adds a projection; `function` wraps the property, e.g. `max`.
    ///
    /// `distinct` applies inside a function. Without one it makes the whole
    /// select distinct.
    pub fn add_projection(&mut self, function: Option<&str>, property: &str, distinct: bool) {
        let projection = match function {
            Some(function) => {
                let distinct = if distinct { "distinct " } else { "" };
                format!("{function}({distinct}{}.{property})", self.alias)
            }
            None => {
                self.distinct |= distinct;
                format!("{}.{property}", self.alias)
            }
        };
        self.projections.push(projection);
    }

    /// Adds an ordering on a property.
    pub fn add_order(&mut self, property: &str, ascending: bool) {
        self.orders.push((property.to_string(), ascending));
    }

    /// Renders the query.
    pub fn to_query(&self) -> RenderedQuery {
        let mut text = String::from("select ");
        if self.distinct {
            text.push_str("distinct ");
        }
        if self.projections.is_empty() {
            text.push_str(&self.alias);
        } else {
            text.push_str(&self.projections.join(", "));
        }
        text.push_str(" from ");
        text.push_str(&self.entity_name);
        text.push(' ');
        text.push_str(&self.alias);

        let mut parameters = BTreeMap::new();
        let mut clause = String::new();
        self.root.build(&mut clause, &mut parameters);
        if !clause.is_empty() {
            text.push_str(" where ");
            text.push_str(&clause);
        }

        if !self.orders.is_empty() {
            let orders: Vec<String> = self
                .orders
                .iter()
                .map(|(property, asc)| {
                    format!(
                        "{}.{property} {}",
                        self.alias,
                        if *asc { "asc" } else { "desc" }
                    )
                })
                .collect();
            text.push_str(" order by ");
            text.push_str(&orders.join(", "));
        }

        RenderedQuery { text, parameters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_select() {
        let qb = QueryBuilder::new("Person_AUD", "e");
        assert_eq!(qb.to_query().text, "select e from Person_AUD e");
    }

    #[test]
    fn full_select() {
        let mut qb = QueryBuilder::new("Person_AUD", "e");
        qb.add_projection(Some("max"), "age", false);
        qb.add_projection(None, "name", true);
        qb.root_parameters_mut()
            .add_where_with_param("age", ">=", 21.into());
        qb.add_order("name", true);
        let query = qb.to_query();
        assert_eq!(
            query.text,
            "select distinct max(e.age), e.name from Person_AUD e where e.age >= :_p0 order by e.name asc"
        );
        assert_eq!(query.parameters.len(), 1);
    }

    #[test]
    fn distinct_stays_inside_functions() {
        let mut qb = QueryBuilder::new("Person_AUD", "e");
        qb.add_projection(Some("count"), "name", true);
        qb.add_projection(None, "age", false);
        assert_eq!(
            qb.to_query().text,
            "select count(distinct e.name), e.age from Person_AUD e"
        );
    }
}
