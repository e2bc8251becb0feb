//! Query building: where-clause trees, parameters and the select builder.

mod builder;
mod parameters;
mod value;

pub use builder::{QueryBuilder, RenderedQuery};
pub use parameters::{Connective, Expression, Operand, Parameters};
pub use value::ParameterValue;
