use crate::{ast::NamedExpression, schema::Attribute};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalPlan {
    /// Rows read from a named source; `output` lists its columns in order.
    Relation {
        name: String,
        output: Vec<Attribute>,
    },

    /// Projection in output order.
    Project {
        input: Box<LogicalPlan>,
        exprs: Vec<NamedExpression>,
    },
}

impl LogicalPlan {
    pub fn relation(name: impl Into<String>, output: Vec<Attribute>) -> Self {
        LogicalPlan::Relation { name: name.into(), output }
    }

    pub fn project(input: LogicalPlan, exprs: Vec<NamedExpression>) -> Self {
        LogicalPlan::Project { input: Box::new(input), exprs }
    }

    /// Columns produced by this plan, as references.
    pub fn output(&self) -> Vec<NamedExpression> {
        match self {
            LogicalPlan::Relation { output, .. } => output.iter().cloned().map(NamedExpression::Attribute).collect(),
            LogicalPlan::Project { exprs, .. } => {
                exprs.iter().map(|e| NamedExpression::Attribute(e.to_attribute())).collect()
            }
        }
    }
}
