use std::fmt;

use crate::{ast::Expression, schema::{Attribute, DataType, Metadata}};

/// An expression with a name: a produced column of a query row, a struct
/// member, or a lambda parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedExpression {
    /// Direct reference to a column.
    Attribute(Attribute),
    /// Computed value exposed under a name.
    Alias(Alias),
    /// Parameter of a lambda used by element-wise transforms.
    Variable(LambdaVariable),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub child: Box<Expression>,
    pub name: String,
    /// Replaces the metadata that would otherwise be inherited from `child`.
    pub explicit_metadata: Option<Metadata>,
}

impl Alias {
    pub fn new(child: Expression, name: impl Into<String>) -> Self {
        Self { child: Box::new(child), name: name.into(), explicit_metadata: None }
    }

    pub fn with_metadata(child: Expression, name: impl Into<String>, metadata: Metadata) -> Self {
        Self { child: Box::new(child), name: name.into(), explicit_metadata: Some(metadata) }
    }

    pub fn metadata(&self) -> Metadata {
        if let Some(metadata) = &self.explicit_metadata {
            return metadata.clone();
        }
        match self.child.as_ref() {
            Expression::Named(named) => named.metadata(),
            Expression::GetStructField { child, ordinal, .. } => match child.data_type() {
                DataType::Struct { fields } => fields
                    .get(*ordinal)
                    .map(|f| f.metadata.clone())
                    .unwrap_or_default(),
                _ => Metadata::new(),
            },
            _ => Metadata::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaVariable {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl LambdaVariable {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self { name: name.into(), data_type, nullable }
    }
}

impl NamedExpression {
    pub fn alias(child: Expression, name: impl Into<String>) -> Self {
        NamedExpression::Alias(Alias::new(child, name))
    }

    pub fn name(&self) -> &str {
        match self {
            NamedExpression::Attribute(attr) => &attr.name,
            NamedExpression::Alias(alias) => &alias.name,
            NamedExpression::Variable(var) => &var.name,
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            NamedExpression::Attribute(attr) => attr.data_type.clone(),
            NamedExpression::Alias(alias) => alias.child.data_type(),
            NamedExpression::Variable(var) => var.data_type.clone(),
        }
    }

    pub fn nullable(&self) -> bool {
        match self {
            NamedExpression::Attribute(attr) => attr.nullable,
            NamedExpression::Alias(alias) => alias.child.nullable(),
            NamedExpression::Variable(var) => var.nullable,
        }
    }

    pub fn metadata(&self) -> Metadata {
        match self {
            NamedExpression::Attribute(attr) => attr.metadata.clone(),
            NamedExpression::Alias(alias) => alias.metadata(),
            NamedExpression::Variable(_) => Metadata::new(),
        }
    }

    /// Rename in place when the node carries its own name; anything else that
    /// needs a new name gets wrapped in an alias.
    pub fn renamed(self, name: &str) -> NamedExpression {
        match self {
            NamedExpression::Attribute(attr) => NamedExpression::Attribute(attr.with_name(name)),
            NamedExpression::Alias(alias) => NamedExpression::Alias(Alias { name: name.to_string(), ..alias }),
            NamedExpression::Variable(var) if var.name == name => NamedExpression::Variable(var),
            other => NamedExpression::alias(other.into_expr(), name),
        }
    }

    pub fn into_expr(self) -> Expression {
        Expression::Named(self)
    }

    /// Column exposed by this expression to the plan above it.
    pub fn to_attribute(&self) -> Attribute {
        Attribute {
            name: self.name().to_string(),
            data_type: self.data_type(),
            nullable: self.nullable(),
            metadata: self.metadata(),
        }
    }
}

impl From<Attribute> for NamedExpression {
    fn from(attr: Attribute) -> Self {
        NamedExpression::Attribute(attr)
    }
}

impl fmt::Display for NamedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedExpression::Attribute(attr) => write!(f, "{}", attr.name),
            NamedExpression::Alias(alias) => write!(f, "{} AS {}", alias.child, alias.name),
            NamedExpression::Variable(var) => write!(f, "lambda {}", var.name),
        }
    }
}
