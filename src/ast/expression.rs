use std::fmt;

use crate::{
    ast::{LambdaVariable, NamedExpression},
    schema::{CastRules, DataType, StructField},
};

/// Declarative expression tree built by the output resolver.
///
/// Nothing here is evaluated; each node only knows its result type and
/// nullability so that resolution can check what it built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Named(NamedExpression),
    /// Typed `NULL`.
    NullLiteral(DataType),
    Cast(Cast),
    /// Reports `column_name` instead of a generic hint when `child` overflows.
    CheckOverflowInTableInsert { child: Box<Expression>, column_name: String },
    /// Write-side length check for `char`/`varchar` targets.
    StringLengthCheck { child: Box<Expression>, limit: LengthLimit },
    GetStructField { child: Box<Expression>, ordinal: usize, name: String },
    CreateStruct(Vec<NamedExpression>),
    If { predicate: Box<Expression>, then: Box<Expression>, otherwise: Box<Expression> },
    IsNull(Box<Expression>),
    /// `child` where an enclosing null check has already ruled out null.
    KnownNotNull(Box<Expression>),
    /// Applies `function` to every element of the `input` array.
    ArrayTransform { input: Box<Expression>, function: Lambda },
    MapKeys(Box<Expression>),
    MapValues(Box<Expression>),
    MapFromArrays { keys: Box<Expression>, values: Box<Expression> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cast {
    pub child: Box<Expression>,
    pub data_type: DataType,
    pub time_zone: Option<String>,
    /// ANSI evaluation: invalid input and overflow fail instead of yielding null.
    pub ansi: bool,
    /// Set on casts synthesized for a table insertion.
    pub table_insertion: bool,
}

impl Cast {
    pub fn new(child: Expression, data_type: DataType, time_zone: Option<String>, ansi: bool) -> Self {
        Self { child: Box::new(child), data_type, time_zone, ansi, table_insertion: false }
    }

    pub fn nullable(&self) -> bool {
        let from = self.child.data_type();
        self.child.nullable() || (!self.ansi && CastRules::force_nullable(&from, &self.data_type))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthLimit {
    /// Pads shorter values, rejects longer ones.
    Char(u32),
    /// Rejects longer values.
    Varchar(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lambda {
    pub body: Box<Expression>,
    pub params: Vec<LambdaVariable>,
}

impl Lambda {
    pub fn new(body: Expression, params: Vec<LambdaVariable>) -> Self {
        Self { body: Box::new(body), params }
    }
}

impl Expression {
    pub fn is_null(expr: Expression) -> Self {
        Expression::IsNull(Box::new(expr))
    }

    pub fn known_not_null(expr: Expression) -> Self {
        Expression::KnownNotNull(Box::new(expr))
    }

    pub fn if_else(predicate: Expression, then: Expression, otherwise: Expression) -> Self {
        Expression::If { predicate: Box::new(predicate), then: Box::new(then), otherwise: Box::new(otherwise) }
    }

    pub fn array_transform(input: Expression, function: Lambda) -> Self {
        Expression::ArrayTransform { input: Box::new(input), function }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Expression::Named(named) => named.data_type(),
            Expression::NullLiteral(ty) => ty.clone(),
            Expression::Cast(cast) => cast.data_type.clone(),
            Expression::CheckOverflowInTableInsert { child, .. } => child.data_type(),
            Expression::StringLengthCheck { child, .. } => child.data_type(),
            Expression::GetStructField { child, ordinal, .. } => match child.data_type() {
                DataType::Struct { fields } => fields
                    .get(*ordinal)
                    .map(|f| f.data_type.clone())
                    .unwrap_or(DataType::Null),
                _ => DataType::Null,
            },
            Expression::CreateStruct(children) => DataType::structure(
                children
                    .iter()
                    .map(|c| StructField::new(c.name(), c.data_type(), c.nullable()).with_metadata(c.metadata()))
                    .collect(),
            ),
            Expression::If { then, .. } => then.data_type(),
            Expression::IsNull(_) => DataType::Boolean,
            Expression::KnownNotNull(child) => child.data_type(),
            Expression::ArrayTransform { function, .. } => {
                DataType::array(function.body.data_type(), function.body.nullable())
            }
            Expression::MapKeys(child) => match child.data_type() {
                DataType::Map { key_type, .. } => DataType::array(*key_type, false),
                _ => DataType::Null,
            },
            Expression::MapValues(child) => match child.data_type() {
                DataType::Map { value_type, value_contains_null, .. } => DataType::array(*value_type, value_contains_null),
                _ => DataType::Null,
            },
            Expression::MapFromArrays { keys, values } => match (keys.data_type(), values.data_type()) {
                (
                    DataType::Array { element_type: key_type, .. },
                    DataType::Array { element_type: value_type, contains_null },
                ) => DataType::map(*key_type, *value_type, contains_null),
                _ => DataType::Null,
            },
        }
    }

    pub fn nullable(&self) -> bool {
        match self {
            Expression::Named(named) => named.nullable(),
            Expression::NullLiteral(_) => true,
            Expression::Cast(cast) => cast.nullable(),
            Expression::CheckOverflowInTableInsert { child, .. } => child.nullable(),
            Expression::StringLengthCheck { child, .. } => child.nullable(),
            Expression::GetStructField { child, ordinal, .. } => {
                let field_nullable = match child.data_type() {
                    DataType::Struct { fields } => fields.get(*ordinal).map(|f| f.nullable).unwrap_or(true),
                    _ => true,
                };
                child.nullable() || field_nullable
            }
            Expression::CreateStruct(_) => false,
            Expression::If { then, otherwise, .. } => then.nullable() || otherwise.nullable(),
            Expression::IsNull(_) | Expression::KnownNotNull(_) => false,
            Expression::ArrayTransform { input, .. } => input.nullable(),
            Expression::MapKeys(child) | Expression::MapValues(child) => child.nullable(),
            Expression::MapFromArrays { keys, values } => keys.nullable() || values.nullable(),
        }
    }
}

impl From<Cast> for Expression {
    fn from(cast: Cast) -> Self {
        Expression::Cast(cast)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Named(named) => write!(f, "{}", named),
            Expression::NullLiteral(ty) => write!(f, "null::{}", ty.catalog_string()),
            Expression::Cast(cast) => write!(f, "cast({} as {})", cast.child, cast.data_type.catalog_string()),
            Expression::CheckOverflowInTableInsert { child, column_name } => {
                write!(f, "check_overflow({}, '{}')", child, column_name)
            }
            Expression::StringLengthCheck { child, limit } => match limit {
                LengthLimit::Char(n) => write!(f, "char_write_check({}, {})", child, n),
                LengthLimit::Varchar(n) => write!(f, "varchar_write_check({}, {})", child, n),
            },
            Expression::GetStructField { child, name, .. } => write!(f, "{}.{}", child, name),
            Expression::CreateStruct(children) => {
                let inner: Vec<String> = children.iter().map(|c| c.to_string()).collect();
                write!(f, "struct({})", inner.join(", "))
            }
            Expression::If { predicate, then, otherwise } => write!(f, "if({}, {}, {})", predicate, then, otherwise),
            Expression::IsNull(child) => write!(f, "isnull({})", child),
            Expression::KnownNotNull(child) => write!(f, "knownnotnull({})", child),
            Expression::ArrayTransform { input, function } => {
                let params: Vec<&str> = function.params.iter().map(|p| p.name.as_str()).collect();
                write!(f, "transform({}, ({}) -> {})", input, params.join(", "), function.body)
            }
            Expression::MapKeys(child) => write!(f, "map_keys({})", child),
            Expression::MapValues(child) => write!(f, "map_values({})", child),
            Expression::MapFromArrays { keys, values } => write!(f, "map_from_arrays({}, {})", keys, values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Attribute;

    fn column(name: &str, ty: DataType, nullable: bool) -> Expression {
        NamedExpression::from(Attribute::new(name, ty, nullable)).into_expr()
    }

    #[test]
    fn get_struct_field_is_nullable_when_parent_is() {
        let ty = DataType::structure(vec![StructField::new("a", DataType::Int, false)]);
        let field = Expression::GetStructField { child: Box::new(column("s", ty.clone(), true)), ordinal: 0, name: "a".into() };
        assert_eq!(field.data_type(), DataType::Int);
        assert!(field.nullable());

        let field = Expression::GetStructField { child: Box::new(column("s", ty, false)), ordinal: 0, name: "a".into() };
        assert!(!field.nullable());
    }

    #[test]
    fn known_not_null_parent_keeps_declared_field_nullability() {
        let ty = DataType::structure(vec![StructField::new("a", DataType::Int, false), StructField::new("b", DataType::Int, true)]);
        let parent = Expression::known_not_null(column("s", ty, true));
        assert!(!parent.nullable());
        let a = Expression::GetStructField { child: Box::new(parent.clone()), ordinal: 0, name: "a".into() };
        let b = Expression::GetStructField { child: Box::new(parent), ordinal: 1, name: "b".into() };
        assert!(!a.nullable());
        assert!(b.nullable());
        assert_eq!(a.to_string(), "knownnotnull(s).a");
    }

    #[test]
    fn map_parts_expose_arrays() {
        let map = column("m", DataType::map(DataType::String, DataType::Int, true), false);
        assert_eq!(Expression::MapKeys(Box::new(map.clone())).data_type(), DataType::array(DataType::String, false));
        assert_eq!(Expression::MapValues(Box::new(map)).data_type(), DataType::array(DataType::Int, true));
    }

    #[test]
    fn legacy_cast_from_string_may_produce_null() {
        let cast = Cast::new(column("s", DataType::String, false), DataType::Int, None, false);
        assert!(cast.nullable());
        let ansi = Cast::new(column("s", DataType::String, false), DataType::Int, None, true);
        assert!(!ansi.nullable());
    }

    #[test]
    fn display_renders_transform() {
        let var = LambdaVariable::new("element", DataType::Int, false);
        let body = Cast::new(NamedExpression::Variable(var.clone()).into_expr(), DataType::Long, None, true);
        let expr = Expression::array_transform(column("xs", DataType::array(DataType::Int, false), false), Lambda::new(body.into(), vec![var]));
        assert_eq!(expr.to_string(), "transform(xs, (element) -> cast(lambda element as bigint))");
    }
}
