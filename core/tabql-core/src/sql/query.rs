//! 구조화된 쿼리 타입 정의
//!
//! 파서가 생성하고 엔진이 소비하는 SelectQuery, InsertQuery, DeleteQuery와
//! 그 구성 요소들을 정의합니다. `Display` 구현은 다시 파싱 가능한 정규 SQL을 출력합니다.

use crate::error::TabqlError;
use crate::table::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 쿼리 절 이름 - 파싱 에러가 어느 절에서 실패했는지 알려준다
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Clause {
    Select,
    From,
    Join,
    Where,
    GroupBy,
    OrderBy,
    Limit,
    Insert,
    Values,
    Delete,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Clause::Select => "SELECT",
            Clause::From => "FROM",
            Clause::Join => "JOIN",
            Clause::Where => "WHERE",
            Clause::GroupBy => "GROUP BY",
            Clause::OrderBy => "ORDER BY",
            Clause::Limit => "LIMIT",
            Clause::Insert => "INSERT",
            Clause::Values => "VALUES",
            Clause::Delete => "DELETE",
        };
        write!(f, "{}", name)
    }
}

/// 비교 연산자 - 닫힌 집합
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    Like,
    IsNull,
    IsNotNull,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::GtEq => ">=",
            CompareOp::LtEq => "<=",
            CompareOp::Like => "LIKE",
            CompareOp::IsNull => "IS NULL",
            CompareOp::IsNotNull => "IS NOT NULL",
        }
    }

    /// `IS NULL` / `IS NOT NULL` take no right-hand value.
    pub fn is_unary(&self) -> bool {
        matches!(self, CompareOp::IsNull | CompareOp::IsNotNull)
    }
}

impl FromStr for CompareOp {
    type Err = TabqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "=" => Ok(CompareOp::Eq),
            "!=" | "<>" => Ok(CompareOp::NotEq),
            ">" => Ok(CompareOp::Gt),
            "<" => Ok(CompareOp::Lt),
            ">=" => Ok(CompareOp::GtEq),
            "<=" => Ok(CompareOp::LtEq),
            "LIKE" => Ok(CompareOp::Like),
            "IS NULL" => Ok(CompareOp::IsNull),
            "IS NOT NULL" => Ok(CompareOp::IsNotNull),
            _ => Err(TabqlError::UnsupportedOperator {
                operator: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 단일 비교 절 `{field, operator, value}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhereClause {
    pub field: String,
    pub operator: CompareOp,
    pub value: Value,
}

impl WhereClause {
    pub fn new(field: impl Into<String>, operator: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identifier(f, &self.field)?;
        if self.operator.is_unary() {
            write!(f, " {}", self.operator)
        } else {
            write!(f, " {} ", self.operator)?;
            write_literal(f, &self.value)
        }
    }
}

/// WHERE 조건 트리 - AND/OR/NOT 노드와 비교 리프
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Compare(WhereClause),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    /// Leaf comparisons in textual order.
    pub fn clauses(&self) -> Vec<&WhereClause> {
        let mut out = Vec::new();
        self.collect_clauses(&mut out);
        out
    }

    fn collect_clauses<'a>(&'a self, out: &mut Vec<&'a WhereClause>) {
        match self {
            Condition::Compare(clause) => out.push(clause),
            Condition::And(children) | Condition::Or(children) => {
                for child in children {
                    child.collect_clauses(out);
                }
            }
            Condition::Not(inner) => inner.collect_clauses(out),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Compare(clause) => write!(f, "{}", clause),
            Condition::And(children) => write_joined(f, children, " AND "),
            Condition::Or(children) => write_joined(f, children, " OR "),
            Condition::Not(inner) => write!(f, "NOT ({})", inner),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Condition], sep: &str) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        match child {
            Condition::Compare(_) | Condition::Not(_) => write!(f, "{}", child)?,
            _ => write!(f, "({})", child)?,
        }
    }
    Ok(())
}

/// JOIN 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT"),
            JoinType::Right => write!(f, "RIGHT"),
        }
    }
}

/// `table.column` 형태의 한정된 필드
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedField {
    pub table: String,
    pub column: String,
}

impl QualifiedField {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for QualifiedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_identifier(f, &self.table)?;
        write!(f, ".")?;
        write_identifier(f, &self.column)
    }
}

/// JOIN 명세
///
/// `left_field`는 항상 기준 테이블, `right_field`는 항상 조인 테이블을 가리킨다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    pub join_type: JoinType,
    pub table: String,
    pub left_field: QualifiedField,
    pub right_field: QualifiedField,
}

impl fmt::Display for JoinSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} JOIN ", self.join_type)?;
        write_identifier(f, &self.table)?;
        write!(f, " ON {} = {}", self.left_field, self.right_field)
    }
}

/// 집계 함수 (COUNT, SUM, AVG, MIN, MAX)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunction {
    Min,
    Max,
    Sum,
    Avg,
    Count,
}

impl AggregateFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "MIN" => Some(AggregateFunction::Min),
            "MAX" => Some(AggregateFunction::Max),
            "SUM" => Some(AggregateFunction::Sum),
            "AVG" => Some(AggregateFunction::Avg),
            "COUNT" => Some(AggregateFunction::Count),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Min => "MIN",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Count => "COUNT",
        }
    }
}

/// 집계 호출 `FUNC(arg)` - arg는 필드 이름 또는 `*`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateCall {
    pub function: AggregateFunction,
    pub argument: String,
}

impl AggregateCall {
    pub fn new(function: AggregateFunction, argument: impl Into<String>) -> Self {
        Self {
            function,
            argument: argument.into(),
        }
    }
}

impl fmt::Display for AggregateCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function.as_str())?;
        if self.argument == "*" {
            write!(f, "*")?;
        } else {
            write_identifier(f, &self.argument)?;
        }
        write!(f, ")")
    }
}

/// SELECT 필드 항목
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectItem {
    Wildcard,
    Column(String),
    Aggregate(AggregateCall),
}

impl SelectItem {
    /// Output column name of this item (`name`, `COUNT(*)`, ...).
    pub fn output_name(&self) -> String {
        match self {
            SelectItem::Wildcard => "*".to_string(),
            SelectItem::Column(name) => name.clone(),
            SelectItem::Aggregate(call) => call.to_string(),
        }
    }
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectItem::Wildcard => write!(f, "*"),
            SelectItem::Column(name) => write_identifier(f, name),
            SelectItem::Aggregate(call) => write!(f, "{}", call),
        }
    }
}

/// 정렬 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// ORDER BY 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByField {
    pub field: String,
    pub direction: SortDirection,
}

impl OrderByField {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// SELECT 쿼리
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectQuery {
    pub distinct: bool,
    pub fields: Vec<SelectItem>,
    pub table: String,
    pub join: Option<JoinSpec>,
    pub filter: Option<Condition>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderByField>,
    /// Negative means unbounded.
    pub limit: Option<i64>,
}

impl SelectQuery {
    /// Plain `SELECT fields FROM table`.
    pub fn new(table: impl Into<String>, fields: Vec<SelectItem>) -> Self {
        Self {
            distinct: false,
            fields,
            table: table.into(),
            join: None,
            filter: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn where_clauses(&self) -> Vec<&WhereClause> {
        self.filter.as_ref().map(Condition::clauses).unwrap_or_default()
    }

    pub fn has_aggregates(&self) -> bool {
        self.fields
            .iter()
            .any(|item| matches!(item, SelectItem::Aggregate(_)))
    }

    /// Rows are grouped before projection (GROUP BY or any aggregate).
    pub fn is_grouped(&self) -> bool {
        !self.group_by.is_empty() || self.has_aggregates()
    }

    /// Aggregate in the field list with no GROUP BY: one implicit group.
    pub fn has_aggregate_without_group_by(&self) -> bool {
        self.group_by.is_empty() && self.has_aggregates()
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        if self.distinct {
            write!(f, "DISTINCT ")?;
        }
        for (i, item) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, " FROM ")?;
        write_identifier(f, &self.table)?;
        if let Some(join) = &self.join {
            write!(f, " {}", join)?;
        }
        if let Some(filter) = &self.filter {
            write!(f, " WHERE {}", filter)?;
        }
        if !self.group_by.is_empty() {
            write!(f, " GROUP BY ")?;
            for (i, field) in self.group_by.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_identifier(f, field)?;
            }
        }
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY ")?;
            for (i, order) in self.order_by.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write_identifier(f, &order.field)?;
                write!(f, " {}", order.direction)?;
            }
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        Ok(())
    }
}

/// INSERT 쿼리
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertQuery {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Value>,
}

impl fmt::Display for InsertQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO ")?;
        write_identifier(f, &self.table)?;
        write!(f, " (")?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write_identifier(f, column)?;
        }
        write!(f, ") VALUES (")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write_literal(f, value)?;
        }
        write!(f, ")")
    }
}

/// DELETE 쿼리
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteQuery {
    pub table: String,
    pub filter: Option<Condition>,
}

impl DeleteQuery {
    pub fn where_clauses(&self) -> Vec<&WhereClause> {
        self.filter.as_ref().map(Condition::clauses).unwrap_or_default()
    }
}

impl fmt::Display for DeleteQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM ")?;
        write_identifier(f, &self.table)?;
        if let Some(filter) = &self.filter {
            write!(f, " WHERE {}", filter)?;
        }
        Ok(())
    }
}

/// 파싱된 문장
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    Select(SelectQuery),
    Insert(InsertQuery),
    Delete(DeleteQuery),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Select(q) => write!(f, "{}", q),
            Statement::Insert(q) => write!(f, "{}", q),
            Statement::Delete(q) => write!(f, "{}", q),
        }
    }
}

/// Words the parser treats as clause keywords; identifiers spelled like one get quoted.
pub(crate) const RESERVED_WORDS: &[&str] = &[
    "SELECT", "DISTINCT", "FROM", "WHERE", "GROUP", "BY", "ORDER", "LIMIT", "INNER", "LEFT",
    "RIGHT", "JOIN", "ON", "AND", "OR", "NOT", "ASC", "DESC", "LIKE", "IS", "NULL", "INSERT",
    "INTO", "VALUES", "DELETE",
];

pub(crate) fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.iter().any(|kw| kw.eq_ignore_ascii_case(word))
}

/// Plain identifiers are written as-is, anything else double-quoted.
/// Qualified names are written part by part.
fn write_identifier(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    for (i, part) in name.split('.').enumerate() {
        if i > 0 {
            write!(f, ".")?;
        }
        let plain = part
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !is_reserved(part);
        if plain {
            write!(f, "{}", part)?;
        } else {
            write!(f, "\"{}\"", part.replace('"', "\"\""))?;
        }
    }
    Ok(())
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => write!(f, "NULL"),
        Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
    }
}
