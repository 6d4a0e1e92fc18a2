//! WHERE evaluation - single comparisons and compiled condition trees

use crate::error::{TabqlError, TabqlResult};
use crate::sql::query::{CompareOp, Condition, WhereClause};
use crate::table::{Row, Value};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;

/// Evaluate one comparison against a row.
///
/// LIKE patterns are compiled on every call here; use [`Predicate`] for repeated evaluation.
pub fn evaluate(row: &Row, clause: &WhereClause) -> TabqlResult<bool> {
    let pattern = match clause.operator {
        CompareOp::Like => Some(like_pattern(&clause.value)?),
        _ => None,
    };
    Ok(compare(row, clause, pattern.as_ref()))
}

/// 컴파일된 WHERE 조건 트리
///
/// LIKE 패턴은 컴파일 시 한 번만 정규식으로 변환된다.
#[derive(Debug, Clone)]
pub enum Predicate {
    Compare {
        clause: WhereClause,
        pattern: Option<Regex>,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compile(condition: &Condition) -> TabqlResult<Self> {
        Ok(match condition {
            Condition::Compare(clause) => {
                let pattern = match clause.operator {
                    CompareOp::Like => Some(like_pattern(&clause.value)?),
                    _ => None,
                };
                Predicate::Compare {
                    clause: clause.clone(),
                    pattern,
                }
            }
            Condition::And(children) => Predicate::And(
                children
                    .iter()
                    .map(Predicate::compile)
                    .collect::<TabqlResult<_>>()?,
            ),
            Condition::Or(children) => Predicate::Or(
                children
                    .iter()
                    .map(Predicate::compile)
                    .collect::<TabqlResult<_>>()?,
            ),
            Condition::Not(inner) => Predicate::Not(Box::new(Predicate::compile(inner)?)),
        })
    }

    pub fn evaluate(&self, row: &Row) -> bool {
        match self {
            Predicate::Compare { clause, pattern } => compare(row, clause, pattern.as_ref()),
            Predicate::And(children) => children.iter().all(|p| p.evaluate(row)),
            Predicate::Or(children) => children.iter().any(|p| p.evaluate(row)),
            Predicate::Not(inner) => !inner.evaluate(row),
        }
    }
}

fn compare(row: &Row, clause: &WhereClause, pattern: Option<&Regex>) -> bool {
    let cell = row.get(&clause.field);

    match clause.operator {
        CompareOp::IsNull => return cell.is_none_or(Value::is_null),
        CompareOp::IsNotNull => return cell.is_some_and(|v| !v.is_null()),
        _ => {}
    }

    let (Some(left), Some(right)) = (cell.and_then(Value::as_str), clause.value.as_str()) else {
        return false;
    };

    match clause.operator {
        CompareOp::Eq => left == right,
        CompareOp::NotEq => left != right,
        CompareOp::Gt => ordering(left, right) == Ordering::Greater,
        CompareOp::Lt => ordering(left, right) == Ordering::Less,
        CompareOp::GtEq => ordering(left, right) != Ordering::Less,
        CompareOp::LtEq => ordering(left, right) != Ordering::Greater,
        CompareOp::Like => pattern.is_some_and(|re| re.is_match(left)),
        CompareOp::IsNull | CompareOp::IsNotNull => false,
    }
}

fn ordering(left: &str, right: &str) -> Ordering {
    Value::text(left).cmp_coerced(&Value::text(right))
}

/// `%` matches any sequence; everything else is literal. Case-insensitive, whole string.
fn like_pattern(value: &Value) -> TabqlResult<Regex> {
    let raw = value.as_str().unwrap_or_default();
    let body = raw
        .split('%')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    RegexBuilder::new(&format!("^(?s:{})$", body))
        .case_insensitive(true)
        .build()
        .map_err(|e| TabqlError::SqlExecution {
            message: format!("invalid LIKE pattern '{}'", raw),
            context: e.to_string(),
        })
}
