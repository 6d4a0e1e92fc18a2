//! GROUP BY / aggregate evaluation and group projection

use crate::error::{TabqlError, TabqlResult};
use crate::sql::query::{AggregateCall, AggregateFunction, SelectItem};
use crate::table::{Row, Value};
use ahash::AHashMap;
use smallvec::SmallVec;

/// Group key: one value per GROUP BY field, compared as a tuple
type GroupKey = SmallVec<[Value; 4]>;

/// 그룹 - 발견 순서(seq), 집계 요약 행, 멤버 행
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Discovery order; groups are emitted by ascending `seq`
    pub seq: usize,
    /// Group-by field values plus one entry per aggregate, keyed by its rendered text
    pub summary: Row,
    pub members: Vec<Row>,
}

/// Partition `rows` by `group_fields` and evaluate every aggregate in `fields` per group.
///
/// With no group fields all rows form one implicit group, which exists even for empty input.
pub fn group_and_aggregate(
    rows: Vec<Row>,
    group_fields: &[String],
    fields: &[SelectItem],
) -> TabqlResult<Vec<Group>> {
    let mut groups: Vec<Group> = Vec::new();

    if group_fields.is_empty() {
        groups.push(Group {
            seq: 0,
            summary: Row::new(),
            members: rows,
        });
    } else {
        let mut index: AHashMap<GroupKey, usize> = AHashMap::new();
        for row in rows {
            let key: GroupKey = group_fields
                .iter()
                .map(|field| row.get(field).cloned().unwrap_or(Value::Null))
                .collect();

            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    let seq = groups.len();
                    let summary: Row = group_fields.iter().cloned().zip(key.iter().cloned()).collect();
                    groups.push(Group {
                        seq,
                        summary,
                        members: Vec::new(),
                    });
                    index.insert(key, seq);
                    seq
                }
            };
            groups[slot].members.push(row);
        }
    }

    for group in &mut groups {
        for item in fields {
            if let SelectItem::Aggregate(call) = item {
                let value = aggregate(call, &group.members)?;
                group.summary.insert(call.to_string(), value);
            }
        }
    }

    groups.sort_by_key(|group| group.seq);
    tracing::debug!(target: "executor", groups = groups.len(), "grouped");
    Ok(groups)
}

/// Evaluate one aggregate over the member rows of a group.
pub fn aggregate(call: &AggregateCall, members: &[Row]) -> TabqlResult<Value> {
    if call.function == AggregateFunction::Count {
        return Ok(Value::text(members.len().to_string()));
    }

    let mut numbers = Vec::with_capacity(members.len());
    for row in members {
        let Some(text) = row.get(&call.argument).and_then(Value::as_str) else {
            continue;
        };
        let number = Value::text(text)
            .as_number()
            .ok_or_else(|| TabqlError::AggregateType {
                function: call.function.as_str().to_string(),
                value: text.to_string(),
            })?;
        numbers.push(number);
    }

    if numbers.is_empty() {
        return Ok(Value::Null);
    }

    let result = match call.function {
        AggregateFunction::Min => numbers.iter().copied().fold(f64::INFINITY, f64::min),
        AggregateFunction::Max => numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        AggregateFunction::Sum => numbers.iter().sum::<f64>(),
        AggregateFunction::Avg => numbers.iter().sum::<f64>() / numbers.len() as f64,
        AggregateFunction::Count => numbers.len() as f64,
    };
    // SUM/AVG 오버플로
    if !result.is_finite() {
        return Err(TabqlError::AggregateType {
            function: call.function.as_str().to_string(),
            value: result.to_string(),
        });
    }
    Ok(Value::text(result.to_string()))
}

/// Shape grouped rows into output rows.
///
/// One row per group when every field resolves from the summary, otherwise one row per
/// member with summary values taking precedence.
pub fn project_groups(groups: Vec<Group>, fields: &[SelectItem]) -> Vec<Row> {
    let mut out = Vec::new();
    for group in groups {
        let summary_only = fields.iter().all(|item| match item {
            SelectItem::Wildcard => false,
            other => group.summary.contains(&other.output_name()),
        });

        if summary_only {
            out.push(project_row(fields, &group.summary, None));
        } else {
            for member in &group.members {
                out.push(project_row(fields, &group.summary, Some(member)));
            }
        }
    }
    out
}

/// Resolve `fields` against `summary` first, then `member`; unresolved fields are null.
pub(crate) fn project_row(fields: &[SelectItem], summary: &Row, member: Option<&Row>) -> Row {
    let mut row = Row::with_capacity(fields.len());
    for item in fields {
        match item {
            SelectItem::Wildcard => {
                if let Some(member) = member {
                    for (column, value) in member.iter() {
                        row.insert(column, value.clone());
                    }
                }
            }
            other => {
                let name = other.output_name();
                let value = summary
                    .get(&name)
                    .or_else(|| member.and_then(|m| m.get(&name)))
                    .cloned()
                    .unwrap_or(Value::Null);
                row.insert(name, value);
            }
        }
    }
    row
}
