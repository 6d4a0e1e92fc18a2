//! NestedLoopJoin Operator — INNER / LEFT / RIGHT equi-join

use crate::error::TabqlResult;
use crate::sql::executor::operators::PhysicalOperator;
use crate::sql::query::{JoinSpec, JoinType};
use crate::table::{Row, Value};

/// Nested loop join 연산자
///
/// INNER/LEFT는 기준 테이블에서, RIGHT는 조인 테이블에서 구동한다. 프로브 쪽은
/// 첫 `next()` 호출 시 한 번 물질화된다.
///
/// 출력 컬럼은 `base.column` 뒤에 `join.column` 순서이다.
pub struct NestedLoopJoinOperator {
    base: Box<dyn PhysicalOperator>,
    join: Box<dyn PhysicalOperator>,
    spec: JoinSpec,
    base_table: String,
    /// Column sets used for null padding
    base_columns: Vec<String>,
    join_columns: Vec<String>,
    /// Materialized probe side
    probe_rows: Option<Vec<Row>>,
}

impl NestedLoopJoinOperator {
    pub fn new(
        base: Box<dyn PhysicalOperator>,
        join: Box<dyn PhysicalOperator>,
        base_table: impl Into<String>,
        spec: JoinSpec,
        base_columns: Vec<String>,
        join_columns: Vec<String>,
    ) -> Self {
        Self {
            base,
            join,
            spec,
            base_table: base_table.into(),
            base_columns,
            join_columns,
            probe_rows: None,
        }
    }

    fn drives_from_join(&self) -> bool {
        self.spec.join_type == JoinType::Right
    }

    fn build_phase(&mut self) -> TabqlResult<()> {
        let probe = if self.drives_from_join() {
            &mut self.base
        } else {
            &mut self.join
        };
        let mut rows = Vec::new();
        while let Some(batch) = probe.next()? {
            rows.extend(batch);
        }
        tracing::debug!(
            target: "executor",
            join_type = %self.spec.join_type,
            table = %self.spec.table,
            probe_rows = rows.len(),
            "join probe side materialized"
        );
        self.probe_rows = Some(rows);
        Ok(())
    }

    fn join_batch(&self, driving: Vec<Row>, probe_rows: &[Row]) -> Vec<Row> {
        let from_join = self.drives_from_join();
        let (drive_key, probe_key) = if from_join {
            (&self.spec.right_field.column, &self.spec.left_field.column)
        } else {
            (&self.spec.left_field.column, &self.spec.right_field.column)
        };
        let outer = self.spec.join_type != JoinType::Inner;

        let mut out = Vec::new();
        for row in &driving {
            let key = row.get(drive_key).and_then(Value::as_str);
            let mut matched = false;

            for probe in probe_rows {
                let probe_value = probe.get(probe_key).and_then(Value::as_str);
                if key.is_some() && key == probe_value {
                    matched = true;
                    out.push(if from_join {
                        self.combine(Some(probe), Some(row))
                    } else {
                        self.combine(Some(row), Some(probe))
                    });
                }
            }

            if outer && !matched {
                out.push(if from_join {
                    self.combine(None, Some(row))
                } else {
                    self.combine(Some(row), None)
                });
            }
        }
        out
    }

    /// Merge one base row and one join row; `None` pads that side with nulls.
    fn combine(&self, base: Option<&Row>, join: Option<&Row>) -> Row {
        let mut out = Row::with_capacity(self.base_columns.len() + self.join_columns.len());

        match base {
            Some(row) => {
                for (column, value) in row.iter() {
                    out.insert(qualify(&self.base_table, column), value.clone());
                }
            }
            None => {
                for column in &self.base_columns {
                    out.insert(qualify(&self.base_table, column), Value::Null);
                }
            }
        }

        match join {
            Some(row) => {
                for (column, value) in row.iter() {
                    out.insert(qualify(&self.spec.table, column), value.clone());
                }
            }
            None => {
                for column in &self.join_columns {
                    let name = qualify(&self.spec.table, column);
                    if !out.contains(&name) {
                        out.insert(name, Value::Null);
                    }
                }
            }
        }

        out
    }
}

fn qualify(table: &str, column: &str) -> String {
    format!("{}.{}", table, column)
}

impl PhysicalOperator for NestedLoopJoinOperator {
    fn next(&mut self) -> TabqlResult<Option<Vec<Row>>> {
        // Build phase (once)
        if self.probe_rows.is_none() {
            self.build_phase()?;
        }

        loop {
            let driving = if self.drives_from_join() {
                self.join.next()?
            } else {
                self.base.next()?
            };
            let Some(batch) = driving else {
                return Ok(None);
            };

            let probe_rows = self.probe_rows.as_deref().unwrap_or_default();
            let joined = self.join_batch(batch, probe_rows);
            if !joined.is_empty() {
                return Ok(Some(joined));
            }
        }
    }

    fn reset(&mut self) -> TabqlResult<()> {
        self.probe_rows = None;
        self.base.reset()?;
        self.join.reset()
    }
}
