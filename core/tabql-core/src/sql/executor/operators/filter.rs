//! Filter Operator — WHERE clause evaluation

use crate::error::TabqlResult;
use crate::sql::executor::Predicate;
use crate::sql::executor::operators::PhysicalOperator;
use crate::table::Row;

/// 필터 연산자 (WHERE 조건) — 컴파일된 Predicate로 행 단위 평가
pub struct FilterOperator {
    input: Box<dyn PhysicalOperator>,
    predicate: Predicate,
}

impl FilterOperator {
    pub fn new(input: Box<dyn PhysicalOperator>, predicate: Predicate) -> Self {
        Self { input, predicate }
    }
}

impl PhysicalOperator for FilterOperator {
    fn next(&mut self) -> TabqlResult<Option<Vec<Row>>> {
        loop {
            match self.input.next()? {
                None => return Ok(None),
                Some(batch) => {
                    let filtered: Vec<Row> = batch
                        .into_iter()
                        .filter(|row| self.predicate.evaluate(row))
                        .collect();
                    if !filtered.is_empty() {
                        return Ok(Some(filtered));
                    }
                    // If all rows filtered out, try next batch
                }
            }
        }
    }

    fn reset(&mut self) -> TabqlResult<()> {
        self.input.reset()
    }
}
