//! Distinct Operator — SELECT DISTINCT

use crate::error::TabqlResult;
use crate::sql::executor::operators::PhysicalOperator;
use crate::table::Row;
use ahash::AHashSet;

/// 중복 제거 연산자 — 처음 등장한 행만 통과시킨다
pub struct DistinctOperator {
    input: Box<dyn PhysicalOperator>,
    seen: AHashSet<Row>,
}

impl DistinctOperator {
    pub fn new(input: Box<dyn PhysicalOperator>) -> Self {
        Self {
            input,
            seen: AHashSet::new(),
        }
    }
}

impl PhysicalOperator for DistinctOperator {
    fn next(&mut self) -> TabqlResult<Option<Vec<Row>>> {
        loop {
            match self.input.next()? {
                None => return Ok(None),
                Some(batch) => {
                    let unique: Vec<Row> = batch
                        .into_iter()
                        .filter(|row| {
                            if self.seen.contains(row) {
                                false
                            } else {
                                self.seen.insert(row.clone());
                                true
                            }
                        })
                        .collect();
                    if !unique.is_empty() {
                        return Ok(Some(unique));
                    }
                }
            }
        }
    }

    fn reset(&mut self) -> TabqlResult<()> {
        self.seen.clear();
        self.input.reset()
    }
}
