//! TableScan Operator — Sequential row batch emission

use crate::error::TabqlResult;
use crate::sql::executor::operators::PhysicalOperator;
use crate::table::Row;

const DEFAULT_BATCH_SIZE: usize = 1024;

/// 테이블 스캔 연산자 — 적재된 행을 배치 단위로 순차 반환
pub struct TableScanOperator {
    table: String,
    /// Pre-loaded rows to emit
    data: Vec<Row>,
    batch_size: usize,
    /// Current position in data
    position: usize,
}

impl TableScanOperator {
    pub fn new(table: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            table: table.into(),
            data: rows,
            batch_size: DEFAULT_BATCH_SIZE,
            position: 0,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Get the table name this operator scans.
    pub fn table_name(&self) -> &str {
        &self.table
    }
}

impl PhysicalOperator for TableScanOperator {
    fn next(&mut self) -> TabqlResult<Option<Vec<Row>>> {
        if self.position >= self.data.len() {
            return Ok(None);
        }

        let end = (self.position + self.batch_size).min(self.data.len());
        let batch = self.data[self.position..end].to_vec();
        self.position = end;
        Ok(Some(batch))
    }

    fn reset(&mut self) -> TabqlResult<()> {
        self.position = 0;
        Ok(())
    }
}
