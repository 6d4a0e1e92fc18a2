//! Physical Operator Trait — Volcano Execution Model

use crate::error::TabqlResult;
use crate::table::Row;

/// 물리 연산자 트레이트 — Volcano 실행 모델 (Pull 기반)
pub trait PhysicalOperator: Send {
    /// 다음 행 배치 반환 (None이면 끝)
    fn next(&mut self) -> TabqlResult<Option<Vec<Row>>>;

    /// 연산자 상태 초기화 (재실행용)
    fn reset(&mut self) -> TabqlResult<()>;
}

/// Pull every batch out of `op` into one row vector.
pub fn collect_rows(op: &mut dyn PhysicalOperator) -> TabqlResult<Vec<Row>> {
    let mut rows = Vec::new();
    while let Some(batch) = op.next()? {
        rows.extend(batch);
    }
    Ok(rows)
}
