//! Projection Operator — SELECT field list, GROUP BY and aggregates

use crate::error::TabqlResult;
use crate::sql::executor::aggregate::{group_and_aggregate, project_groups, project_row};
use crate::sql::executor::operators::PhysicalOperator;
use crate::sql::query::SelectItem;
use crate::table::Row;

/// 프로젝션 연산자
///
/// 집계나 GROUP BY가 없으면 배치 단위로 스트리밍하고, 있으면 입력 전체를 모아
/// 그룹화한 뒤 한 번에 내보낸다.
pub struct ProjectionOperator {
    input: Box<dyn PhysicalOperator>,
    group_by: Vec<String>,
    fields: Vec<SelectItem>,
    grouping: bool,
    emitted: bool,
}

impl ProjectionOperator {
    pub fn new(
        input: Box<dyn PhysicalOperator>,
        group_by: Vec<String>,
        fields: Vec<SelectItem>,
        grouping: bool,
    ) -> Self {
        Self {
            input,
            group_by,
            fields,
            grouping,
            emitted: false,
        }
    }

    fn aggregate_all(&mut self) -> TabqlResult<Option<Vec<Row>>> {
        let mut rows = Vec::new();
        while let Some(batch) = self.input.next()? {
            rows.extend(batch);
        }

        let groups = group_and_aggregate(rows, &self.group_by, &self.fields)?;
        let projected = project_groups(groups, &self.fields);
        Ok(if projected.is_empty() { None } else { Some(projected) })
    }
}

impl PhysicalOperator for ProjectionOperator {
    fn next(&mut self) -> TabqlResult<Option<Vec<Row>>> {
        if self.grouping {
            if self.emitted {
                return Ok(None);
            }
            self.emitted = true;
            return self.aggregate_all();
        }

        let empty = Row::new();
        Ok(self.input.next()?.map(|batch| {
            batch
                .iter()
                .map(|row| project_row(&self.fields, &empty, Some(row)))
                .collect()
        }))
    }

    fn reset(&mut self) -> TabqlResult<()> {
        self.emitted = false;
        self.input.reset()
    }
}
