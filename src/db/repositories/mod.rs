pub mod cast;
pub mod ingest;
pub mod joins;
pub mod media;
pub mod sync_state;

use crate::constants::db::LOOKUP_CHUNK_SIZE;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::collections::HashMap;

/// Runs `column IN (ids)` in bounded chunks. Duplicate ids are queried once.
pub(crate) async fn find_where_in<E>(
    conn: &DatabaseConnection,
    column: E::Column,
    ids: &[i64],
) -> anyhow::Result<Vec<E::Model>>
where
    E: EntityTrait,
{
    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let mut rows = Vec::with_capacity(unique.len());
    for chunk in unique.chunks(LOOKUP_CHUNK_SIZE) {
        let found = E::find()
            .filter(column.is_in(chunk.iter().copied()))
            .all(conn)
            .await?;
        rows.extend(found);
    }

    Ok(rows)
}

/// Reorders rows to follow `ids`, dropping ids that had no row and repeats.
pub(crate) fn in_request_order<M>(ids: &[i64], rows: Vec<M>, key: impl Fn(&M) -> i64) -> Vec<M> {
    let mut by_id: HashMap<i64, M> = rows.into_iter().map(|row| (key(&row), row)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::in_request_order;

    #[test]
    fn request_order_skips_missing_and_repeated_ids() {
        let rows = vec![(1, "a"), (3, "c"), (2, "b")];
        let ordered = in_request_order(&[3, 9, 1, 3], rows, |r| r.0);
        assert_eq!(ordered, vec![(3, "c"), (1, "a")]);
    }
}
