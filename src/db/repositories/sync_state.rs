use crate::entities::{prelude::*, sync_state};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use serde::Serialize;

const SYNC_STATE_ROW: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastSync {
    pub username: String,
    pub synced_at: String,
    pub pages_fetched: i64,
}

pub struct SyncStateRepository {
    conn: DatabaseConnection,
}

impl SyncStateRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn record(&self, last: &LastSync) -> anyhow::Result<()> {
        let model = sync_state::ActiveModel {
            id: Set(SYNC_STATE_ROW),
            username: Set(last.username.clone()),
            last_sync_at: Set(last.synced_at.clone()),
            pages_fetched: Set(last.pages_fetched),
        };

        SyncState::insert(model)
            .on_conflict(
                OnConflict::column(sync_state::Column::Id)
                    .update_columns([
                        sync_state::Column::Username,
                        sync_state::Column::LastSyncAt,
                        sync_state::Column::PagesFetched,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn last(&self) -> anyhow::Result<Option<LastSync>> {
        let row = SyncState::find_by_id(SYNC_STATE_ROW).one(&self.conn).await?;

        Ok(row.map(|m| LastSync {
            username: m.username,
            synced_at: m.last_sync_at,
            pages_fetched: m.pages_fetched,
        }))
    }
}
