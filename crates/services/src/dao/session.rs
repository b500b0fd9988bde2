use async_trait::async_trait;
use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;
use cohort_db::models::CohortSession;

use super::base::{BaseDao, DaoResult};
use crate::attendance::{SessionDurationFields, SessionStore};

pub struct SessionDao {
    pub base: BaseDao<CohortSession>,
}

impl SessionDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, CohortSession::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        title: String,
        zoom_meeting_id: Option<String>,
        scheduled_start: Option<DateTime>,
        scheduled_duration_minutes: Option<u32>,
    ) -> DaoResult<CohortSession> {
        let now = DateTime::now();
        let session = CohortSession {
            id: None,
            cohort_id: None,
            title,
            zoom_meeting_id,
            scheduled_start,
            scheduled_duration_minutes,
            actual_duration_minutes: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&session).await?;
        self.base.find_by_id(id).await
    }
}

#[async_trait]
impl SessionStore for SessionDao {
    async fn session_duration_fields(
        &self,
        session_id: ObjectId,
    ) -> DaoResult<SessionDurationFields> {
        let session = self.base.find_by_id(session_id).await?;
        Ok(SessionDurationFields {
            actual_minutes: session.actual_duration_minutes,
            scheduled_minutes: session.scheduled_duration_minutes,
        })
    }

    async fn record_actual_duration(&self, session_id: ObjectId, minutes: u32) -> DaoResult<()> {
        self.base
            .update_by_id(
                session_id,
                doc! { "$set": { "actual_duration_minutes": i64::from(minutes) } },
            )
            .await?;
        Ok(())
    }
}
