use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{AttendanceRecord, AttendanceSegment, CohortSession, User, UserAlias};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        User::COLLECTION,
        vec![index_unique(bson::doc! { "email": 1 })],
    )
    .await?;

    // Email aliases
    create_indexes(
        db,
        UserAlias::COLLECTION,
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "user_id": 1 }),
        ],
    )
    .await?;

    // Sessions
    create_indexes(
        db,
        CohortSession::COLLECTION,
        vec![
            index(bson::doc! { "zoom_meeting_id": 1 }),
            index(bson::doc! { "cohort_id": 1, "scheduled_start": -1 }),
        ],
    )
    .await?;

    // Attendance records
    create_indexes(
        db,
        AttendanceRecord::COLLECTION,
        vec![
            index(bson::doc! { "session_id": 1, "user_id": 1 }),
            index(bson::doc! { "user_id": 1, "created_at": -1 }),
        ],
    )
    .await?;

    // Attendance segments
    create_indexes(
        db,
        AttendanceSegment::COLLECTION,
        vec![
            index(bson::doc! { "attendance_id": 1, "position": 1 }),
            index(bson::doc! { "session_id": 1 }),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
