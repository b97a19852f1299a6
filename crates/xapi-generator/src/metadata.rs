//! Course, block and learner rows loaded next to the statements.
//!
//! Analytics queries join statements against these tables to resolve
//! course and block names, so a load run publishes them before the first
//! batch. Column order matches the `event_sink` tables.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A published course run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseOverview {
    pub org: String,
    pub course_key: String,
    pub display_name: String,
    pub course_start: DateTime<Utc>,
    pub course_end: DateTime<Utc>,
    pub enrollment_start: DateTime<Utc>,
    pub enrollment_end: DateTime<Utc>,
    pub self_paced: bool,
    /// Catch-all column, always `{}`.
    pub course_data_json: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub dump_id: Uuid,
    pub time_last_dumped: DateTime<Utc>,
}

/// A block of a published course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseBlock {
    pub org: String,
    pub course_key: String,
    /// Usage key, e.g. `block-v1:Org0+DemoX+<uuid>+type@video+block@<id>`.
    pub location: String,
    pub display_name: String,
    pub xblock_data_json: String,
    pub order: u32,
    pub edited_on: DateTime<Utc>,
    pub dump_id: Uuid,
    pub time_last_dumped: DateTime<Utc>,
}

/// A learner's profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub user_id: u64,
    /// The account name used in statements.
    pub external_user_id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
    pub language: String,
    pub country: String,
    pub year_of_birth: u16,
    pub dump_id: Uuid,
    pub time_last_dumped: DateTime<Utc>,
}

/// Every metadata row of one synthetic population.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub courses: Vec<CourseOverview>,
    pub blocks: Vec<CourseBlock>,
    pub profiles: Vec<UserProfile>,
}

/// Objects the periodic query benchmark filters on.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTargets {
    pub course_url: String,
    pub org: String,
    pub actor_id: Uuid,
}
