//! Synthetic learners and course runs.

use crate::generators::timestamp::random_time_between;
use crate::generators::uuid::generate_uuid_v4;
use crate::metadata::{CourseBlock, CourseOverview, UserProfile};
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

/// Base URL every generated course and block hangs off.
pub const LMS_BASE_URL: &str = "http://localhost:18000";

const LANGUAGES: [&str; 5] = ["en", "es", "fr", "ar", "pt"];
const COUNTRIES: [&str; 5] = ["US", "MX", "FR", "EG", "BR"];

/// A learner taking part in courses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Sequential actor number.
    pub number: usize,
    /// Account name used in xAPI statements.
    pub id: Uuid,
    pub username: String,
    pub language: String,
    pub country: String,
    pub year_of_birth: u16,
}

impl Actor {
    /// Create an actor with a random id and profile.
    pub fn new<R: Rng>(rng: &mut R, number: usize) -> Self {
        let id = generate_uuid_v4(rng);
        Self {
            number,
            id,
            username: format!("learner_{number}"),
            language: LANGUAGES[rng.gen_range(0..LANGUAGES.len())].to_string(),
            country: COUNTRIES[rng.gen_range(0..COUNTRIES.len())].to_string(),
            year_of_birth: rng.gen_range(1950..=2010),
        }
    }

    /// Profile row for the analytics store.
    pub fn profile(&self, dump_id: Uuid, dumped_at: DateTime<Utc>) -> UserProfile {
        UserProfile {
            user_id: self.number as u64 + 1,
            external_user_id: self.id,
            username: self.username.clone(),
            name: format!("Learner {}", self.number),
            email: format!("{}@aspects.invalid", self.username),
            language: self.language.clone(),
            country: self.country.clone(),
            year_of_birth: self.year_of_birth,
            dump_id,
            time_last_dumped: dumped_at,
        }
    }
}

/// Known objects and date window of one synthetic course run.
#[derive(Debug, Clone)]
pub struct Course {
    /// Owning organization.
    pub org: String,
    /// Course key, e.g. `course-v1:Org0+DemoX+<uuid>`.
    pub course_id: String,
    /// Course URL used as the xAPI parent activity.
    pub course_url: String,
    pub display_name: String,
    pub self_paced: bool,
    /// First moment events may be emitted.
    pub start: DateTime<Utc>,
    /// Last moment events may be emitted.
    pub end: DateTime<Utc>,
    /// Actors enrolled in this course.
    pub actors: Vec<Uuid>,
    /// Problem block ids.
    pub problem_ids: Vec<String>,
    /// Video block ids.
    pub video_ids: Vec<String>,
    /// Subsection block ids, the targets of navigation.
    pub sequential_ids: Vec<String>,
}

impl Course {
    /// Build a course for `org` with a random start inside the configured window.
    ///
    /// `latest_start_offset` is the number of days after `window_start` the
    /// course may start at and still end before the window closes.
    pub fn random<R: Rng>(
        rng: &mut R,
        org: &str,
        window_start: DateTime<Utc>,
        latest_start_offset: i64,
        length_days: u32,
        all_actors: &[Actor],
    ) -> Self {
        let course_uuid = generate_uuid_v4(rng);
        let course_id = format!("course-v1:{org}+DemoX+{course_uuid}");
        let course_url = format!("{LMS_BASE_URL}/course/{course_id}");
        let display_name = format!("Course {}", &course_uuid.simple().to_string()[..5]);

        let offset = rng.gen_range(0..=latest_start_offset.max(0));
        let start = window_start + Duration::days(offset);
        let end = start + Duration::days(i64::from(length_days.max(1)));

        let enrolled = rng.gen_range(1..=all_actors.len().max(1));
        let actors = all_actors
            .choose_multiple(rng, enrolled)
            .map(|a| a.id)
            .collect();

        let problem_ids = (0..rng.gen_range(10..=20))
            .map(|_| block_id(rng, org, &course_uuid, "problem"))
            .collect();
        let video_ids = (0..rng.gen_range(5..=10))
            .map(|_| block_id(rng, org, &course_uuid, "video"))
            .collect();
        let sequential_ids = (0..rng.gen_range(5..=10))
            .map(|_| block_id(rng, org, &course_uuid, "sequential"))
            .collect();
        let self_paced = rng.gen_bool(0.5);

        Self {
            org: org.to_string(),
            course_id,
            course_url,
            display_name,
            self_paced,
            start,
            end,
            actors,
            problem_ids,
            video_ids,
            sequential_ids,
        }
    }

    /// Pick an enrolled actor.
    pub fn random_actor<R: Rng>(&self, rng: &mut R) -> Uuid {
        self.actors.choose(rng).copied().unwrap_or_default()
    }

    /// Pick a problem block.
    pub fn random_problem<R: Rng>(&self, rng: &mut R) -> String {
        self.problem_ids.choose(rng).cloned().unwrap_or_default()
    }

    /// Pick a video block.
    pub fn random_video<R: Rng>(&self, rng: &mut R) -> String {
        self.video_ids.choose(rng).cloned().unwrap_or_default()
    }

    /// Pick a subsection.
    pub fn random_sequential<R: Rng>(&self, rng: &mut R) -> String {
        self.sequential_ids.choose(rng).cloned().unwrap_or_default()
    }

    /// Pick a time inside the course window.
    pub fn random_emission_time<R: Rng>(&self, rng: &mut R) -> DateTime<Utc> {
        random_time_between(rng, self.start, self.end)
    }

    /// Course overview row for the analytics store.
    pub fn overview(&self, dump_id: Uuid, dumped_at: DateTime<Utc>) -> CourseOverview {
        CourseOverview {
            org: self.org.clone(),
            course_key: self.course_id.clone(),
            display_name: self.display_name.clone(),
            course_start: self.start,
            course_end: self.end,
            enrollment_start: self.start,
            enrollment_end: self.end,
            self_paced: self.self_paced,
            course_data_json: "{}".to_string(),
            created: self.start,
            modified: self.end,
            dump_id,
            time_last_dumped: dumped_at,
        }
    }

    /// One row per block: videos, problems and subsections in that order,
    /// then the course block itself.
    pub fn blocks(&self, dump_id: Uuid, dumped_at: DateTime<Utc>) -> Vec<CourseBlock> {
        let typed = self
            .video_ids
            .iter()
            .map(|id| ("Video", id))
            .chain(self.problem_ids.iter().map(|id| ("Problem", id)))
            .chain(self.sequential_ids.iter().map(|id| ("Sequential", id)));

        let mut blocks: Vec<CourseBlock> = typed
            .enumerate()
            .map(|(i, (block_type, id))| {
                let order = i as u32 + 1;
                CourseBlock {
                    org: self.org.clone(),
                    course_key: self.course_id.clone(),
                    location: id.rsplit("/xblock/").next().unwrap_or_default().to_string(),
                    display_name: format!("{block_type} {order}"),
                    xblock_data_json: "{}".to_string(),
                    order,
                    edited_on: self.end,
                    dump_id,
                    time_last_dumped: dumped_at,
                }
            })
            .collect();

        let key = self.course_id.trim_start_matches("course-v1:");
        blocks.push(CourseBlock {
            org: self.org.clone(),
            course_key: self.course_id.clone(),
            location: format!("block-v1:{key}+type@course+block@course"),
            display_name: self.display_name.clone(),
            xblock_data_json: "{}".to_string(),
            order: 1,
            edited_on: self.end,
            dump_id,
            time_last_dumped: dumped_at,
        });
        blocks
    }
}

/// Midnight UTC of `date`.
pub(crate) fn start_of_day(date: chrono::NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}

fn block_id<R: Rng>(rng: &mut R, org: &str, course_uuid: &Uuid, block_type: &str) -> String {
    let block = generate_uuid_v4(rng).simple();
    format!("{LMS_BASE_URL}/xblock/block-v1:{org}+DemoX+{course_uuid}+type@{block_type}+block@{block}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn actors(rng: &mut StdRng, n: usize) -> Vec<Actor> {
        (0..n).map(|i| Actor::new(rng, i)).collect()
    }

    #[test]
    fn test_course_window_and_objects() {
        let mut rng = StdRng::seed_from_u64(42);
        let all = actors(&mut rng, 20);
        let window_start = start_of_day(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());

        let course = Course::random(&mut rng, "Org0", window_start, 245, 120, &all);

        assert!(course.course_id.starts_with("course-v1:Org0+DemoX+"));
        assert!(course.course_url.ends_with(&course.course_id));
        assert!(course.start >= window_start);
        assert_eq!(course.end - course.start, Duration::days(120));
        assert!(!course.actors.is_empty() && course.actors.len() <= 20);
        assert!((10..=20).contains(&course.problem_ids.len()));
        assert!((5..=10).contains(&course.video_ids.len()));
        assert!((5..=10).contains(&course.sequential_ids.len()));
        assert!(course.display_name.starts_with("Course "));
    }

    #[test]
    fn test_blocks_cover_every_known_object() {
        let mut rng = StdRng::seed_from_u64(3);
        let all = actors(&mut rng, 5);
        let window_start = start_of_day(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        let course = Course::random(&mut rng, "Org0", window_start, 30, 60, &all);
        let dumped_at = course.end;

        let blocks = course.blocks(Uuid::nil(), dumped_at);

        let known = course.video_ids.len() + course.problem_ids.len() + course.sequential_ids.len();
        assert_eq!(blocks.len(), known + 1);
        assert_eq!(blocks[0].display_name, "Video 1");
        assert!(blocks[0].location.starts_with("block-v1:Org0+DemoX+"));
        assert!(blocks[0].location.contains("+type@video+"));
        let course_block = blocks.last().unwrap();
        assert!(course_block.location.ends_with("+type@course+block@course"));
        assert_eq!(course_block.display_name, course.display_name);
        assert!(blocks.iter().all(|b| b.course_key == course.course_id));
    }

    #[test]
    fn test_overview_and_profile() {
        let mut rng = StdRng::seed_from_u64(5);
        let all = actors(&mut rng, 2);
        let window_start = start_of_day(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        let course = Course::random(&mut rng, "Org1", window_start, 10, 30, &all);

        let overview = course.overview(Uuid::nil(), course.end);
        assert_eq!(overview.course_key, course.course_id);
        assert_eq!(overview.course_start, course.start);
        assert_eq!(overview.course_data_json, "{}");

        let profile = all[1].profile(Uuid::nil(), course.end);
        assert_eq!(profile.user_id, 2);
        assert_eq!(profile.external_user_id, all[1].id);
        assert_eq!(profile.email, "learner_1@aspects.invalid");
        assert!((1950..=2010).contains(&profile.year_of_birth));
    }

    #[test]
    fn test_emission_time_inside_course() {
        let mut rng = StdRng::seed_from_u64(1);
        let all = actors(&mut rng, 3);
        let window_start = start_of_day(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        let course = Course::random(&mut rng, "Org1", window_start, 10, 30, &all);

        for _ in 0..100 {
            let t = course.random_emission_time(&mut rng);
            assert!(t >= course.start && t <= course.end);
        }
    }

    #[test]
    fn test_random_actor_is_enrolled() {
        let mut rng = StdRng::seed_from_u64(9);
        let all = actors(&mut rng, 10);
        let window_start = start_of_day(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        let course = Course::random(&mut rng, "Org2", window_start, 0, 1, &all);

        let actor = course.random_actor(&mut rng);
        assert!(course.actors.contains(&actor));
    }
}
