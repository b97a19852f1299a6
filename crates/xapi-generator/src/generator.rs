//! Main statement generator.

use crate::config::GeneratorConfig;
use crate::course::{start_of_day, Actor, Course, LMS_BASE_URL};
use crate::generators::uuid::generate_uuid_v4;
use crate::generators::xapi::{build_statement, StatementContext};
use crate::generators::{EventKind, EventTarget, EVENT_WEIGHTS};
use crate::metadata::{Metadata, QueryTargets};
use crate::statement::Statement;
use crate::StatementSource;
use chrono::Utc;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use uuid::Uuid;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The population configuration is inconsistent.
    #[error("Invalid generator configuration: {0}")]
    InvalidConfig(String),

    /// The event weight table cannot be sampled.
    #[error("Invalid event weights: {0}")]
    Weights(#[from] rand::distributions::WeightedError),
}

/// Generator that produces deterministic xAPI statements.
///
/// Actors, organizations and courses are set up once in [`StatementGenerator::new`];
/// statements then pick a weighted event kind, a course, an enrolled actor and
/// an emission time inside the course window.
pub struct StatementGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    actors: Vec<Actor>,
    orgs: Vec<String>,
    courses: Vec<Course>,
    kinds: WeightedIndex<f64>,
    /// Index of the next statement
    index: u64,
}

impl StatementGenerator {
    /// Validate the configuration and build the synthetic population.
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let kinds = WeightedIndex::new(EVENT_WEIGHTS.iter().map(|(_, w)| *w))?;

        let orgs: Vec<String> = (0..config.num_organizations)
            .map(|i| format!("Org{i}"))
            .collect();
        let actors: Vec<Actor> = (0..config.num_actors)
            .map(|i| Actor::new(&mut rng, i))
            .collect();

        let window_start = start_of_day(config.start_date);
        let latest_start_offset = config.span_days() - i64::from(config.course_length_days);
        let mut courses = Vec::with_capacity(config.num_courses);
        for _ in 0..config.num_courses {
            let org = orgs.choose(&mut rng).cloned().unwrap_or_default();
            courses.push(Course::random(
                &mut rng,
                &org,
                window_start,
                latest_start_offset,
                config.course_length_days,
                &actors,
            ));
        }

        info!(
            "Set up {} organizations, {} actors and {} courses (seed={})",
            orgs.len(),
            actors.len(),
            courses.len(),
            config.seed
        );
        for course in &courses {
            debug!(
                "{} ({} - {}): {} actors, {} problems, {} videos",
                course.course_id,
                course.start,
                course.end,
                course.actors.len(),
                course.problem_ids.len(),
                course.video_ids.len()
            );
        }

        Ok(Self {
            config,
            rng,
            actors,
            orgs,
            courses,
            kinds,
            index: 0,
        })
    }

    /// Get the current statement index.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    /// Get the configuration this generator was built from.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// All synthetic actors.
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// All synthetic organizations.
    pub fn orgs(&self) -> &[String] {
        &self.orgs
    }

    /// All synthetic courses.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Generate the next statement.
    pub fn next_statement(&mut self) -> Statement {
        let kind = EVENT_WEIGHTS[self.kinds.sample(&mut self.rng)].0;
        let course_idx = self.rng.gen_range(0..self.courses.len());
        self.build(kind, course_idx, None)
    }

    /// Number of statements [`StatementGenerator::enrollment_statements`] yields.
    pub fn enrollment_count(&self) -> usize {
        self.courses.iter().map(|c| c.actors.len()).sum()
    }

    fn build(&mut self, kind: EventKind, course_idx: usize, actor: Option<Uuid>) -> Statement {
        let course = &self.courses[course_idx];

        let event_id = generate_uuid_v4(&mut self.rng);
        let actor_id = match actor {
            Some(id) => id,
            None => course.random_actor(&mut self.rng),
        };
        let emission_time = course.random_emission_time(&mut self.rng);
        let object_id = match kind.target() {
            EventTarget::Course => None,
            EventTarget::Video => Some(course.random_video(&mut self.rng)),
            EventTarget::Problem => Some(course.random_problem(&mut self.rng)),
            EventTarget::Sequential => Some(course.random_sequential(&mut self.rng)),
            EventTarget::Link => Some(format!(
                "https://example.com/links/{}",
                generate_uuid_v4(&mut self.rng).simple()
            )),
            EventTarget::Thread => Some(format!(
                "{LMS_BASE_URL}/api/discussion/v1/threads/{}",
                generate_uuid_v4(&mut self.rng).simple()
            )),
        };

        let ctx = StatementContext {
            event_id,
            actor_id,
            course_url: &course.course_url,
            emission_time,
            object_id: object_id.as_deref(),
            units_in_course: course.sequential_ids.len(),
        };
        let event = build_statement(&mut self.rng, kind, &ctx);

        let statement = Statement {
            index: self.index,
            event_id,
            verb: kind.verb().to_string(),
            actor_id,
            org: course.org.clone(),
            course_run_id: course.course_url.clone(),
            emission_time,
            event,
        };
        self.index += 1;
        statement
    }
}

impl StatementSource for StatementGenerator {
    fn next_batch(&mut self, size: usize) -> Result<Vec<Statement>, GeneratorError> {
        Ok((0..size).map(|_| self.next_statement()).collect())
    }

    fn metadata(&self) -> Metadata {
        let dump_id = Uuid::new_v4();
        let dumped_at = Utc::now();
        Metadata {
            courses: self
                .courses
                .iter()
                .map(|c| c.overview(dump_id, dumped_at))
                .collect(),
            blocks: self
                .courses
                .iter()
                .flat_map(|c| c.blocks(dump_id, dumped_at))
                .collect(),
            profiles: self
                .actors
                .iter()
                .map(|a| a.profile(dump_id, dumped_at))
                .collect(),
        }
    }

    /// Registrations in course order, each course's enrolled actors in turn.
    fn enrollment_statements(&mut self) -> Result<Vec<Statement>, GeneratorError> {
        let enrolled: Vec<(usize, Uuid)> = self
            .courses
            .iter()
            .enumerate()
            .flat_map(|(i, c)| c.actors.iter().map(move |a| (i, *a)))
            .collect();
        Ok(enrolled
            .into_iter()
            .map(|(course_idx, actor)| self.build(EventKind::Registered, course_idx, Some(actor)))
            .collect())
    }

    /// Courses are visited round robin; no randomness is consumed.
    fn query_targets(&self, round: u64) -> Option<QueryTargets> {
        let course = self.courses.get(round as usize % self.courses.len().max(1))?;
        let actor_id = *course.actors.get(round as usize % course.actors.len().max(1))?;
        Some(QueryTargets {
            course_url: course.course_url.clone(),
            org: course.org.clone(),
            actor_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig::default()
            .with_seed(42)
            .with_num_actors(10)
            .with_num_courses(3)
    }

    #[test]
    fn test_population_setup() {
        let generator = StatementGenerator::new(small_config()).unwrap();

        assert_eq!(generator.actors().len(), 10);
        assert_eq!(generator.courses().len(), 3);
        assert_eq!(generator.orgs(), ["Org0", "Org1", "Org2"]);
        for course in generator.courses() {
            assert!(generator.orgs().contains(&course.org));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = StatementGenerator::new(small_config().with_num_courses(0));
        assert!(matches!(result, Err(GeneratorError::InvalidConfig(_))));
    }

    #[test]
    fn test_batch_size_and_sequential_indices() {
        let mut generator = StatementGenerator::new(small_config()).unwrap();

        let first = generator.next_batch(5).unwrap();
        let second = generator.next_batch(5).unwrap();

        assert_eq!(first.len(), 5);
        assert_eq!(second.len(), 5);
        let indices: Vec<u64> = first.iter().chain(&second).map(|s| s.index).collect();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
        assert_eq!(generator.current_index(), 10);
    }

    #[test]
    fn test_deterministic_generation() {
        let mut gen1 = StatementGenerator::new(small_config()).unwrap();
        let mut gen2 = StatementGenerator::new(small_config()).unwrap();

        assert_eq!(gen1.next_batch(20).unwrap(), gen2.next_batch(20).unwrap());
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut gen1 = StatementGenerator::new(small_config()).unwrap();
        let mut gen2 = StatementGenerator::new(small_config().with_seed(43)).unwrap();

        assert_ne!(
            gen1.next_statement().event_id,
            gen2.next_statement().event_id
        );
    }

    #[test]
    fn test_statement_consistency() {
        let mut generator = StatementGenerator::new(small_config()).unwrap();

        for statement in generator.next_batch(50).unwrap() {
            assert_eq!(statement.event["id"], statement.event_id.to_string());
            assert_eq!(statement.event["verb"]["id"], statement.verb.as_str());
            assert_eq!(
                statement.event["actor"]["account"]["name"],
                statement.actor_id.to_string()
            );
            assert!(statement.course_run_id.contains(&statement.org));
        }
    }

    #[test]
    fn test_enrollment_registers_every_enrolled_actor() {
        let mut generator = StatementGenerator::new(small_config()).unwrap();
        let expected = generator.enrollment_count();

        let enrollments = generator.enrollment_statements().unwrap();

        assert_eq!(enrollments.len(), expected);
        assert!(enrollments.iter().all(|s| s.verb == EventKind::Registered.verb()));
        let first_course = &generator.courses()[0];
        for (statement, actor) in enrollments.iter().zip(&first_course.actors) {
            assert_eq!(statement.actor_id, *actor);
            assert_eq!(statement.course_run_id, first_course.course_url);
        }
        let indices: Vec<u64> = enrollments.iter().map(|s| s.index).collect();
        assert_eq!(indices, (0..expected as u64).collect::<Vec<_>>());
        assert_eq!(generator.next_statement().index, expected as u64);
    }

    #[test]
    fn test_metadata_covers_population() {
        let generator = StatementGenerator::new(small_config()).unwrap();

        let metadata = generator.metadata();

        assert_eq!(metadata.courses.len(), 3);
        assert_eq!(metadata.profiles.len(), 10);
        let block_count: usize = generator
            .courses()
            .iter()
            .map(|c| c.video_ids.len() + c.problem_ids.len() + c.sequential_ids.len() + 1)
            .sum();
        assert_eq!(metadata.blocks.len(), block_count);
        let dump_id = metadata.courses[0].dump_id;
        assert!(metadata.blocks.iter().all(|b| b.dump_id == dump_id));
        assert!(metadata.profiles.iter().all(|p| p.dump_id == dump_id));
    }

    #[test]
    fn test_metadata_leaves_statements_unchanged() {
        let mut gen1 = StatementGenerator::new(small_config()).unwrap();
        let mut gen2 = StatementGenerator::new(small_config()).unwrap();

        let _ = gen1.metadata();
        let _ = gen1.query_targets(3);

        assert_eq!(gen1.next_batch(10).unwrap(), gen2.next_batch(10).unwrap());
    }

    #[test]
    fn test_query_targets_rotate_courses() {
        let generator = StatementGenerator::new(small_config()).unwrap();

        let first = generator.query_targets(0).unwrap();
        let fourth = generator.query_targets(3).unwrap();
        let second = generator.query_targets(1).unwrap();

        let course = &generator.courses()[0];
        assert_eq!(first.course_url, course.course_url);
        assert_eq!(first.org, course.org);
        assert!(course.actors.contains(&first.actor_id));
        assert_eq!(fourth.course_url, first.course_url);
        assert_eq!(second.course_url, generator.courses()[1].course_url);
    }

    #[test]
    fn test_every_target_gets_an_object() {
        let mut generator = StatementGenerator::new(small_config()).unwrap();

        for statement in generator.next_batch(500).unwrap() {
            let object_id = statement.event["object"]["id"].as_str().unwrap_or_default();
            assert!(!object_id.is_empty(), "{}", statement.event);
        }
    }
}
