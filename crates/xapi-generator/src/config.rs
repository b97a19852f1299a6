//! Configuration of the synthetic course population.

use crate::generator::GeneratorError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Shape of the synthetic population statements are generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Random seed for deterministic generation (same seed = same data).
    pub seed: u64,
    /// Number of distinct learners.
    pub num_actors: usize,
    /// Number of course runs.
    pub num_courses: usize,
    /// Number of organizations courses are spread across.
    pub num_organizations: usize,
    /// Earliest date any course may start.
    pub start_date: NaiveDate,
    /// Latest date any course may end.
    pub end_date: NaiveDate,
    /// Length of each course run in days.
    pub course_length_days: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            num_actors: 100,
            num_courses: 10,
            num_organizations: 3,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            course_length_days: 120,
        }
    }
}

impl GeneratorConfig {
    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of actors.
    pub fn with_num_actors(mut self, num_actors: usize) -> Self {
        self.num_actors = num_actors;
        self
    }

    /// Set the number of courses.
    pub fn with_num_courses(mut self, num_courses: usize) -> Self {
        self.num_courses = num_courses;
        self
    }

    /// Set the date window courses are placed in.
    pub fn with_dates(mut self, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    /// Set the course length in days.
    pub fn with_course_length_days(mut self, days: u32) -> Self {
        self.course_length_days = days;
        self
    }

    /// Number of days between `start_date` and `end_date`.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Make sure the given values make sense before any generation starts.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.num_actors == 0 {
            return Err(GeneratorError::InvalidConfig(
                "num_actors must be greater than 0".to_string(),
            ));
        }
        if self.num_courses == 0 {
            return Err(GeneratorError::InvalidConfig(
                "num_courses must be greater than 0".to_string(),
            ));
        }
        if self.num_organizations == 0 {
            return Err(GeneratorError::InvalidConfig(
                "num_organizations must be greater than 0".to_string(),
            ));
        }
        if self.start_date >= self.end_date {
            return Err(GeneratorError::InvalidConfig(
                "start_date must be before end_date".to_string(),
            ));
        }
        if self.span_days() < i64::from(self.course_length_days) {
            return Err(GeneratorError::InvalidConfig(format!(
                "the time between start_date and end_date ({} days) must be at least course_length_days ({})",
                self.span_days(),
                self.course_length_days
            )));
        }
        Ok(())
    }
}
