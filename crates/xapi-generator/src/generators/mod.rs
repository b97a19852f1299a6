//! Individual value generators and the weighted event mix.
//!
//! This module decides which kind of xAPI event to emit next and builds the
//! statement body for it.

pub mod timestamp;
pub mod uuid;
pub mod xapi;

/// Kinds of learner activity the generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Registered,
    Unregistered,
    LoadedVideo,
    PlayedVideo,
    PausedVideo,
    StoppedVideo,
    PositionChangedVideo,
    CompletedVideo,
    TranscriptEnabled,
    TranscriptDisabled,
    BrowserProblemCheck,
    ServerProblemCheck,
    NextNavigation,
    PreviousNavigation,
    TabSelectedNavigation,
    LinkClicked,
    FirstTimePassed,
    CourseGradeCalculated,
    ShowHint,
    ShowAnswer,
    PostCreated,
}

/// What a statement's `object` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    /// The course run itself.
    Course,
    Video,
    Problem,
    /// A subsection of the course.
    Sequential,
    /// A link inside course content.
    Link,
    /// A discussion thread.
    Thread,
}

/// Share of total statements for each event kind, roughly summing to 100.
pub const EVENT_WEIGHTS: &[(EventKind, f64)] = &[
    (EventKind::Registered, 1.138),
    (EventKind::Unregistered, 0.146),
    (EventKind::CompletedVideo, 5.124),
    (EventKind::LoadedVideo, 7.125),
    (EventKind::PlayedVideo, 24.019),
    (EventKind::PausedVideo, 14.912),
    (EventKind::StoppedVideo, 3.671),
    (EventKind::PositionChangedVideo, 12.105),
    (EventKind::BrowserProblemCheck, 8.226),
    (EventKind::ServerProblemCheck, 8.593),
    (EventKind::NextNavigation, 6.05),
    (EventKind::PreviousNavigation, 0.811),
    (EventKind::TabSelectedNavigation, 0.001),
    (EventKind::LinkClicked, 0.001),
    (EventKind::FirstTimePassed, 0.031),
    (EventKind::ShowHint, 0.076),
    (EventKind::ShowAnswer, 1.373),
    (EventKind::TranscriptEnabled, 0.05),
    (EventKind::TranscriptDisabled, 0.05),
    (EventKind::CourseGradeCalculated, 1.5),
    (EventKind::PostCreated, 0.5),
];

pub const VERB_REGISTERED: &str = "http://adlnet.gov/expapi/verbs/registered";
pub const VERB_UNREGISTERED: &str = "http://id.tincanapi.com/verb/unregistered";
const VERB_NAVIGATED: &str = "https://w3id.org/xapi/dod-isd/verbs/navigated";
const VERB_ASKED: &str = "http://adlnet.gov/expapi/verbs/asked";

impl EventKind {
    /// Verb IRI of the statement.
    pub fn verb(self) -> &'static str {
        match self {
            EventKind::Registered => VERB_REGISTERED,
            EventKind::Unregistered => VERB_UNREGISTERED,
            EventKind::LoadedVideo => "http://adlnet.gov/expapi/verbs/initialized",
            EventKind::PlayedVideo => "https://w3id.org/xapi/video/verbs/played",
            EventKind::PausedVideo => "https://w3id.org/xapi/video/verbs/paused",
            EventKind::StoppedVideo => "http://adlnet.gov/expapi/verbs/terminated",
            EventKind::PositionChangedVideo => "https://w3id.org/xapi/video/verbs/seeked",
            EventKind::CompletedVideo => "http://adlnet.gov/expapi/verbs/completed",
            EventKind::TranscriptEnabled | EventKind::TranscriptDisabled => {
                "http://adlnet.gov/expapi/verbs/interacted"
            }
            EventKind::BrowserProblemCheck => "http://adlnet.gov/expapi/verbs/attempted",
            EventKind::ServerProblemCheck => "https://w3id.org/xapi/acrossx/verbs/evaluated",
            EventKind::NextNavigation
            | EventKind::PreviousNavigation
            | EventKind::TabSelectedNavigation
            | EventKind::LinkClicked => VERB_NAVIGATED,
            EventKind::FirstTimePassed => "http://adlnet.gov/expapi/verbs/passed",
            EventKind::CourseGradeCalculated => "http://id.tincanapi.com/verb/earned",
            EventKind::ShowHint | EventKind::ShowAnswer => VERB_ASKED,
            EventKind::PostCreated => "https://w3id.org/xapi/acrossx/verbs/posted",
        }
    }

    /// Human readable verb, the last path segment of the IRI.
    pub fn verb_display(self) -> &'static str {
        self.verb().rsplit('/').next().unwrap_or_default()
    }

    /// The kind of object the statement is about.
    pub fn target(self) -> EventTarget {
        match self {
            EventKind::Registered
            | EventKind::Unregistered
            | EventKind::FirstTimePassed
            | EventKind::CourseGradeCalculated => EventTarget::Course,
            EventKind::LoadedVideo
            | EventKind::PlayedVideo
            | EventKind::PausedVideo
            | EventKind::StoppedVideo
            | EventKind::PositionChangedVideo
            | EventKind::CompletedVideo
            | EventKind::TranscriptEnabled
            | EventKind::TranscriptDisabled => EventTarget::Video,
            EventKind::BrowserProblemCheck
            | EventKind::ServerProblemCheck
            | EventKind::ShowHint
            | EventKind::ShowAnswer => EventTarget::Problem,
            EventKind::NextNavigation
            | EventKind::PreviousNavigation
            | EventKind::TabSelectedNavigation => EventTarget::Sequential,
            EventKind::LinkClicked => EventTarget::Link,
            EventKind::PostCreated => EventTarget::Thread,
        }
    }
}
