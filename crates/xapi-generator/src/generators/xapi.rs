//! xAPI statement bodies.

use super::{EventKind, EventTarget};
use crate::course::LMS_BASE_URL;
use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use serde_json::{json, Value};
use uuid::Uuid;

const EVENT_VERSION_EXT: &str =
    "https://github.com/openedx/event-routing-backends/blob/master/docs/xapi-extensions/eventVersion.rst";

/// Inputs shared by every statement kind.
pub struct StatementContext<'a> {
    pub event_id: Uuid,
    pub actor_id: Uuid,
    pub course_url: &'a str,
    pub emission_time: DateTime<Utc>,
    /// Block, link or thread the statement is about, if any.
    pub object_id: Option<&'a str>,
    /// Number of navigable units in the course.
    pub units_in_course: usize,
}

/// Build the full xAPI statement for `kind`.
pub fn build_statement<R: Rng>(rng: &mut R, kind: EventKind, ctx: &StatementContext<'_>) -> Value {
    let mut statement = json!({
        "id": ctx.event_id.to_string(),
        "actor": {
            "objectType": "Agent",
            "account": {"homePage": LMS_BASE_URL, "name": ctx.actor_id.to_string()},
        },
        "context": {
            "contextActivities": {
                "parent": [{
                    "id": ctx.course_url,
                    "objectType": "Activity",
                    "definition": {
                        "name": {"en-US": "Demonstration Course"},
                        "type": "http://adlnet.gov/expapi/activities/course",
                    },
                }]
            },
            "extensions": {EVENT_VERSION_EXT: "1.0"},
        },
        "timestamp": ctx.emission_time.to_rfc3339_opts(SecondsFormat::Micros, true),
        "verb": {"display": {"en": kind.verb_display()}, "id": kind.verb()},
        "version": "1.0.3",
    });

    let body = match kind.target() {
        EventTarget::Course => match kind {
            EventKind::FirstTimePassed => passed_parts(ctx),
            EventKind::CourseGradeCalculated => grade_parts(rng, ctx),
            _ => registration_parts(rng, ctx),
        },
        EventTarget::Video => video_parts(rng, kind, ctx),
        EventTarget::Problem => match kind {
            EventKind::ShowHint | EventKind::ShowAnswer => hint_answer_parts(kind, ctx),
            _ => problem_parts(rng, kind, ctx),
        },
        EventTarget::Sequential => navigation_parts(rng, kind, ctx),
        EventTarget::Link => link_parts(ctx),
        EventTarget::Thread => forum_parts(rng, ctx),
    };

    if let (Some(target), Value::Object(parts)) = (statement.as_object_mut(), body) {
        target.extend(parts);
    }
    statement
}

fn registration_parts<R: Rng>(rng: &mut R, ctx: &StatementContext<'_>) -> Value {
    let mode = ["audit", "honor", "verified"][rng.gen_range(0..3)];
    json!({
        "object": {
            "definition": {
                "extensions": {"https://w3id.org/xapi/acrossx/extensions/type": mode},
                "type": "http://adlnet.gov/expapi/activities/course",
            },
            "id": ctx.course_url,
            "objectType": "Activity",
        }
    })
}

fn video_parts<R: Rng>(rng: &mut R, kind: EventKind, ctx: &StatementContext<'_>) -> Value {
    let length = 195.0;
    let position = (rng.gen_range(0.0..length) * 1000.0_f64).round() / 1000.0;
    let mut result = json!({
        "extensions": {"https://w3id.org/xapi/video/extensions/time": position}
    });
    if matches!(
        kind,
        EventKind::TranscriptEnabled | EventKind::TranscriptDisabled
    ) {
        result["extensions"]["https://w3id.org/xapi/video/extensions/cc-enabled"] =
            Value::Bool(kind == EventKind::TranscriptEnabled);
    }
    json!({
        "object": {
            "definition": {"type": "https://w3id.org/xapi/video/activity-type/video"},
            "id": ctx.object_id.unwrap_or_default(),
            "objectType": "Activity",
        },
        "result": result,
    })
}

fn problem_parts<R: Rng>(rng: &mut R, kind: EventKind, ctx: &StatementContext<'_>) -> Value {
    let problem_id = ctx.object_id.unwrap_or_default();
    if kind == EventKind::BrowserProblemCheck {
        return json!({
            "object": {
                "definition": {"type": "http://adlnet.gov/expapi/activities/cmi.interaction"},
                "id": problem_id,
                "objectType": "Activity",
            }
        });
    }

    let success = rng.gen_bool(0.5);
    let response = if success {
        "A correct answer"
    } else {
        "An incorrect answer"
    };
    let raw = u8::from(success);
    json!({
        "object": {
            "definition": {
                "extensions": {"http://id.tincanapi.com/extension/attempt-id": 10},
                "description": {
                    "en-US": "Add the question text, or prompt, here. This text is required."
                },
                "interactionType": "other",
                "type": "http://adlnet.gov/expapi/activities/cmi.interaction",
            },
            "id": problem_id,
            "objectType": "Activity",
        },
        "result": {
            "response": response,
            "score": {"max": 1, "min": 0, "raw": raw, "scaled": raw},
            "success": success,
        },
    })
}

fn passed_parts(ctx: &StatementContext<'_>) -> Value {
    json!({
        "object": {
            "definition": {"type": "http://adlnet.gov/expapi/activities/course"},
            "id": ctx.course_url,
            "objectType": "Activity",
        },
        "result": {"success": true},
    })
}

fn grade_parts<R: Rng>(rng: &mut R, ctx: &StatementContext<'_>) -> Value {
    let scaled = (rng.gen_range(0.0..=1.0) * 100.0_f64).round() / 100.0;
    json!({
        "object": {
            "definition": {"type": "http://adlnet.gov/expapi/activities/course"},
            "id": ctx.course_url,
            "objectType": "Activity",
        },
        "result": {
            "score": {"max": 1, "min": 0, "raw": scaled, "scaled": scaled},
            "success": scaled >= 0.5,
        },
    })
}

fn hint_answer_parts(kind: EventKind, ctx: &StatementContext<'_>) -> Value {
    let problem_id = ctx.object_id.unwrap_or_default();
    let suffix = if kind == EventKind::ShowHint {
        "hint/1"
    } else {
        "answer"
    };
    json!({
        "object": {
            "definition": {"type": "http://id.tincanapi.com/activitytype/solution"},
            "id": format!("{problem_id}/{suffix}"),
            "objectType": "Activity",
        }
    })
}

fn navigation_parts<R: Rng>(rng: &mut R, kind: EventKind, ctx: &StatementContext<'_>) -> Value {
    let units = ctx.units_in_course.max(2);
    let (from, to) = match kind {
        EventKind::NextNavigation => {
            let from = rng.gen_range(1..units);
            (from, from + 1)
        }
        EventKind::PreviousNavigation => {
            let from = rng.gen_range(2..=units);
            (from, from - 1)
        }
        _ => (rng.gen_range(1..=units), rng.gen_range(1..=units)),
    };
    json!({
        "object": {
            "definition": {
                "extensions": {
                    "http://id.tincanapi.com/extension/starting-position": from,
                    "http://id.tincanapi.com/extension/ending-point": to,
                },
                "type": "http://adlnet.gov/expapi/activities/module",
            },
            "id": ctx.object_id.unwrap_or_default(),
            "objectType": "Activity",
        }
    })
}

fn link_parts(ctx: &StatementContext<'_>) -> Value {
    json!({
        "object": {
            "definition": {"type": "http://adlnet.gov/expapi/activities/link"},
            "id": ctx.object_id.unwrap_or_default(),
            "objectType": "Activity",
        }
    })
}

fn forum_parts<R: Rng>(rng: &mut R, ctx: &StatementContext<'_>) -> Value {
    let kind = ["discussion", "question"][rng.gen_range(0..2)];
    json!({
        "object": {
            "definition": {
                "extensions": {"https://w3id.org/xapi/acrossx/extensions/type": kind},
                "type": "http://id.tincanapi.com/activitytype/discussion",
            },
            "id": ctx.object_id.unwrap_or_default(),
            "objectType": "Activity",
        }
    })
}
