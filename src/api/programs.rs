//! School programs API endpoints
//!
//! Read-only: the program catalog is static and booked through the contact
//! channel, so there is nothing to authenticate or persist.

use axum::extract::Query;
use serde::Deserialize;
use serde::Serialize;

use crate::programs;
use crate::programs::Category;
use crate::programs::Program;

use super::Error;
use super::Success;

/// One stop on a program itinerary
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryStopResponse {
    pub time: &'static str,
    pub activity: &'static str,
}

/// Program response going to the user
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramResponse {
    pub id: u32,
    pub title: &'static str,
    pub category: &'static str,
    pub duration: &'static str,
    pub locations: &'static [&'static str],
    pub description: &'static str,
    pub skills: &'static [&'static str],
    pub subjects: &'static [&'static str],
    pub suitable_for: &'static [&'static str],
    pub itinerary: Vec<ItineraryStopResponse>,
}

impl ProgramResponse {
    /// Create a response from a [`Program`](Program)
    fn from_program(program: &Program) -> Self {
        Self {
            id: program.id,
            title: program.title,
            category: match program.category {
                Category::Heritage => "heritage",
                Category::Industry => "industry",
                Category::Entrepreneurship => "entrepreneurship",
            },
            duration: program.duration,
            locations: program.locations,
            description: program.description,
            skills: program.skills,
            subjects: program.subjects,
            suitable_for: program.suitable_for,
            itinerary: program
                .itinerary
                .iter()
                .map(|stop| ItineraryStopResponse {
                    time: stop.time,
                    activity: stop.activity,
                })
                .collect(),
        }
    }
}

/// Program list query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Only programs suitable for this grade level, e.g. "8th"
    grade: Option<String>,
}

/// List programs, optionally filtered by grade level
///
/// An unknown grade matches nothing, it is not an error.
///
/// Request:
/// ```sh
/// curl -v 'http://localhost:7000/api/programs?grade=8th'
/// ```
pub async fn list(
    Query(query): Query<ListQuery>,
) -> Result<Success<Vec<ProgramResponse>>, Error> {
    let programs = match &query.grade {
        Some(grade) => programs::for_grade(grade),
        None => programs::catalog().iter().collect(),
    };

    Ok(Success::ok(
        programs
            .into_iter()
            .map(ProgramResponse::from_program)
            .collect::<Vec<ProgramResponse>>(),
    ))
}

/// List the grade levels programs can be filtered by
///
/// Request:
/// ```sh
/// curl -v http://localhost:7000/api/programs/grades
/// ```
pub async fn grades() -> Result<Success<Vec<&'static str>>, Error> {
    Ok(Success::ok(programs::GRADE_LEVELS.to_vec()))
}
