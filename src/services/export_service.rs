use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::{
    dao::{models::RoundEntity, rounds::RoundRepository, strokes::StrokeRepository},
    dto::format_timestamp,
    error::ServiceError,
    services::stats_service::CourseNames,
    state::session::Session,
};

const CSV_HEADER: [&str; 9] = [
    "round_id",
    "completed_at",
    "course",
    "holes_count",
    "hole_number",
    "seq",
    "stroke_type",
    "mental_ok",
    "club_id",
];

/// Quote a field when it holds a separator, a quote or a line break.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn line<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|field| escape(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Every counted stroke of the user's rounds as CSV, newest round first.
pub async fn export_csv(session: &Session) -> Result<String, ServiceError> {
    let rounds = RoundRepository::new(session).list_all().await?;
    let ids: Vec<Uuid> = rounds.iter().map(|round| round.id).collect();
    let mut strokes = StrokeRepository::new(session)
        .list_for_rounds(&ids, true)
        .await?;
    let names = CourseNames::load(session).await?;

    let by_id: HashMap<Uuid, &RoundEntity> = rounds.iter().map(|round| (round.id, round)).collect();
    let position: HashMap<Uuid, usize> = ids.iter().enumerate().map(|(index, id)| (*id, index)).collect();
    strokes.sort_by_key(|stroke| {
        (
            position.get(&stroke.round_id).copied().unwrap_or(usize::MAX),
            stroke.hole_number,
            stroke.seq,
        )
    });

    let mut lines = vec![line(CSV_HEADER)];
    for stroke in &strokes {
        let Some(round) = by_id.get(&stroke.round_id) else {
            continue;
        };
        lines.push(line([
            round.id.to_string(),
            round.completed_at.map(format_timestamp).unwrap_or_default(),
            names.name_of(round),
            round.holes_count.to_string(),
            stroke.hole_number.to_string(),
            stroke.seq.to_string(),
            stroke.stroke_type.as_str().to_string(),
            stroke.mental_ok.to_string(),
            stroke.club_id.map(|id| id.to_string()).unwrap_or_default(),
        ]));
    }

    debug!(rounds = rounds.len(), rows = lines.len() - 1, "csv export built");
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime};

    use super::*;
    use crate::{
        dao::{courses::CourseRepository, models::UserCourseEntity},
        domain::stroke::StrokeType,
        services::stats_service::tests::{completed_round, session},
    };

    #[test]
    fn fields_are_quoted_only_when_needed() {
        assert_eq!(escape("Pebble"), "Pebble");
        assert_eq!(escape("Oak, East"), "\"Oak, East\"");
        assert_eq!(escape("The \"Old\" Course"), "\"The \"\"Old\"\" Course\"");
    }

    #[tokio::test]
    async fn round_with_two_counted_strokes_exports_three_lines() {
        let session = session();
        let course = UserCourseEntity {
            id: Uuid::new_v4(),
            user_id: session.user_id(),
            course_name: "Oak, East".into(),
            club_name: None,
            holes_count: 18,
            is_default: true,
            created_at: OffsetDateTime::now_utc() - Duration::days(30),
        };
        CourseRepository::new(&session).insert(&course, &[]).await.unwrap();

        let round = completed_round(
            &session,
            OffsetDateTime::now_utc() - Duration::days(1),
            Some(course.id),
            &[(1, StrokeType::Tee, true), (1, StrokeType::Putt, false)],
        )
        .await;

        let csv = export_csv(&session).await.unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "round_id,completed_at,course,holes_count,hole_number,seq,stroke_type,mental_ok,club_id"
        );

        let completed_at = format_timestamp(round.completed_at.unwrap());
        assert_eq!(
            lines[1],
            format!("{},{completed_at},\"Oak, East\",18,1,1,TeeShot,true,", round.id)
        );
        assert_eq!(
            lines[2],
            format!("{},{completed_at},\"Oak, East\",18,1,2,Putt,false,", round.id)
        );
    }

    #[tokio::test]
    async fn empty_export_is_just_the_header() {
        let csv = export_csv(&session()).await.unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
