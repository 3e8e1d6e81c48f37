use std::collections::HashSet;

use jiff::civil::Date;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::models::CleanMovie;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Reject {
    #[error("missing integer `id`")]
    MissingId,
    #[error("missing or empty `{0}`")]
    MissingField(&'static str),
    #[error("release_date `{0}` is not a valid YYYY-MM-DD date")]
    BadReleaseDate(String),
    #[error("`{0}` is not numeric")]
    NonNumeric(&'static str),
}

/// Keep-or-drop decision for one raw record, normalizing free text on keep.
pub fn validate(raw: &Value) -> Result<CleanMovie, Reject> {
    let id = raw
        .get("id")
        .and_then(Value::as_i64)
        .and_then(|id| i32::try_from(id).ok())
        .ok_or(Reject::MissingId)?;

    let title = non_empty_str(raw, "title")?.to_string();
    let release_date = non_empty_str(raw, "release_date")?.to_string();
    if release_date.parse::<Date>().is_err() {
        return Err(Reject::BadReleaseDate(release_date));
    }

    let vote_average = number(raw, "vote_average")?;
    let vote_count = raw
        .get("vote_count")
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or(Reject::NonNumeric("vote_count"))?;
    let popularity = number(raw, "popularity")?;

    let overview =
        raw.get("overview").and_then(Value::as_str).map(str::trim).unwrap_or("").to_string();

    let genre_ids = raw
        .get("genre_ids")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_i64).map(|id| id as i32).collect())
        .unwrap_or_default();

    Ok(CleanMovie {
        id,
        title,
        overview,
        release_date,
        popularity,
        vote_average,
        vote_count,
        genre_ids,
    })
}

/// Validate every record, then drop repeats of an already-accepted id.
/// First occurrence wins and input order is preserved.
pub fn cleanup(raw: &[Value]) -> Vec<CleanMovie> {
    info!(records = raw.len(), "starting data cleanup");

    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();

    for record in raw {
        let movie = match validate(record) {
            Ok(movie) => movie,
            Err(reason) => {
                warn!(id = ?record.get("id"), reason = %reason, "record failed validation");
                continue;
            },
        };

        if !seen.insert(movie.id) {
            debug!(id = movie.id, "duplicate movie ignored");
            continue;
        }

        cleaned.push(movie);
    }

    info!(kept = cleaned.len(), dropped = raw.len() - cleaned.len(), "data cleanup completed");
    cleaned
}

fn non_empty_str<'a>(raw: &'a Value, field: &'static str) -> Result<&'a str, Reject> {
    match raw.get(field).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(Reject::MissingField(field)),
    }
}

fn number(raw: &Value, field: &'static str) -> Result<f64, Reject> {
    raw.get(field).and_then(Value::as_f64).ok_or(Reject::NonNumeric(field))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw_movie(id: i64) -> Value {
        json!({
            "id": id,
            "title": "Heat",
            "overview": "Two crews collide in Los Angeles.",
            "release_date": "1995-12-15",
            "popularity": 42.5,
            "vote_average": 8.3,
            "vote_count": 7000,
            "genre_ids": [80, 18],
        })
    }

    #[test]
    fn accepts_valid_record_and_trims_overview() {
        let mut raw = raw_movie(1);
        raw["overview"] = json!("  nice film  ");

        let movie = validate(&raw).unwrap();
        assert_eq!(movie.overview, "nice film");
        assert_eq!(movie.title, "Heat");
        assert_eq!(movie.genre_ids, vec![80, 18]);
    }

    #[test]
    fn missing_or_null_overview_becomes_empty_string() {
        let mut raw = raw_movie(1);
        raw.as_object_mut().unwrap().remove("overview");
        assert_eq!(validate(&raw).unwrap().overview, "");

        let mut raw = raw_movie(2);
        raw["overview"] = Value::Null;
        assert_eq!(validate(&raw).unwrap().overview, "");
    }

    #[test]
    fn rejects_missing_release_date() {
        let mut raw = raw_movie(1);
        raw.as_object_mut().unwrap().remove("release_date");
        assert_eq!(validate(&raw), Err(Reject::MissingField("release_date")));
    }

    #[test]
    fn rejects_empty_title() {
        let mut raw = raw_movie(1);
        raw["title"] = json!("");
        assert_eq!(validate(&raw), Err(Reject::MissingField("title")));
    }

    #[test]
    fn rejects_impossible_calendar_date() {
        let mut raw = raw_movie(1);
        raw["release_date"] = json!("2024-13-40");
        assert_eq!(validate(&raw), Err(Reject::BadReleaseDate("2024-13-40".to_string())));
    }

    #[test]
    fn rejects_non_numeric_metrics() {
        let mut raw = raw_movie(1);
        raw["vote_average"] = json!("high");
        assert_eq!(validate(&raw), Err(Reject::NonNumeric("vote_average")));

        let mut raw = raw_movie(2);
        raw["popularity"] = json!(true);
        assert_eq!(validate(&raw), Err(Reject::NonNumeric("popularity")));

        let mut raw = raw_movie(3);
        raw["vote_count"] = Value::Null;
        assert_eq!(validate(&raw), Err(Reject::NonNumeric("vote_count")));
    }

    #[test]
    fn rejects_record_without_id() {
        let mut raw = raw_movie(1);
        raw.as_object_mut().unwrap().remove("id");
        assert_eq!(validate(&raw), Err(Reject::MissingId));
    }

    #[test]
    fn integer_metrics_pass_the_numeric_check() {
        let mut raw = raw_movie(1);
        raw["popularity"] = json!(42);
        assert!(validate(&raw).is_ok());
    }

    #[test]
    fn duplicate_id_keeps_first_occurrence() {
        let mut first = raw_movie(5);
        first["title"] = json!("First");
        let mut dup = raw_movie(5);
        dup["title"] = json!("Second");

        let batch = vec![first, raw_movie(6), raw_movie(7), dup];
        let cleaned = cleanup(&batch);

        assert_eq!(cleaned.iter().map(|m| m.id).collect::<Vec<_>>(), vec![5, 6, 7]);
        assert_eq!(cleaned[0].title, "First");
    }

    #[test]
    fn invalid_record_does_not_shadow_a_later_valid_one_with_same_id() {
        let mut bad = raw_movie(5);
        bad["release_date"] = json!("not-a-date");

        let cleaned = cleanup(&[bad, raw_movie(5)]);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].id, 5);
    }
}
