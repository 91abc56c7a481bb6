/*
 * Responsibility
 * - Movies の request/response DTO
 * - release_date は RFC 3339 / "YYYY-MM-DD" / "YYYY-MM-DD HH:MM:SS" を受け付ける
 */
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::repos::movie_repo::MovieRow;

pub const TITLE_MAX_LEN: usize = 100;

fn normalize_title(title: &str) -> Result<String, &'static str> {
    let title = title.trim().to_lowercase();
    if title.is_empty() {
        return Err("title cannot be empty");
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err("title must be <= 100 chars");
    }
    Ok(title)
}

pub fn parse_release_date(raw: &str) -> Result<NaiveDateTime, &'static str> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        .map_err(|_| "release_date must be a date or timestamp")
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub release_date: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub release_date: NaiveDateTime,
}

impl CreateMovieRequest {
    pub fn validate(&self) -> Result<NewMovie, &'static str> {
        Ok(NewMovie {
            title: normalize_title(&self.title)?,
            release_date: parse_release_date(&self.release_date)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub release_date: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MovieChanges {
    pub title: Option<String>,
    pub release_date: Option<NaiveDateTime>,
}

impl UpdateMovieRequest {
    pub fn validate(&self) -> Result<MovieChanges, &'static str> {
        if self.title.is_none() && self.release_date.is_none() {
            return Err("nothing to update");
        }

        Ok(MovieChanges {
            title: self.title.as_deref().map(normalize_title).transpose()?,
            release_date: self
                .release_date
                .as_deref()
                .map(parse_release_date)
                .transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub id: i32,
    pub title: String,
    pub release_date: NaiveDateTime,
}

impl From<MovieRow> for MovieResponse {
    fn from(row: MovieRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            release_date: row.release_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub success: bool,
    pub count: usize,
    pub movies: Vec<MovieResponse>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn accepts_common_date_shapes() {
        assert_eq!(parse_release_date("2021-05-04").unwrap(), midnight(2021, 5, 4));
        assert_eq!(
            parse_release_date("2021-05-04T00:00:00Z").unwrap(),
            midnight(2021, 5, 4)
        );
        assert_eq!(
            parse_release_date("2021-05-04T09:00:00+09:00").unwrap(),
            midnight(2021, 5, 4)
        );
        assert_eq!(
            parse_release_date("2021-05-04 00:00:00").unwrap(),
            midnight(2021, 5, 4)
        );
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_release_date("next friday").is_err());
        assert!(parse_release_date("2021-13-01").is_err());
    }

    #[test]
    fn create_lowercases_title() {
        let req = CreateMovieRequest {
            title: "The Matrix".to_string(),
            release_date: "1999-03-31".to_string(),
        };
        let movie = req.validate().unwrap();
        assert_eq!(movie.title, "the matrix");
        assert_eq!(movie.release_date, midnight(1999, 3, 31));
    }

    #[test]
    fn update_requires_at_least_one_field() {
        let req: UpdateMovieRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }
}
