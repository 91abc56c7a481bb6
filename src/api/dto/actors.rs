/*
 * Responsibility
 * - Actors の request/response DTO
 * - validate() で正規化済みの値を返す (name/gender は小文字化)
 */
use serde::{Deserialize, Serialize};

use crate::repos::actor_repo::ActorRow;

pub const NAME_MAX_LEN: usize = 100;
pub const GENDERS: [&str; 2] = ["male", "female"];

fn normalize_name(name: &str) -> Result<String, &'static str> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return Err("name cannot be empty");
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err("name must be <= 100 chars");
    }
    Ok(name)
}

fn normalize_gender(gender: &str) -> Result<String, &'static str> {
    let gender = gender.trim().to_lowercase();
    if !GENDERS.contains(&gender.as_str()) {
        return Err("gender must be male or female");
    }
    Ok(gender)
}

fn check_age(age: i32) -> Result<i32, &'static str> {
    if age < 0 {
        return Err("age must be >= 0");
    }
    Ok(age)
}

#[derive(Debug, Deserialize)]
pub struct CreateActorRequest {
    pub name: String,
    pub age: i32,
    pub gender: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct NewActor {
    pub name: String,
    pub age: i32,
    pub gender: String,
}

impl CreateActorRequest {
    pub fn validate(&self) -> Result<NewActor, &'static str> {
        Ok(NewActor {
            name: normalize_name(&self.name)?,
            age: check_age(self.age)?,
            gender: normalize_gender(&self.gender)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateActorRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ActorChanges {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl UpdateActorRequest {
    pub fn validate(&self) -> Result<ActorChanges, &'static str> {
        if self.name.is_none() && self.age.is_none() && self.gender.is_none() {
            return Err("nothing to update");
        }

        Ok(ActorChanges {
            name: self.name.as_deref().map(normalize_name).transpose()?,
            age: self.age.map(check_age).transpose()?,
            gender: self.gender.as_deref().map(normalize_gender).transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ActorResponse {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: String,
}

impl From<ActorRow> for ActorResponse {
    fn from(row: ActorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            age: row.age,
            gender: row.gender,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActorListResponse {
    pub success: bool,
    pub count: usize,
    pub actors: Vec<ActorResponse>,
}
