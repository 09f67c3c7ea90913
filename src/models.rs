use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Daily sessions during which classes may be scheduled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Shifts {
    pub morning: bool,
    pub afternoon: bool,
    pub night: bool,
}

impl Default for Shifts {
    fn default() -> Self {
        Self {
            morning: true,
            afternoon: false,
            night: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Break {
    pub name: String,
    #[serde(with = "break_time")]
    #[schema(value_type = String, example = "09:30")]
    pub start: NaiveTime,
    #[serde(with = "break_time")]
    #[schema(value_type = String, example = "09:50")]
    pub end: NaiveTime,
}

/// Break times travel as "HH:MM" strings, the format the console's time
/// inputs produce. "HH:MM:SS" is accepted too.
mod break_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M:%S"))
            .map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub name: String,
    #[serde(default)]
    pub shifts: Shifts,
    #[serde(default = "default_lesson_duration")]
    pub lesson_duration: u32,
    #[serde(default)]
    pub breaks: Vec<Break>,
}

pub(crate) fn default_lesson_duration() -> u32 {
    50
}

/// A class (turma) with its per-subject weekly lesson counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct SchoolClass {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default = "default_capacity")]
    pub students: u32,
    #[serde(default)]
    pub subjects: BTreeMap<String, u32>,
}

pub(crate) fn default_capacity() -> u32 {
    30
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Availability {
    pub mon: bool,
    pub tue: bool,
    pub wed: bool,
    pub thu: bool,
    pub fri: bool,
}

impl Default for Availability {
    fn default() -> Self {
        Self {
            mon: true,
            tue: true,
            wed: true,
            thu: true,
            fri: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Teacher {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub availability: Availability,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Subject {
    pub id: u64,
    pub name: String,
    /// Opaque constraint tags, carried through untouched.
    #[serde(default)]
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    #[default]
    Standard,
    Lab,
    Gym,
    Art,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Room {
    pub id: u64,
    pub name: String,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(rename = "type", default)]
    pub kind: RoomType,
}

/// Subjects and rooms travel together as one section of the aggregate,
/// matching the persisted document shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct SubjectsSection {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub rooms: Vec<Room>,
}

/// The whole in-memory state of the console: everything the forms edit,
/// the importer replaces, the store persists and the generator serializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ScheduleData {
    #[serde(default)]
    pub school: Option<School>,
    #[serde(default)]
    pub classes: Vec<SchoolClass>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub subjects: SubjectsSection,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

/// One lesson in a generated timetable. The generation endpoint only
/// returns slots that deserialized cleanly into this shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonSlot {
    pub class_id: String,
    pub day: Weekday,
    pub period: u32,
    pub subject: String,
    pub teacher: String,
    pub room: String,
}
