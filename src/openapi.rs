use utoipa::OpenApi;

use crate::handlers::GeneratedTimetable;
use crate::import::ImportSummary;
use crate::models::{
    Availability, Break, LessonSlot, Room, RoomType, ScheduleData, School, SchoolClass, Shifts,
    Subject, SubjectsSection, Teacher, Weekday,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::get_schedule_data,
        crate::handlers::put_school,
        crate::handlers::put_classes,
        crate::handlers::put_teachers,
        crate::handlers::put_subjects,
        crate::handlers::import_csv,
        crate::handlers::get_template,
        crate::handlers::cloud_save,
        crate::handlers::cloud_load,
        crate::handlers::generate_timetable
    ),
    components(schemas(
        ScheduleData,
        School,
        Shifts,
        Break,
        SchoolClass,
        Teacher,
        Availability,
        Subject,
        SubjectsSection,
        Room,
        RoomType,
        Weekday,
        LessonSlot,
        ImportSummary,
        GeneratedTimetable
    )),
    tags(
        (name = "schedule", description = "School configuration and timetable generation")
    )
)]
pub struct ApiDoc;
