//! A deterministic 50-course catalog shared by the integration tests.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use coursefind::config::CourseSearchConfig;
use coursefind::document::CourseDocument;
use coursefind::index::MemoryCourseIndex;
use coursefind::search::CourseSearchService;
use coursefind::suggest::SuggestionEngine;

pub const CORPUS_SIZE: usize = 50;

const CATEGORIES: [&str; 5] = ["Programming", "Art", "Music", "Science", "Sports"];
const TYPES: [&str; 3] = ["COURSE", "CLUB", "WORKSHOP"];

const TITLES: [[&str; 10]; 5] = [
    [
        "Robot Building",
        "Python Basics",
        "Web Design for Teens",
        "Robotics Lab",
        "Game Programming",
        "Scratch Adventures",
        "Intro to Robots",
        "Data Science Starter",
        "Java Fundamentals",
        "Robot Wars Club",
    ],
    [
        "Watercolor Basics",
        "Pottery Studio",
        "Comic Drawing",
        "Sculpture for Kids",
        "Digital Painting",
        "Printmaking",
        "Portrait Sketching",
        "Mosaic Workshop",
        "Origami Club",
        "Street Art",
    ],
    [
        "Piano for Beginners",
        "Guitar Club",
        "Drum Circle",
        "Choir",
        "Music Production",
        "Violin Basics",
        "Songwriting",
        "Jazz Band",
        "Ukulele Fun",
        "Music Theory",
    ],
    [
        "Junior Chemists",
        "Astronomy Nights",
        "Biology Explorers",
        "Physics Puzzles",
        "Python for Science",
        "Rocket Science",
        "Marine Biology",
        "Geology Walks",
        "Electronics Lab",
        "Weather Watchers",
    ],
    [
        "Soccer Skills",
        "Swimming Lessons",
        "Tennis Academy",
        "Climbing Club",
        "Judo Basics",
        "Basketball Camp",
        "Yoga for Teens",
        "Fencing",
        "Skateboarding",
        "Athletics",
    ],
];

fn session_start(i: usize) -> NaiveDateTime {
    let base = NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .unwrap();
    base + Duration::days(((i * 11) % 60) as i64) + Duration::hours((i % 8) as i64)
}

/// Build the catalog. Every course has an age range; some have no price or
/// no upcoming session.
pub fn seeded_courses() -> Vec<CourseDocument> {
    (0..CORPUS_SIZE)
        .map(|i| {
            let category = i % CATEGORIES.len();
            let title = TITLES[category][(i / CATEGORIES.len()) % 10];
            let description = if title.to_lowercase().contains("robot") {
                format!("{title}: design and program a robot")
            } else {
                format!("{title} for curious learners")
            };
            let min_age = 5 + ((i * 7) % 12) as i32;
            let max_age = min_age + 2 + (i % 6) as i32;

            let mut builder = CourseDocument::builder(format!("course-{i:02}"))
                .title(title)
                .description(description)
                .category(CATEGORIES[category])
                .course_type(TYPES[i % TYPES.len()])
                .ages(min_age, max_age);
            if i % 13 != 0 {
                builder = builder.price(10.0 + ((i * 37) % 90) as f64 + 0.5);
            }
            if i % 17 != 16 {
                builder = builder.next_session_date(session_start(i));
            }
            builder.build()
        })
        .collect()
}

pub fn seeded_index() -> Arc<MemoryCourseIndex> {
    Arc::new(MemoryCourseIndex::with_documents(seeded_courses()))
}

pub fn search_service() -> CourseSearchService {
    CourseSearchService::new(seeded_index(), &CourseSearchConfig::default())
}

pub fn suggestion_engine() -> SuggestionEngine {
    SuggestionEngine::new(seeded_index(), &CourseSearchConfig::default())
}
