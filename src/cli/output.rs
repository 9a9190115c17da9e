//! Output formatting for CLI commands.

use serde::Serialize;
use serde_json::Value;

use crate::cli::args::{CourseFindArgs, OutputFormat};
use crate::document::CourseDocument;
use crate::search::SearchResponse;

/// Output a search response in the selected format.
pub fn output_search_response(response: &SearchResponse, args: &CourseFindArgs) -> anyhow::Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(response, args),
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!(
                    "Found {} courses (showing {})",
                    response.total,
                    response.courses.len()
                );
                println!();
            }
            for (i, course) in response.courses.iter().enumerate() {
                println!("{}", format_course_line(i + 1, course));
                if args.verbosity() > 1 && !course.description.is_empty() {
                    println!("   {}", course.description);
                }
            }
            Ok(())
        }
    }
}

/// Output suggestions, one per line in human format.
pub fn output_suggestions(suggestions: &[String], args: &CourseFindArgs) -> anyhow::Result<()> {
    match args.output_format {
        OutputFormat::Json => output_json(&suggestions, args),
        OutputFormat::Human => {
            if suggestions.is_empty() && args.verbosity() > 0 {
                println!("No suggestions");
            }
            for suggestion in suggestions {
                println!("{suggestion}");
            }
            Ok(())
        }
    }
}

/// Output a rendered request body. Always JSON; `--pretty` or human format
/// indents it.
pub fn output_request_body(body: &Value, args: &CourseFindArgs) -> anyhow::Result<()> {
    let json = if args.pretty || args.output_format == OutputFormat::Human {
        serde_json::to_string_pretty(body)?
    } else {
        serde_json::to_string(body)?
    };
    println!("{json}");
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize + ?Sized>(result: &T, args: &CourseFindArgs) -> anyhow::Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// One line summary of a course.
pub fn format_course_line(rank: usize, course: &CourseDocument) -> String {
    let mut line = format!("{rank}. {}", course.title);

    let labels: Vec<&str> = [course.category.as_str(), course.course_type.as_str()]
        .into_iter()
        .filter(|label| !label.is_empty())
        .collect();
    if !labels.is_empty() {
        line.push_str(&format!(" [{}]", labels.join("/")));
    }

    let mut details = Vec::new();
    if let Some(ages) = format_age_range(course.min_age, course.max_age) {
        details.push(ages);
    }
    if let Some(price) = course.price {
        details.push(format_price(price));
    }
    if let Some(date) = course.next_session_date {
        details.push(format!("next {}", date.format("%Y-%m-%d %H:%M")));
    }
    if !details.is_empty() {
        line.push_str(" - ");
        line.push_str(&details.join(", "));
    }

    line
}

/// Format an age range, open ends included.
pub fn format_age_range(min_age: Option<i32>, max_age: Option<i32>) -> Option<String> {
    match (min_age, max_age) {
        (Some(min), Some(max)) => Some(format!("ages {min}-{max}")),
        (Some(min), None) => Some(format!("ages {min}+")),
        (None, Some(max)) => Some(format!("ages up to {max}")),
        (None, None) => None,
    }
}

/// Format a price with two decimals.
pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}
