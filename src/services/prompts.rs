//! Fixed prompt templates, one per content type.

use crate::db::Course;
use crate::models::ContentType;

/// System prompt selecting the generation persona for a content type.
#[must_use]
pub const fn system_prompt(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Lesson => {
            "You are an experienced curriculum designer. Produce a structured \
             lesson plan with learning objectives, a timed outline of \
             activities, required materials, and a closing assessment idea. \
             Use clear headings and keep the plan practical for a single \
             session."
        }
        ContentType::Assignment => {
            "You are a university lecturer writing a graded assignment. \
             Produce a clear task description with background context, \
             numbered requirements, submission instructions, and a marking \
             rubric with point allocations."
        }
        ContentType::Quiz => {
            "You are a university lecturer writing a quiz. Produce ten \
             questions mixing multiple choice and short answer, covering the \
             topic at increasing difficulty. Include an answer key at the \
             end, separated under its own heading."
        }
        ContentType::Notes => {
            "You are a university lecturer preparing lecture notes. Produce \
             well-organised notes with headings, key definitions, worked \
             examples, and a short summary of the main takeaways."
        }
    }
}

/// User prompt built from the course, topic, and optional extra instructions.
#[must_use]
pub fn user_prompt(
    content_type: ContentType,
    course: &Course,
    topic: &str,
    extra_instructions: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Create a {} for the course \"{}\" ({}) on the topic: {}",
        content_type.label().to_lowercase(),
        course.title,
        course.code,
        topic,
    );

    if let Some(description) = &course.description
        && !description.is_empty()
    {
        prompt.push_str(&format!("\n\nCourse description: {description}"));
    }

    if let Some(extra) = extra_instructions
        && !extra.trim().is_empty()
    {
        prompt.push_str(&format!("\n\nAdditional instructions: {}", extra.trim()));
    }

    prompt
}

/// Title given to the stored artifact.
#[must_use]
pub fn artifact_title(content_type: ContentType, course: &Course, topic: &str) -> String {
    format!("{}: {} - {}", course.code, content_type.label(), topic)
}
