// System prompts for the live provider. Each one embeds the exact JSON shape
// the matching result type deserializes from.

use crate::models::chat::{InsightSignals, SummaryStyle};
use crate::models::content::ContentLength;

/// Fragment appended to every prompt that expects structured output.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";

pub fn score_system() -> String {
    format!(
        r#"You are an expert ATS resume evaluator. Score the resume 0-100.
{JSON_ONLY_INSTRUCTION}
Use this exact structure:
{{
  "overallScore": number,
  "rationale": "string",
  "matchedSkills": ["string"],
  "missingSkills": ["string"]
}}"#
    )
}

pub fn improve_system() -> String {
    format!(
        r#"You are an expert resume writer and ATS optimizer.
{JSON_ONLY_INSTRUCTION}
Use this exact structure:
{{
  "improvedBullets": ["string"],
  "keywordsToAdd": ["string"],
  "formattingSuggestions": ["string"],
  "optimizedVersion": "string (the full optimized resume text)"
}}"#
    )
}

pub fn summarize_system(style: SummaryStyle) -> String {
    let guidance = match style {
        SummaryStyle::Detailed => "Provide thorough analysis.",
        SummaryStyle::Concise => "Be brief and focused.",
    };
    format!(
        r#"You are an expert conversation analyst. Summarize the following conversation.
{JSON_ONLY_INSTRUCTION}
Use this exact structure:
{{
  "summary": "string",
  "keyPoints": ["string"],
  "actionItems": ["string"]
}}
Style: {}. {guidance}"#,
        style.as_str()
    )
}

/// Disabled signals are pinned to `null` / `[]` in the schema so the model
/// does not spend tokens on them.
pub fn insights_system(signals: InsightSignals) -> String {
    let fields = [
        if signals.sentiment {
            r#""sentiment": { "label": "positive|negative|neutral", "score": 0.0-1.0 }"#
        } else {
            r#""sentiment": null"#
        },
        if signals.topics {
            r#""topics": ["string"]"#
        } else {
            r#""topics": []"#
        },
        if signals.entities {
            r#""entities": ["string"]"#
        } else {
            r#""entities": []"#
        },
        r#""risks": ["string"]"#,
        r#""followUps": ["string"]"#,
    ];

    format!(
        "You are an expert conversation analyst. Extract insights from the conversation.\n\
         {JSON_ONLY_INSTRUCTION}\nUse this exact structure:\n{{\n  {}\n}}",
        fields.join(",\n  ")
    )
}

pub fn score_user(resume_text: &str, job_description: Option<&str>) -> String {
    match job_description.filter(|jd| !jd.is_empty()) {
        Some(jd) => format!("Resume:\n{resume_text}\n\nJob Description:\n{jd}"),
        None => format!(
            "Resume:\n{resume_text}\n\nNo specific job description provided. \
             Evaluate against general best practices."
        ),
    }
}

pub fn improve_user(
    resume_text: &str,
    job_description: Option<&str>,
    target_role: Option<&str>,
) -> String {
    let extra: Vec<String> = [
        job_description
            .filter(|jd| !jd.is_empty())
            .map(|jd| format!("Job Description: {jd}")),
        target_role
            .filter(|r| !r.is_empty())
            .map(|r| format!("Target Role: {r}")),
    ]
    .into_iter()
    .flatten()
    .collect();

    format!("Resume:\n{resume_text}\n{}", extra.join("\n"))
}

pub fn generate_system(tone: Option<&str>, length: ContentLength) -> String {
    let tone = tone.unwrap_or("professional");
    let target = match length {
        ContentLength::Short => "~100 words",
        ContentLength::Medium => "~300 words",
        ContentLength::Long => "~600 words",
    };
    format!(
        "Generate content in a {tone} tone. Target length: {target}. \
         Write only the requested content, no meta commentary."
    )
}
