//! Deterministic provider for local development and tests. No network I/O, never fails.

use async_trait::async_trait;

use crate::models::chat::{
    InsightSignals, InsightsResult, Message, Sentiment, SummaryResult, SummaryStyle,
};
use crate::models::content::{ContentLength, GenOptions, GenResult, TokenUsage};
use crate::models::resume::{ImproveResult, ScoreResult};
use crate::providers::{AiProvider, ProviderError};

const BASE_SCORE: u32 = 45;
const PROMPT_EXCERPT_CHARS: usize = 100;

pub struct MockProvider;

#[async_trait]
impl AiProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn summarize_chat(
        &self,
        messages: &[Message],
        style: SummaryStyle,
    ) -> Result<SummaryResult, ProviderError> {
        let count = messages.len();
        let summary = match style {
            SummaryStyle::Detailed => format!(
                "Detailed summary of {count} messages: The conversation covered multiple topics \
                 including project planning, technical decisions, and follow-up actions. \
                 Participants discussed key architectural choices and agreed on next steps."
            ),
            SummaryStyle::Concise => format!(
                "Concise summary of {count} messages: Key topics discussed with action items identified."
            ),
        };

        Ok(SummaryResult {
            summary,
            key_points: strings(&[
                "Project architecture was discussed",
                "Team alignment on tech stack confirmed",
                "Timeline for delivery set to Q1",
            ]),
            action_items: strings(&[
                "Schedule follow-up meeting for next week",
                "Review the technical proposal document",
                "Share updated timeline with stakeholders",
            ]),
        })
    }

    async fn extract_insights(
        &self,
        messages: &[Message],
        signals: InsightSignals,
    ) -> Result<InsightsResult, ProviderError> {
        Ok(InsightsResult {
            sentiment: signals.sentiment.then(|| Sentiment {
                label: "positive".to_string(),
                score: 0.82,
            }),
            topics: if signals.topics {
                strings(&["project planning", "technology", "team collaboration"])
            } else {
                vec![]
            },
            entities: if signals.entities {
                strings(&["TypeScript", "Fastify", "Azure OpenAI"])
            } else {
                vec![]
            },
            risks: strings(&["Tight deadline may require scope adjustment"]),
            follow_ups: vec![
                format!("Review the {} messages for pending decisions", messages.len()),
                "Confirm resource allocation by end of week".to_string(),
            ],
        })
    }

    async fn score_resume(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> Result<ScoreResult, ProviderError> {
        let has_jd = job_description.is_some_and(|jd| !jd.is_empty());
        let word_count = count_words(resume_text);

        let rationale = if has_jd {
            format!(
                "Evaluated against the provided job description. Resume has {word_count} words \
                 and covers several matching areas."
            )
        } else {
            format!(
                "General ATS evaluation. Resume has {word_count} words. Consider providing a job \
                 description for more targeted feedback."
            )
        };

        Ok(ScoreResult {
            overall_score: score_for_word_count(word_count),
            rationale,
            matched_skills: strings(&["TypeScript", "Node.js", "REST APIs", "Git"]),
            missing_skills: if has_jd {
                strings(&["Kubernetes", "CI/CD pipelines", "GraphQL"])
            } else {
                strings(&["Consider specifying a job description for skill gap analysis"])
            },
        })
    }

    async fn improve_resume(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
        target_role: Option<&str>,
    ) -> Result<ImproveResult, ProviderError> {
        let role = target_role
            .filter(|r| !r.is_empty())
            .unwrap_or("Software Engineer");
        let alignment = if job_description.is_some_and(|jd| !jd.is_empty()) {
            "job description"
        } else {
            "industry standards"
        };

        Ok(ImproveResult {
            improved_bullets: strings(&[
                "Led cross-functional team of 5 engineers to deliver a high-availability microservices platform, improving system uptime to 99.9%",
                "Architected and implemented RESTful APIs serving 10K+ daily active users with sub-100ms latency",
                "Reduced CI/CD pipeline execution time by 40% through parallelization and caching strategies",
            ]),
            keywords_to_add: vec![
                "scalable architecture".to_string(),
                "agile methodology".to_string(),
                "cloud-native".to_string(),
                role.to_lowercase(),
            ],
            formatting_suggestions: strings(&[
                "Use consistent bullet point style throughout",
                "Add quantifiable metrics to each achievement",
                "Ensure contact information is at the top",
                "Keep resume to 1-2 pages maximum",
            ]),
            optimized_version: format!(
                "# {role} - Optimized Resume\n\n{resume_text}\n\n## Key Additions\n\
                 - Added quantifiable metrics\n\
                 - Aligned keywords with {alignment}\n\
                 - Improved formatting for ATS compatibility"
            ),
        })
    }

    async fn generate_content(
        &self,
        prompt: &str,
        opts: &GenOptions,
    ) -> Result<GenResult, ProviderError> {
        let target_words = match opts.length {
            ContentLength::Short => 50,
            ContentLength::Medium => 150,
            ContentLength::Long => 300,
        };
        let tone = opts.tone.as_deref().unwrap_or("professional");

        let excerpt: String = prompt.chars().take(PROMPT_EXCERPT_CHARS).collect();
        let ellipsis = if prompt.chars().count() > PROMPT_EXCERPT_CHARS {
            "..."
        } else {
            ""
        };

        let generated_text = format!(
            "[Generated content in {tone} tone, ~{target_words} words]\n\n\
             Based on the prompt: \"{excerpt}{ellipsis}\"\n\n\
             This is a mock-generated response that demonstrates the content generation \
             capability. With a live AI provider, this would contain meaningful, contextual \
             content tailored to your specific requirements and tone preferences. The response \
             would be approximately {target_words} words long and written in a {tone} tone."
        );

        let prompt_tokens = estimate_tokens(prompt);
        let completion_tokens = estimate_tokens(&generated_text);

        Ok(GenResult {
            generated_text,
            tokens_usage: TokenUsage {
                prompt: prompt_tokens,
                completion: completion_tokens,
                total: prompt_tokens + completion_tokens,
            },
        })
    }
}

/// Counts whitespace-separated pieces. Leading or trailing whitespace yields an
/// extra empty piece, so `""` counts as one and `" a "` as three.
fn count_words(text: &str) -> usize {
    let mut runs = 0;
    let mut in_space = false;
    for c in text.chars() {
        let space = c.is_whitespace();
        if space && !in_space {
            runs += 1;
        }
        in_space = space;
    }
    runs + 1
}

/// 45 base points plus one per ten words, capped at 100.
fn score_for_word_count(word_count: usize) -> u32 {
    let bonus = u32::try_from(word_count / 10).unwrap_or(u32::MAX);
    BASE_SCORE.saturating_add(bonus).min(100)
}

/// Rough token estimate: one token per four characters, rounded up.
fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count();
    u32::try_from(chars.div_ceil(4)).unwrap_or(u32::MAX)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
