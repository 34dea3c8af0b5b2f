//! Confidence scoring for skills claimed by a developer, using their public
//! GitHub repositories as evidence.
//!
//! The scorer is a single pass over the repository list: every repository is
//! bucketed under the skills its primary language maps to, and each bucket is
//! scored from its repository count, accumulated size and recency.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::entities::github::{GitHubRepository, ProjectComplexity, SkillEvidence, SkillValidation};

/// Repositories fetched per analysis run.
pub const MAX_REPOSITORIES: usize = 50;
/// Validations persisted to a profile per run.
pub const MAX_SAVED_SKILLS: usize = 10;
/// Validations below this confidence are not surfaced.
pub const MIN_CONFIDENCE: u8 = 30;
/// A skill counts as recently used when pushed to within this many days.
pub const RECENT_USAGE_DAYS: i64 = 183;

const INTERMEDIATE_SIZE: u64 = 10_000;
const ADVANCED_SIZE: u64 = 50_000;

const POINTS_PER_REPOSITORY: f64 = 15.0;
const SIZE_POINTS_CAP: f64 = 30.0;
const RECENT_USAGE_POINTS: f64 = 25.0;

/// Maps a GitHub primary language to the platform skills it evidences.
/// Languages missing from the table map to themselves.
pub fn skills_for_language(language: &str) -> Vec<String> {
    let mapped: &[&str] = match language {
        "TypeScript" => &["TypeScript", "React"],
        "JavaScript" => &["JavaScript", "Node.js"],
        "Python" => &["Python"],
        "Java" => &["Java"],
        "Kotlin" => &["Kotlin", "Android"],
        "Swift" => &["Swift", "iOS"],
        "Objective-C" => &["Objective-C", "iOS"],
        "Go" => &["Go"],
        "Rust" => &["Rust"],
        "Ruby" => &["Ruby", "Ruby on Rails"],
        "PHP" => &["PHP"],
        "C#" => &["C#", ".NET"],
        "C++" => &["C++"],
        "C" => &["C"],
        "Dart" => &["Dart", "Flutter"],
        "Vue" => &["Vue.js", "JavaScript"],
        "Svelte" => &["Svelte", "JavaScript"],
        "HTML" => &["HTML", "CSS"],
        "CSS" | "SCSS" => &["CSS"],
        "Shell" => &["Bash"],
        "Dockerfile" => &["Docker"],
        "HCL" => &["Terraform"],
        "Jupyter Notebook" => &["Python", "Data Science"],
        other => return vec![other.to_string()],
    };

    mapped.iter().map(|s| s.to_string()).collect()
}

pub fn project_complexity(total_size: u64) -> ProjectComplexity {
    if total_size > ADVANCED_SIZE {
        ProjectComplexity::Advanced
    } else if total_size > INTERMEDIATE_SIZE {
        ProjectComplexity::Intermediate
    } else {
        ProjectComplexity::Basic
    }
}

pub fn is_recent(last_push: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_push {
        Some(pushed) => now.signed_duration_since(pushed) <= Duration::days(RECENT_USAGE_DAYS),
        None => false,
    }
}

/// `min(100, repos*15 + min(size/1000, 30) + (recent ? 25 : 0))`, rounded.
pub fn confidence(repository_count: usize, total_size: u64, recent_usage: bool) -> u8 {
    let repo_points = repository_count as f64 * POINTS_PER_REPOSITORY;
    let size_points = (total_size as f64 / 1000.0).min(SIZE_POINTS_CAP);
    let recency_points = if recent_usage { RECENT_USAGE_POINTS } else { 0.0 };

    (repo_points + size_points + recency_points).min(100.0).round() as u8
}

/// Proficiency level (1-5) stored on a skill assignment.
pub fn proficiency_level(confidence: u8) -> i16 {
    let level = (f64::from(confidence) / 20.0).ceil() as i16;
    level.clamp(1, 5)
}

#[derive(Debug, Default)]
struct SkillBucket {
    repositories: Vec<String>,
    total_size: u64,
    last_push: Option<DateTime<Utc>>,
}

impl SkillBucket {
    fn add(&mut self, repo: &GitHubRepository) {
        if self.repositories.iter().any(|name| name == &repo.name) {
            return;
        }
        self.repositories.push(repo.name.clone());
        self.total_size = self.total_size.saturating_add(repo.size);
        self.last_push = match (self.last_push, repo.pushed_at) {
            (Some(current), Some(pushed)) => Some(current.max(pushed)),
            (current, pushed) => current.or(pushed),
        };
    }

    fn into_validation(self, skill: String, now: DateTime<Utc>) -> SkillValidation {
        let recent_usage = is_recent(self.last_push, now);

        SkillValidation {
            confidence: confidence(self.repositories.len(), self.total_size, recent_usage),
            skill,
            evidence: SkillEvidence {
                project_complexity: project_complexity(self.total_size),
                repositories: self.repositories,
                lines_of_code: self.total_size,
                recent_usage,
            },
        }
    }
}

/// Scores every skill evidenced by `repositories` as of `now`.
///
/// Only the first [`MAX_REPOSITORIES`] entries are considered. The result
/// holds validations with confidence of at least [`MIN_CONFIDENCE`], sorted by
/// confidence descending and then by skill name.
pub fn score_repositories(repositories: &[GitHubRepository], now: DateTime<Utc>) -> Vec<SkillValidation> {
    let mut buckets: BTreeMap<String, SkillBucket> = BTreeMap::new();

    for repo in repositories.iter().take(MAX_REPOSITORIES) {
        let Some(language) = repo.language.as_deref().filter(|l| !l.trim().is_empty()) else {
            continue;
        };

        for skill in skills_for_language(language) {
            buckets.entry(skill).or_default().add(repo);
        }
    }

    let mut validations: Vec<SkillValidation> = buckets
        .into_iter()
        .map(|(skill, bucket)| bucket.into_validation(skill, now))
        .filter(|v| v.confidence >= MIN_CONFIDENCE)
        .collect();

    validations.sort_by(|a, b| {
        b.confidence
            .cmp(&a.confidence)
            .then_with(|| a.skill.cmp(&b.skill))
    });

    validations
}

/// The highest-confidence validations, as persisted to a profile.
pub fn top_validations(validations: &[SkillValidation], limit: usize) -> &[SkillValidation] {
    &validations[..validations.len().min(limit)]
}
