//! Compatibility between a position's required skills and a developer's
//! stored skills.

use crate::entities::skill::UserSkill;

const MAX_PROFICIENCY: f64 = 5.0;

/// Proficiency-weighted share of `required` skills the developer holds,
/// scaled to 0-100. Skill names are compared case-insensitively and verified
/// skills count in full while unverified ones count at most 80%.
pub fn compatibility_score(required: &[String], developer_skills: &[UserSkill]) -> i16 {
    let mut wanted: Vec<String> = required
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    wanted.sort();
    wanted.dedup();

    if wanted.is_empty() {
        return 0;
    }

    let earned: f64 = wanted
        .iter()
        .filter_map(|name| {
            developer_skills
                .iter()
                .filter(|s| s.name.to_lowercase() == *name)
                .map(skill_weight)
                .reduce(f64::max)
        })
        .sum();

    ((earned / wanted.len() as f64) * 100.0).round().clamp(0.0, 100.0) as i16
}

fn skill_weight(skill: &UserSkill) -> f64 {
    let level = f64::from(skill.proficiency_level.clamp(1, 5)) / MAX_PROFICIENCY;
    if skill.verified { level } else { level.min(0.8) }
}
