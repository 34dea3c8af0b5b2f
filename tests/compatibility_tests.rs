mod test_utils;

use test_utils::*;

use chosn_backend::{
    compatibility::compatibility_score,
    entities::matching::{MatchStatus, ResponseStatus},
};

fn skills(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn verified_expert_in_every_skill_scores_100() {
    let developer = vec![user_skill("Rust", 5, true), user_skill("PostgreSQL", 5, true)];

    assert_eq!(compatibility_score(&skills(&["Rust", "PostgreSQL"]), &developer), 100);
}

#[test]
fn unverified_skills_are_capped() {
    let developer = vec![user_skill("Rust", 5, false)];

    assert_eq!(compatibility_score(&skills(&["Rust"]), &developer), 80);
}

#[test]
fn missing_skills_lower_the_score() {
    let developer = vec![user_skill("Rust", 5, true)];

    assert_eq!(compatibility_score(&skills(&["Rust", "Kubernetes"]), &developer), 50);
    assert_eq!(compatibility_score(&skills(&["Kubernetes"]), &developer), 0);
}

#[test]
fn names_compare_case_insensitively_and_duplicates_collapse() {
    let developer = vec![user_skill("TypeScript", 3, true)];

    assert_eq!(
        compatibility_score(&skills(&["typescript", " TypeScript ", "TYPESCRIPT"]), &developer),
        60
    );
}

#[test]
fn no_required_skills_scores_zero() {
    let developer = vec![user_skill("Rust", 5, true)];

    assert_eq!(compatibility_score(&[], &developer), 0);
    assert_eq!(compatibility_score(&skills(&["  "]), &developer), 0);
}

#[test]
fn match_status_follows_both_responses() {
    use ResponseStatus::*;

    assert_eq!(MatchStatus::from_responses(None, None), MatchStatus::Pending);
    assert_eq!(MatchStatus::from_responses(Some(Interested), None), MatchStatus::Pending);
    assert_eq!(
        MatchStatus::from_responses(Some(Interested), Some(Interested)),
        MatchStatus::Mutual
    );
    assert_eq!(
        MatchStatus::from_responses(Some(Interested), Some(Declined)),
        MatchStatus::Declined
    );
    assert_eq!(MatchStatus::from_responses(None, Some(Declined)), MatchStatus::Declined);
}
