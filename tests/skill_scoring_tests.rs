mod test_utils;

use chrono::{Duration, TimeZone, Utc};
use rand::{seq::SliceRandom, Rng};
use test_utils::*;

use chosn_backend::{
    entities::github::ProjectComplexity,
    skill_scoring::{
        confidence, is_recent, proficiency_level, project_complexity, score_repositories, skills_for_language,
        top_validations, MAX_REPOSITORIES, MIN_CONFIDENCE,
    },
};

#[test]
fn single_recent_typescript_repository_scores_52() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let repos = vec![repo("dashboard", Some("TypeScript"), 12_000, Some(now - Duration::days(1)))];

    let validations = score_repositories(&repos, now);

    assert_eq!(validations.len(), 2);
    // Equal confidence, so ordered by name.
    assert_eq!(validations[0].skill, "React");
    assert_eq!(validations[1].skill, "TypeScript");
    for v in &validations {
        assert_eq!(v.confidence, 52);
        assert_eq!(v.evidence.repositories, vec!["dashboard".to_string()]);
        assert_eq!(v.evidence.lines_of_code, 12_000);
        assert!(v.evidence.recent_usage);
        assert_eq!(v.evidence.project_complexity, ProjectComplexity::Intermediate);
    }
}

#[test]
fn complexity_thresholds_are_exclusive() {
    assert_eq!(project_complexity(0), ProjectComplexity::Basic);
    assert_eq!(project_complexity(10_000), ProjectComplexity::Basic);
    assert_eq!(project_complexity(10_001), ProjectComplexity::Intermediate);
    assert_eq!(project_complexity(50_000), ProjectComplexity::Intermediate);
    assert_eq!(project_complexity(50_001), ProjectComplexity::Advanced);
}

#[test]
fn recency_window_is_183_days() {
    let now = Utc::now();
    assert!(is_recent(Some(now - Duration::days(183)), now));
    assert!(!is_recent(Some(now - Duration::days(184)), now));
    assert!(!is_recent(None, now));
}

#[test]
fn confidence_is_capped_at_100() {
    assert_eq!(confidence(1, 0, false), 15);
    assert_eq!(confidence(2, 5_500, false), 36);
    assert_eq!(confidence(1, 1_000_000, true), 70);
    assert_eq!(confidence(10, 100_000, true), 100);
}

#[test]
fn low_confidence_skills_are_dropped() {
    let now = Utc::now();
    // 15 points for the repository and nothing else.
    let repos = vec![repo("old-script", Some("Go"), 0, Some(now - Duration::days(400)))];

    let validations = score_repositories(&repos, now);

    assert!(validations.is_empty());
    assert!(confidence(1, 0, false) < MIN_CONFIDENCE);
}

#[test]
fn empty_input_yields_no_validations() {
    assert!(score_repositories(&[], Utc::now()).is_empty());
}

#[test]
fn repositories_without_a_language_are_ignored() {
    let now = Utc::now();
    let repos = vec![
        repo("notes", None, 40_000, Some(now)),
        repo("blank", Some("  "), 40_000, Some(now)),
    ];

    assert!(score_repositories(&repos, now).is_empty());
}

#[test]
fn results_sorted_by_confidence_then_name() {
    let now = Utc::now();
    let repos = vec![
        repo("api", Some("Rust"), 20_000, Some(now)),
        repo("cli", Some("Rust"), 20_000, Some(now)),
        repo("site", Some("Python"), 20_000, Some(now)),
        repo("tool", Some("Go"), 20_000, Some(now)),
    ];

    let validations = score_repositories(&repos, now);
    let order: Vec<&str> = validations.iter().map(|v| v.skill.as_str()).collect();

    assert_eq!(order, vec!["Rust", "Go", "Python"]);
    assert!(validations.windows(2).all(|w| w[0].confidence >= w[1].confidence));
}

#[test]
fn scoring_is_deterministic() {
    let now = Utc::now();
    let repos = vec![
        repo("web", Some("JavaScript"), 8_000, Some(now - Duration::days(10))),
        repo("app", Some("Kotlin"), 60_000, Some(now - Duration::days(300))),
        repo("infra", Some("HCL"), 2_000, Some(now - Duration::days(2))),
    ];

    assert_eq!(score_repositories(&repos, now), score_repositories(&repos, now));
}

#[test]
fn only_first_fifty_repositories_count() {
    let now = Utc::now();
    let mut repos: Vec<_> = (0..MAX_REPOSITORIES)
        .map(|i| repo(&format!("go-{i}"), Some("Go"), 100, Some(now)))
        .collect();
    repos.push(repo("late-rust", Some("Rust"), 90_000, Some(now)));

    let validations = score_repositories(&repos, now);

    assert!(validations.iter().all(|v| v.skill != "Rust"));
    let go = validations.iter().find(|v| v.skill == "Go").unwrap();
    assert_eq!(go.evidence.repositories.len(), MAX_REPOSITORIES);
    assert_eq!(go.confidence, 100);
}

#[test]
fn unmapped_languages_map_to_themselves() {
    assert_eq!(skills_for_language("Elixir"), vec!["Elixir".to_string()]);
    assert_eq!(
        skills_for_language("JavaScript"),
        vec!["JavaScript".to_string(), "Node.js".to_string()]
    );
}

#[test]
fn shared_skills_accumulate_across_languages() {
    let now = Utc::now();
    let repos = vec![
        repo("widget", Some("Vue"), 3_000, Some(now)),
        repo("server", Some("JavaScript"), 4_000, Some(now)),
    ];

    let validations = score_repositories(&repos, now);
    let js = validations.iter().find(|v| v.skill == "JavaScript").unwrap();

    assert_eq!(js.evidence.repositories.len(), 2);
    assert_eq!(js.evidence.lines_of_code, 7_000);
    assert_eq!(js.confidence, 62);
}

#[test]
fn proficiency_level_follows_confidence() {
    assert_eq!(proficiency_level(0), 1);
    assert_eq!(proficiency_level(30), 2);
    assert_eq!(proficiency_level(52), 3);
    assert_eq!(proficiency_level(80), 4);
    assert_eq!(proficiency_level(81), 5);
    assert_eq!(proficiency_level(100), 5);
}

#[test]
fn top_validations_limits_without_reordering() {
    let now = Utc::now();
    let repos: Vec<_> = ["Rust", "Go", "Python", "Java"]
        .iter()
        .map(|lang| repo(lang, Some(lang), 20_000, Some(now)))
        .collect();
    let validations = score_repositories(&repos, now);

    let top = top_validations(&validations, 2);

    assert_eq!(top.len(), 2);
    assert_eq!(top, &validations[..2]);
    assert_eq!(top_validations(&validations, 50).len(), validations.len());
}

#[test]
fn huge_repository_sizes_saturate_instead_of_overflowing() {
    let now = Utc::now();
    let repos = vec![
        repo("a", Some("Rust"), u64::MAX, Some(now)),
        repo("b", Some("Rust"), 1, Some(now)),
    ];

    let validations = score_repositories(&repos, now);

    assert_eq!(validations.len(), 1);
    assert_eq!(validations[0].evidence.lines_of_code, u64::MAX);
    assert_eq!(validations[0].evidence.project_complexity, ProjectComplexity::Advanced);
    assert_eq!(validations[0].confidence, 85);
}

#[test]
fn confidence_never_drops_as_repositories_are_added() {
    for size in [0, 5_000, 30_000, 1_000_000] {
        for recent in [false, true] {
            for n in 1..=10 {
                assert!(
                    confidence(n + 1, size, recent) >= confidence(n, size, recent),
                    "n={n} size={size} recent={recent}"
                );
            }
        }
    }
}

#[test]
fn emitted_confidence_stays_within_bounds() {
    let languages = [Some("Rust"), Some("TypeScript"), Some("Go"), Some("JavaScript"), Some("Python"), None];
    let now = Utc::now();
    let mut rng = rand::thread_rng();

    for _ in 0..200 {
        let count = rng.gen_range(0..70);
        let repos: Vec<_> = (0..count)
            .map(|i| {
                let language = *languages.choose(&mut rng).unwrap();
                let size = rng.gen_range(0..200_000);
                let pushed_at = now - Duration::days(rng.gen_range(0..800));
                repo(&format!("repo-{}", i % 40), language, size, Some(pushed_at))
            })
            .collect();

        for v in score_repositories(&repos, now) {
            assert!((MIN_CONFIDENCE..=100).contains(&v.confidence), "{v:?}");
        }
    }
}

#[test]
fn repeated_repository_names_count_once_per_skill() {
    let now = Utc::now();
    let repos = vec![
        repo("service", Some("Rust"), 20_000, Some(now)),
        repo("service", Some("Rust"), 20_000, Some(now)),
    ];

    let validations = score_repositories(&repos, now);

    assert_eq!(validations[0].evidence.repositories.len(), 1);
    assert_eq!(validations[0].evidence.lines_of_code, 20_000);
    assert_eq!(validations[0].confidence, confidence(1, 20_000, true));
}

#[test]
fn evidence_serializes_with_camel_case_fields() {
    let now = Utc::now();
    let repos = vec![repo("dashboard", Some("Rust"), 12_000, Some(now))];

    let value = serde_json::to_value(&score_repositories(&repos, now)[0]).unwrap();

    assert_eq!(value["skill"], "Rust");
    assert_eq!(value["evidence"]["linesOfCode"], 12_000);
    assert_eq!(value["evidence"]["recentUsage"], true);
    assert_eq!(value["evidence"]["projectComplexity"], "intermediate");
    assert_eq!(value["evidence"]["repositories"][0], "dashboard");
}
