//! Shareable 1200x630 profile card rendered as SVG.

use std::fmt::Write;

use crate::entities::{profile::DeveloperProfile, skill::UserSkill};

pub const CARD_WIDTH: u32 = 1200;
pub const CARD_HEIGHT: u32 = 630;
pub const MAX_CARD_SKILLS: usize = 5;
const MAX_TEXT_CHARS: usize = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct SocialCard {
    pub full_name: String,
    pub title: String,
    pub skills: Vec<String>,
    pub github_username: Option<String>,
    pub github_public_repos: Option<i32>,
    pub github_followers: Option<i32>,
}

impl SocialCard {
    /// Skills arrive in display order; only the first five make it onto the card.
    pub fn from_profile(profile: &DeveloperProfile, skills: &[UserSkill]) -> Self {
        SocialCard {
            full_name: profile.full_name.clone(),
            title: profile.title.clone(),
            skills: skills.iter().take(MAX_CARD_SKILLS).map(|s| s.name.clone()).collect(),
            github_username: profile.github.as_ref().map(|g| g.username.clone()),
            github_public_repos: profile.github.as_ref().map(|g| g.public_repos),
            github_followers: profile.github.as_ref().map(|g| g.followers),
        }
    }
}

pub fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    escaped
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn text(value: &str) -> String {
    xml_escape(&truncate(value.trim(), MAX_TEXT_CHARS))
}

pub fn render_social_card(card: &SocialCard) -> String {
    let mut svg = String::with_capacity(2048);

    // Writing into a String cannot fail.
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"##,
        w = CARD_WIDTH,
        h = CARD_HEIGHT
    );
    svg.push_str(
        r##"<defs><linearGradient id="bg" x1="0" y1="0" x2="1" y2="1"><stop offset="0%" stop-color="#0f172a"/><stop offset="100%" stop-color="#1e3a8a"/></linearGradient></defs>"##,
    );
    let _ = write!(svg, r##"<rect width="{CARD_WIDTH}" height="{CARD_HEIGHT}" fill="url(#bg)"/>"##);
    svg.push_str(
        r##"<text x="80" y="110" font-family="Inter, sans-serif" font-size="32" fill="#93c5fd" font-weight="600">chosn</text>"##,
    );
    let _ = write!(
        svg,
        r##"<text x="80" y="250" font-family="Inter, sans-serif" font-size="72" fill="#ffffff" font-weight="700">{}</text>"##,
        text(&card.full_name)
    );
    let _ = write!(
        svg,
        r##"<text x="80" y="320" font-family="Inter, sans-serif" font-size="36" fill="#cbd5e1">{}</text>"##,
        text(&card.title)
    );

    let mut x = 80;
    for skill in card.skills.iter().take(MAX_CARD_SKILLS) {
        let label = text(skill);
        let width = 40 + 18 * truncate(skill.trim(), MAX_TEXT_CHARS).chars().count() as u32;
        let _ = write!(
            svg,
            r##"<rect x="{x}" y="380" rx="24" width="{width}" height="56" fill="#1d4ed8"/><text x="{tx}" y="417" font-family="Inter, sans-serif" font-size="26" fill="#ffffff">{label}</text>"##,
            tx = x + 20
        );
        x += width + 16;
    }

    if let Some(username) = &card.github_username {
        let _ = write!(
            svg,
            r##"<text x="80" y="540" font-family="Inter, sans-serif" font-size="28" fill="#e2e8f0">github.com/{} · {} repos · {} followers</text>"##,
            text(username),
            card.github_public_repos.unwrap_or(0),
            card.github_followers.unwrap_or(0)
        );
    }

    svg.push_str("</svg>");
    svg
}
