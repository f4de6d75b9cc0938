// src/prompt/mod.rs
//! Assembles the system instruction for a chat turn.
//!
//! Pure composition: base persona, then optional profile / emotion blocks.
//! No storage or network access here; everything is passed in.

use crate::emotion::EmotionLabel;
use crate::memory::UserProfile;
use crate::persona::Persona;

/// Build the system prompt for one turn.
///
/// Starts from the persona's base instruction and appends, in order:
/// - a user-profile block listing only the attributes actually present;
/// - an attunement block when the current emotion is not neutral;
/// - a continuity block when the prior emotion is non-neutral and differs
///   from the current one.
///
/// With no profile attributes and both emotions neutral the result is
/// exactly the base persona string.
pub fn build_system_prompt(
    persona: Persona,
    profile: Option<&UserProfile>,
    current: EmotionLabel,
    prior: EmotionLabel,
) -> String {
    let mut prompt = persona.prompt().to_string();

    if let Some(profile) = profile {
        let mut lines = Vec::new();
        if let Some(age_range) = &profile.age_range {
            lines.push(format!("- 年龄段：{age_range}"));
        }
        if let Some(personality) = &profile.personality {
            lines.push(format!("- 性格特点：{personality}"));
        }
        if let Some(style) = &profile.communication_style {
            lines.push(format!("- 沟通风格：{style}"));
        }
        if let Some(interests) = &profile.interests {
            lines.push(format!("- 兴趣爱好：{interests}"));
        }
        if !lines.is_empty() {
            prompt.push_str("\n\n【用户画像】\n");
            prompt.push_str(&lines.join("\n"));
        }
    }

    if current != EmotionLabel::Neutral {
        prompt.push_str(&format!(
            "\n\n【当前情绪】用户此刻的情绪状态是「{}」。请先贴合这种情绪去回应，共情在前，内容在后。",
            current.zh()
        ));
    }

    if prior != EmotionLabel::Neutral && prior != current {
        prompt.push_str(&format!(
            "\n\n【情绪变化】用户上次交流时的情绪是「{}」，现在是「{}」。请自然地留意并温和回应这种变化。",
            prior.zh(),
            current.zh()
        ));
    }

    prompt
}
