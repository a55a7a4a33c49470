//! Canned triage assistant for CHWs.
//!
//! Recognises a fixed set of quick prompts and answers each with a prepared
//! summary. No language model is involved.

use serde::Serialize;

pub const GREETING: &str = "Hello! I'm your AI health assistant. I can help you analyze patient data, identify risks, and recommend interventions. How can I assist you today?";

pub const FALLBACK_RESPONSE: &str = "I understand you're asking about patient health management. Based on the current data, I can help you with risk analysis, vital sign monitoring, and intervention recommendations. Could you be more specific about what you'd like to know?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantIntent {
    HighRiskVitals,
    RiskAnalysis,
    WeeklyTrends,
}

impl AssistantIntent {
    pub const ALL: [AssistantIntent; 3] = [
        AssistantIntent::HighRiskVitals,
        AssistantIntent::RiskAnalysis,
        AssistantIntent::WeeklyTrends,
    ];

    /// Button label for the quick prompt.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighRiskVitals => "Check patient vitals",
            Self::RiskAnalysis => "Risk analysis",
            Self::WeeklyTrends => "Trend summary",
        }
    }

    /// Text sent when the quick prompt is chosen.
    #[must_use]
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::HighRiskVitals => "Show me the latest vitals for high-risk patients",
            Self::RiskAnalysis => "Analyze current risk levels and recommend actions",
            Self::WeeklyTrends => "Summarize health trends from the past week",
        }
    }

    #[must_use]
    pub fn response(&self) -> &'static str {
        match self {
            Self::HighRiskVitals => HIGH_RISK_VITALS,
            Self::RiskAnalysis => RISK_ANALYSIS,
            Self::WeeklyTrends => WEEKLY_TRENDS,
        }
    }

    /// Match a free-text message against the quick prompts.
    #[must_use]
    pub fn recognize(message: &str) -> Option<Self> {
        let message = message.trim();
        Self::ALL
            .into_iter()
            .find(|intent| intent.prompt().eq_ignore_ascii_case(message))
    }
}

const HIGH_RISK_VITALS: &str = "Based on the latest readings:

**James Okonkwo (Risk Score: 85)**
• Heart Rate: 92 bpm (elevated)
• Sleep: 5.2 hrs (below optimal)
• Steps: 1,800/day (low activity)

**Fatima Hassan (Risk Score: 78)**
• Heart Rate: 88 bpm (slightly elevated)
• Sleep: 6.1 hrs
• Steps: 2,100/day

**Grace Nakamura (Risk Score: 72)**
• Heart Rate: 85 bpm
• Sleep: 6.3 hrs
• Steps: 2,400/day

⚠️ Recommendation: Prioritize follow-up with James Okonkwo due to combined elevated HR and low activity pattern.";

const RISK_ANALYSIS: &str = "**Current Risk Analysis:**

🔴 **High Risk (3 patients)**
• James Okonkwo - Past stroke history, elevated HR
• Fatima Hassan - Vision changes reported, stroke history
• Grace Nakamura - High stress, reduced activity

🟡 **Moderate Risk (1 patient)**
• Maria Santos - Occasional palpitations

🟢 **Low Risk (1 patient)**
• Robert Chen - Stable readings

**Recommended Actions:**
1. Urgent: Contact James Okonkwo within 24hrs
2. Schedule BP check for Fatima Hassan
3. Review stress management plan with Grace Nakamura";

const WEEKLY_TRENDS: &str = "**Weekly Health Trend Summary:**

📊 **Overall Patterns:**
• Average adherence: 86% (+4% from last week)
• High-risk patients: 3 (stable)
• New alerts generated: 7

📈 **Positive Trends:**
• Maria Santos showing improved activity (+1,200 steps/day)
• Robert Chen maintaining excellent medication adherence (95%)

📉 **Areas of Concern:**
• James Okonkwo sleep quality declining
• Increased stress reports across 3 patients
• 2 missed medication doses reported

💡 **AI Recommendation:** Focus community wellness session on stress management techniques.";

/// Reply to a CHW message.
///
/// Returns `None` for blank input; unrecognised text gets
/// [`FALLBACK_RESPONSE`].
#[must_use]
pub fn reply(message: &str) -> Option<&'static str> {
    if message.trim().is_empty() {
        return None;
    }

    match AssistantIntent::recognize(message) {
        Some(intent) => {
            tracing::debug!("Assistant matched intent {:?}", intent);
            Some(intent.response())
        }
        None => Some(FALLBACK_RESPONSE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_prompts_round_trip() {
        for intent in AssistantIntent::ALL {
            assert_eq!(AssistantIntent::recognize(intent.prompt()), Some(intent));
            assert_eq!(reply(intent.prompt()), Some(intent.response()));
        }
    }

    #[test]
    fn test_recognition_ignores_case_and_padding() {
        assert_eq!(
            AssistantIntent::recognize("  summarize HEALTH trends from the past week \n"),
            Some(AssistantIntent::WeeklyTrends)
        );
    }

    #[test]
    fn test_fallback() {
        assert_eq!(reply("How is Grace doing?"), Some(FALLBACK_RESPONSE));
        assert_eq!(AssistantIntent::recognize("show me vitals"), None);
    }

    #[test]
    fn test_blank_input_has_no_reply() {
        assert_eq!(reply(""), None);
        assert_eq!(reply("   \t"), None);
    }

    #[test]
    fn test_responses_are_distinct() {
        let responses: std::collections::HashSet<_> =
            AssistantIntent::ALL.iter().map(|i| i.response()).collect();
        assert_eq!(responses.len(), 3);
        assert!(!responses.contains(FALLBACK_RESPONSE));
    }
}
