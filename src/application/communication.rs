//! Synthetic communication log generation.
//!
//! Every patient receives the same scripted fortnight of check-ins: seven
//! WhatsApp bot exchanges, seven SMS replies and seven IVR transcripts. The
//! symptom, mood, keyword and severity annotations are authored alongside the
//! text; nothing is extracted at runtime.

use chrono::{DateTime, Duration, Utc};

use super::to_strings;
use super::wearable::simulation_epoch;
use crate::domain::{Channel, CommunicationLogEntry, Direction, Mood, Severity};

/// Days (1-based, from the simulation epoch) on which each channel is used.
pub const CONTACT_DAYS: [i64; 7] = [1, 2, 3, 5, 7, 10, 14];

/// Entries per generated log: one per channel per day, plus the WhatsApp bot prompts.
pub const ENTRIES_PER_LOG: usize = Channel::ALL.len() * CONTACT_DAYS.len() + CONTACT_DAYS.len();

/// Delay between a WhatsApp bot prompt and the patient's reply.
const WHATSAPP_REPLY_DELAY_HOURS: i64 = 1;

/// A scripted inbound message with its annotations.
struct Template {
    text: &'static str,
    symptoms: &'static [&'static str],
    mood: Mood,
    severity: Severity,
    keywords: &'static [&'static str],
}

/// A WhatsApp bot prompt and the patient's scripted reply.
struct Exchange {
    prompt: &'static str,
    reply: Template,
}

const WHATSAPP_EXCHANGES: [Exchange; 7] = [
    Exchange {
        prompt: "Good morning! How are you feeling today? Any headaches, chest pain, or dizziness?",
        reply: Template {
            text: "Feeling okay today. Slight headache in the morning but took my medication.",
            symptoms: &["headache"],
            mood: Mood::Neutral,
            severity: Severity::Low,
            keywords: &["headache"],
        },
    },
    Exchange {
        prompt: "Thank you for checking in. Did you take your BP medication today?",
        reply: Template {
            text: "Yes, I took it after breakfast. My readings were 140/90 this morning.",
            symptoms: &[],
            mood: Mood::Neutral,
            severity: Severity::Moderate,
            keywords: &["BP"],
        },
    },
    Exchange {
        prompt: "How was your sleep last night?",
        reply: Template {
            text: "Not great, woke up several times. Feeling tired today.",
            symptoms: &["fatigue", "poor sleep"],
            mood: Mood::Negative,
            severity: Severity::Moderate,
            keywords: &["tired"],
        },
    },
    Exchange {
        prompt: "Any chest discomfort or breathing difficulties today?",
        reply: Template {
            text: "Mild chest tightness this morning but it reduced after resting.",
            symptoms: &["chest tightness"],
            mood: Mood::Neutral,
            severity: Severity::High,
            keywords: &["chest pain", "chest tightness"],
        },
    },
    Exchange {
        prompt: "Have you been monitoring your blood pressure at home?",
        reply: Template {
            text: "Yes, it was a bit high yesterday - 150/95. Today seems better.",
            symptoms: &[],
            mood: Mood::Neutral,
            severity: Severity::Moderate,
            keywords: &["high BP"],
        },
    },
    Exchange {
        prompt: "How is your stress level this week?",
        reply: Template {
            text: "Work has been stressful. Having trouble relaxing at night.",
            symptoms: &["stress", "anxiety"],
            mood: Mood::Negative,
            severity: Severity::Moderate,
            keywords: &["stress"],
        },
    },
    Exchange {
        prompt: "Final check-in for the week. How are you overall?",
        reply: Template {
            text: "Feeling better. Following the diet plan and walking more.",
            symptoms: &[],
            mood: Mood::Positive,
            severity: Severity::Low,
            keywords: &[],
        },
    },
];

const SMS_MESSAGES: [Template; 7] = [
    Template {
        text: "BP check ok yesterday. Feeling fine today.",
        symptoms: &[],
        mood: Mood::Positive,
        severity: Severity::Low,
        keywords: &[],
    },
    Template {
        text: "Missed morning dose. Took it at lunch instead.",
        symptoms: &[],
        mood: Mood::Neutral,
        severity: Severity::Moderate,
        keywords: &["missed dose"],
    },
    Template {
        text: "Headache since morning. Drank water and resting.",
        symptoms: &["headache"],
        mood: Mood::Neutral,
        severity: Severity::Moderate,
        keywords: &["headache"],
    },
    Template {
        text: "Feeling dizzy when standing up quickly.",
        symptoms: &["dizziness"],
        mood: Mood::Negative,
        severity: Severity::High,
        keywords: &["dizziness"],
    },
    Template {
        text: "Good day. Walked 30 minutes. BP 135/85.",
        symptoms: &[],
        mood: Mood::Positive,
        severity: Severity::Low,
        keywords: &[],
    },
    Template {
        text: "Tired. Not sleeping well. Worried about work.",
        symptoms: &["fatigue", "poor sleep", "stress"],
        mood: Mood::Negative,
        severity: Severity::Moderate,
        keywords: &["tired", "stress"],
    },
    Template {
        text: "All meds taken. Feeling normal today.",
        symptoms: &[],
        mood: Mood::Positive,
        severity: Severity::Low,
        keywords: &[],
    },
];

const IVR_TRANSCRIPTS: [Template; 7] = [
    Template {
        text: "I'm doing alright today. Took my medications as prescribed. No major complaints.",
        symptoms: &[],
        mood: Mood::Positive,
        severity: Severity::Low,
        keywords: &[],
    },
    Template {
        text: "I felt some dizziness when I woke up but it passed after eating.",
        symptoms: &["dizziness"],
        mood: Mood::Neutral,
        severity: Severity::Moderate,
        keywords: &["dizziness"],
    },
    Template {
        text: "My blood pressure reading was high this morning. I'm a bit worried.",
        symptoms: &["anxiety"],
        mood: Mood::Negative,
        severity: Severity::Moderate,
        keywords: &["high BP", "worried"],
    },
    Template {
        text: "I felt chest tightness last night. It lasted about 10 minutes then went away.",
        symptoms: &["chest tightness"],
        mood: Mood::Negative,
        severity: Severity::High,
        keywords: &["chest pain", "chest tightness"],
    },
    Template {
        text: "Feeling much better today. Following the low salt diet. Energy is good.",
        symptoms: &[],
        mood: Mood::Positive,
        severity: Severity::Low,
        keywords: &[],
    },
    Template {
        text: "Had palpitations yesterday evening. Was stressed about family matters.",
        symptoms: &["palpitations", "stress"],
        mood: Mood::Negative,
        severity: Severity::High,
        keywords: &["palpitations", "stress"],
    },
    Template {
        text: "Everything is fine. Taking medications regularly. Blood pressure is stable.",
        symptoms: &[],
        mood: Mood::Positive,
        severity: Severity::Low,
        keywords: &[],
    },
];

/// Assigns sequential `cl-<patient>-<n>` ids in generation order.
struct LogBuilder<'a> {
    patient_id: &'a str,
    next_id: usize,
    entries: Vec<CommunicationLogEntry>,
}

impl<'a> LogBuilder<'a> {
    fn new(patient_id: &'a str) -> Self {
        Self {
            patient_id,
            next_id: 0,
            entries: Vec::with_capacity(ENTRIES_PER_LOG),
        }
    }

    fn push_inbound(&mut self, channel: Channel, timestamp: DateTime<Utc>, template: &Template) {
        self.push(CommunicationLogEntry {
            id: String::new(),
            patient_id: self.patient_id.to_string(),
            channel,
            timestamp,
            direction: Direction::Inbound,
            message: template.text.to_string(),
            extracted_symptoms: to_strings(template.symptoms),
            mood: template.mood,
            risk_keywords: to_strings(template.keywords),
            severity: template.severity,
        });
    }

    fn push_bot_prompt(&mut self, timestamp: DateTime<Utc>, prompt: &str) {
        self.push(CommunicationLogEntry {
            id: String::new(),
            patient_id: self.patient_id.to_string(),
            channel: Channel::WhatsApp,
            timestamp,
            direction: Direction::Outbound,
            message: prompt.to_string(),
            extracted_symptoms: Vec::new(),
            mood: Mood::Neutral,
            risk_keywords: Vec::new(),
            severity: Severity::Low,
        });
    }

    fn push(&mut self, mut entry: CommunicationLogEntry) {
        entry.id = format!("cl-{}-{}", self.patient_id, self.next_id);
        self.next_id += 1;
        self.entries.push(entry);
    }

    fn finish(mut self) -> Vec<CommunicationLogEntry> {
        // Stable: entries sharing a timestamp keep channel order.
        self.entries.sort_by_key(|e| e.timestamp);
        self.entries
    }
}

/// Generate a patient's communication log, sorted ascending by timestamp.
///
/// The output always has [`ENTRIES_PER_LOG`] entries.
#[must_use]
pub fn generate_communication_logs(patient_id: &str) -> Vec<CommunicationLogEntry> {
    let epoch = simulation_epoch();
    let mut log = LogBuilder::new(patient_id);

    for channel in Channel::ALL {
        for (idx, day) in CONTACT_DAYS.iter().enumerate() {
            let sent_at = epoch + Duration::days(day - 1);

            match channel {
                Channel::WhatsApp => {
                    let exchange = &WHATSAPP_EXCHANGES[idx];
                    log.push_bot_prompt(sent_at, exchange.prompt);
                    log.push_inbound(
                        channel,
                        sent_at + Duration::hours(WHATSAPP_REPLY_DELAY_HOURS),
                        &exchange.reply,
                    );
                }
                Channel::Sms => log.push_inbound(channel, sent_at, &SMS_MESSAGES[idx]),
                Channel::Ivr => log.push_inbound(channel, sent_at, &IVR_TRANSCRIPTS[idx]),
            }
        }
    }

    log.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_shape() {
        let logs = generate_communication_logs("P001");

        assert_eq!(ENTRIES_PER_LOG, 28);
        assert_eq!(logs.len(), ENTRIES_PER_LOG);
        assert!(logs.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(logs.iter().all(|e| e.patient_id == "P001"));
    }

    #[test]
    fn test_channel_counts() {
        let logs = generate_communication_logs("P002");
        let count = |c: Channel| logs.iter().filter(|e| e.channel == c).count();

        assert_eq!(count(Channel::WhatsApp), 14);
        assert_eq!(count(Channel::Sms), 7);
        assert_eq!(count(Channel::Ivr), 7);

        let outbound: Vec<_> = logs.iter().filter(|e| !e.is_inbound()).collect();
        assert_eq!(outbound.len(), 7);
        assert!(outbound.iter().all(|e| e.channel == Channel::WhatsApp
            && e.severity == Severity::Low
            && e.extracted_symptoms.is_empty()));
    }

    #[test]
    fn test_ids_are_unique_and_scoped() {
        let logs = generate_communication_logs("P005");
        let mut ids: Vec<_> = logs.iter().map(|e| e.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ENTRIES_PER_LOG);
        assert!(ids.iter().all(|id| id.starts_with("cl-P005-")));
    }

    #[test]
    fn test_first_day_ordering() {
        let logs = generate_communication_logs("P003");
        let epoch = simulation_epoch();

        // Midnight of day 1: bot prompt, SMS, IVR (channel order), then the reply an hour later.
        assert_eq!(logs[0].timestamp, epoch);
        assert_eq!(logs[0].direction, Direction::Outbound);
        assert_eq!(logs[1].channel, Channel::Sms);
        assert_eq!(logs[2].channel, Channel::Ivr);
        assert_eq!(logs[3].channel, Channel::WhatsApp);
        assert_eq!(logs[3].timestamp, epoch + Duration::hours(1));
        assert_eq!(logs[3].extracted_symptoms, vec!["headache".to_string()]);
    }

    #[test]
    fn test_last_day_is_day_fourteen() {
        let logs = generate_communication_logs("P004");
        let last = logs.last().expect("non-empty");
        assert_eq!(last.timestamp, simulation_epoch() + Duration::days(13) + Duration::hours(1));
        assert_eq!(last.mood, Mood::Positive);
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate_communication_logs("P001"), generate_communication_logs("P001"));
    }
}
