//! Contact details extraction from free text.
//!
//! Best-effort pattern matching over Hebrew and English text. Nothing here
//! resolves identities; the result is a set of candidates for lead storage.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// Israeli mobile, generic local and VoIP numbers.
static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?:\+972|972|05|\+05)[0-9\-\s]{8,10}",
        r"0[0-9\-\s]{8,9}",
        r"07[0-9\-\s]{8}",
    ])
});

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid email regex")
});

static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\b(?:שמי|אני|my name is|i am|i'm)\s+([\x{0590}-\x{05FF}\w\s]{2,25})",
        r"(?i)\b(?:קוראים לי|מדבר|מדברת|they call me|speaking)\s+([\x{0590}-\x{05FF}\w\s]{2,25})",
        r"(?i)\b(?:שלום|היי|hello|hi),?\s+([\x{0590}-\x{05FF}\w\s]{2,25})",
    ])
});

static COMPANY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)(?:חברת|company named|company called)\s+([\x{0590}-\x{05FF}\w\s]{2,30})",
        r"(?i)(?:עובד ב|עובדת ב|works at |work at )([\x{0590}-\x{05FF}\w\s]{2,30})",
        r#"(?i)(?:מנכ"ל|ceo of)\s+([\x{0590}-\x{05FF}\w\s]{2,30})"#,
    ])
});

const INVESTOR_GROUPS: &[(&str, &[&str])] = &[
    (
        "accredited",
        &[
            "משקיע מוסדי",
            "כשיר",
            "מנוסה",
            "תיק השקעות גדול",
            "ניסיון בשוק ההון",
            "accredited",
            "institutional investor",
            "qualified investor",
            "experienced investor",
        ],
    ),
    (
        "high_net_worth",
        &[
            "תיק השקעות של מעל",
            "נכסים נזילים",
            "הון עצמי",
            "השקעות משמעותיות",
            "high net worth",
            "liquid assets",
            "net worth",
            "significant investments",
        ],
    ),
    (
        "professional",
        &[
            "מנהל תיקים",
            "יועץ השקעות",
            "ברוקר",
            "סוחר מקצועי",
            "portfolio manager",
            "investment advisor",
            "broker",
            "professional trader",
        ],
    ),
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid contact regex"))
        .collect()
}

/// Extracted candidates, one ordered set per bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactCandidate {
    pub phone: Vec<String>,
    pub email: Vec<String>,
    pub name: Vec<String>,
    pub investor_type: Vec<String>,
    pub company: Vec<String>,
}

impl ContactCandidate {
    pub fn is_empty(&self) -> bool {
        self.pairs().next().is_none()
    }

    /// `(bucket, value)` pairs in bucket order.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        let buckets: [(&'static str, &Vec<String>); 5] = [
            ("phone", &self.phone),
            ("email", &self.email),
            ("name", &self.name),
            ("investor_type", &self.investor_type),
            ("company", &self.company),
        ];
        buckets
            .into_iter()
            .flat_map(|(bucket, values)| values.iter().map(move |v| (bucket, v.as_str())))
    }

    /// Add values not already present, keeping first-seen order.
    pub fn merge(&mut self, other: ContactCandidate) {
        push_unique(&mut self.phone, other.phone);
        push_unique(&mut self.email, other.email);
        push_unique(&mut self.name, other.name);
        push_unique(&mut self.investor_type, other.investor_type);
        push_unique(&mut self.company, other.company);
    }
}

fn push_unique(target: &mut Vec<String>, values: impl IntoIterator<Item = String>) {
    for value in values {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}

/// Pulls phone numbers, emails, names, investor signals and companies out of text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactExtractor;

impl ContactExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> ContactCandidate {
        let mut candidate = ContactCandidate::default();

        let phones = PHONE_PATTERNS
            .iter()
            .flat_map(|re| re.find_iter(text))
            .map(|m| clean_phone(m.as_str()))
            .filter(|p| p.len() >= 9);
        push_unique(&mut candidate.phone, phones);

        let emails = EMAIL_PATTERN
            .find_iter(text)
            .map(|m| m.as_str().trim().to_lowercase())
            .filter(|e| e.contains('@') && e.contains('.'));
        push_unique(&mut candidate.email, emails);

        push_unique(&mut candidate.name, captures(&NAME_PATTERNS, text, 40));
        push_unique(&mut candidate.company, captures(&COMPANY_PATTERNS, text, 50));

        let lowered = text.to_lowercase();
        let investor_types = INVESTOR_GROUPS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(label, _)| label.to_string());
        push_unique(&mut candidate.investor_type, investor_types);

        candidate
    }

    /// Extract from several messages, merging buckets in message order.
    pub fn extract_all<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> ContactCandidate {
        texts
            .into_iter()
            .fold(ContactCandidate::default(), |mut acc, text| {
                acc.merge(self.extract(text));
                acc
            })
    }
}

/// Keep digits and `+` only.
fn clean_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect()
}

fn captures(patterns: &[Regex], text: &str, max_chars: usize) -> Vec<String> {
    patterns
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| (2..=max_chars).contains(&v.chars().count()))
        .collect()
}
