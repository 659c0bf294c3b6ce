//! Qualified-investor gate.
//!
//! Return and yield figures may only be discussed with qualified investors.
//! The gate asks the qualification question once per conversation and, once
//! answered, points the client to the matching form. Its phase is derived
//! from the conversation history on every call; nothing is stored.

use database::{InvestorStatus, Role};

use crate::store::HistoryEntry;

/// Text that identifies the qualification question in assistant messages.
pub const QUALIFICATION_MARKER: &str = "האם אתה משקיע כשיר";

/// Identifies a delivered qualified-investor instruction set.
pub const QUALIFIED_INSTRUCTIONS_MARKER: &str = "טופס הצהרת המשקיע הכשיר";

/// Identifies a delivered marketing-agreement instruction set.
pub const AGREEMENT_INSTRUCTIONS_MARKER: &str = "הסכם שיווק השקעות";

const RETURNS_KEYWORDS: &[&str] = &[
    "תשואה",
    "תשואות",
    "ריבית",
    "קופון",
    "רווח",
    "רווחים",
    "החזר",
    "אחוזים",
    "תשלום תקופתי",
    "yield",
    "coupon",
    "profit",
    "return",
    "percentage",
    "periodic payment",
];

const AGREEMENT_KEYWORDS: &[&str] = &["הסכם", "חוזה", "התקשרות", "agreement", "contract"];

const AFFIRMATIVE_TOKENS: &[&str] = &["כן", "yes", "yeah", "yep"];
const NEGATIVE_TOKENS: &[&str] = &["לא", "no", "nope"];

const QUALIFIED_INVESTOR_CRITERIA: &str = "משקיע כשיר הוא מי שעומד באחד מהתנאים הבאים:\n\
1. השווי הכולל של הנכסים הנזילים שבבעלותו עולה על 8,364,177 ₪\n\
2. הכנסתו השנתית בכל אחת מהשנתיים האחרונות עולה על 1,254,627 ₪ (או 1,881,940 ₪ להכנסת התא המשפחתי)\n\
3. השווי הכולל של נכסיו הנזילים עולה על 5,227,610 ₪ וגם הכנסתו השנתית עולה על 627,313 ₪ (או 940,969 ₪ לתא משפחתי)";

/// Links to the two client forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormUrls {
    pub qualified_investor: String,
    pub marketing_agreement: String,
}

impl FormUrls {
    /// Form URLs served under `base`.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            qualified_investor: format!("{}/forms/qualified-investor", base),
            marketing_agreement: format!("{}/forms/marketing-agreement", base),
        }
    }
}

impl Default for FormUrls {
    fn default() -> Self {
        Self::from_base("http://localhost:8080")
    }
}

/// How a client answered the qualification question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Affirmative,
    Negative,
    Unclear,
}

/// Classify a reply by its words. Affirmative wins when both appear.
pub fn classify_answer(text: &str) -> Answer {
    let tokens: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect();

    let has = |set: &[&str]| tokens.iter().any(|t| set.contains(&t.as_str()));

    if has(AFFIRMATIVE_TOKENS) {
        Answer::Affirmative
    } else if has(NEGATIVE_TOKENS) {
        Answer::Negative
    } else {
        Answer::Unclear
    }
}

/// Does the message ask about returns, yields or similar figures?
pub fn mentions_returns(text: &str) -> bool {
    let text = text.to_lowercase();
    RETURNS_KEYWORDS.iter().any(|k| text.contains(k))
}

/// Does the message ask about the agreement or contract?
pub fn mentions_agreement(text: &str) -> bool {
    let text = text.to_lowercase();
    AGREEMENT_KEYWORDS.iter().any(|k| text.contains(k))
}

/// Gate phase derived from history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// The question was never asked.
    NotTriggered,
    /// Asked; no definitive answer follows it.
    QuestionAsked,
    /// Answered; instructions not yet delivered.
    Answered(InvestorStatus),
    /// Answered and the matching instructions were delivered.
    Resolved(InvestorStatus),
}

impl GateState {
    pub fn derive(history: &[HistoryEntry]) -> Self {
        let Some(question) = history
            .iter()
            .rposition(|e| e.role == Role::Assistant && e.content.contains(QUALIFICATION_MARKER))
        else {
            return GateState::NotTriggered;
        };

        let status = match history.get(question + 1) {
            Some(next) if next.role == Role::User => match classify_answer(&next.content) {
                Answer::Affirmative => InvestorStatus::Qualified,
                Answer::Negative => InvestorStatus::NotQualified,
                Answer::Unclear => return GateState::QuestionAsked,
            },
            _ => return GateState::QuestionAsked,
        };

        let marker = match status {
            InvestorStatus::Qualified => QUALIFIED_INSTRUCTIONS_MARKER,
            _ => AGREEMENT_INSTRUCTIONS_MARKER,
        };
        let delivered = history[question + 2..]
            .iter()
            .any(|e| e.role == Role::Assistant && e.content.contains(marker));

        if delivered {
            GateState::Resolved(status)
        } else {
            GateState::Answered(status)
        }
    }
}

/// What the gate wants the orchestrator to do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    AskQuestion,
    QualifiedInstructions,
    AgreementInstructions,
    /// Not definitive; let the model answer.
    PassThrough,
}

/// Result of evaluating one incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    pub decision: GateDecision,
    /// Phase before the incoming message.
    pub state: GateState,
    /// Set when the incoming message answers a pending question.
    pub answer: Option<InvestorStatus>,
}

impl GateOutcome {
    fn new(decision: GateDecision, state: GateState) -> Self {
        Self {
            decision,
            state,
            answer: None,
        }
    }

    pub fn is_definitive(&self) -> bool {
        self.decision != GateDecision::PassThrough
    }
}

/// Reason note stored alongside a recorded qualification status.
pub fn qualification_reason(status: InvestorStatus) -> &'static str {
    match status {
        InvestorStatus::Qualified => "self-declared qualified investor",
        InvestorStatus::NotQualified => "not a qualified investor, referred to marketing agreement",
        InvestorStatus::Unknown => "qualification pending",
    }
}

/// Decides when a message needs the qualification flow and renders its replies.
#[derive(Debug, Clone, Default)]
pub struct QualificationGate {
    forms: FormUrls,
}

impl QualificationGate {
    pub fn new(forms: FormUrls) -> Self {
        Self { forms }
    }

    pub fn forms(&self) -> &FormUrls {
        &self.forms
    }

    /// Evaluate `incoming` against the history that precedes it.
    pub fn evaluate(&self, history: &[HistoryEntry], incoming: &str) -> GateOutcome {
        let state = GateState::derive(history);

        let awaiting_answer = history
            .last()
            .is_some_and(|e| e.role == Role::Assistant && e.content.contains(QUALIFICATION_MARKER));

        if awaiting_answer {
            let answer = match classify_answer(incoming) {
                Answer::Affirmative => Some(InvestorStatus::Qualified),
                Answer::Negative => Some(InvestorStatus::NotQualified),
                Answer::Unclear => None,
            };
            if let Some(status) = answer {
                let mut outcome = GateOutcome::new(Self::instructions_for(status), state);
                outcome.answer = Some(status);
                return outcome;
            }
        }

        if mentions_returns(incoming) {
            match state {
                GateState::NotTriggered => {
                    return GateOutcome::new(GateDecision::AskQuestion, state);
                }
                GateState::Answered(status) | GateState::Resolved(status) => {
                    return GateOutcome::new(Self::instructions_for(status), state);
                }
                GateState::QuestionAsked => {}
            }
        }

        if mentions_agreement(incoming) {
            return GateOutcome::new(GateDecision::AgreementInstructions, state);
        }

        GateOutcome::new(GateDecision::PassThrough, state)
    }

    fn instructions_for(status: InvestorStatus) -> GateDecision {
        match status {
            InvestorStatus::Qualified => GateDecision::QualifiedInstructions,
            _ => GateDecision::AgreementInstructions,
        }
    }

    /// Reply text for a definitive decision.
    pub fn render(&self, decision: GateDecision) -> Option<String> {
        match decision {
            GateDecision::AskQuestion => Some(self.question()),
            GateDecision::QualifiedInstructions => Some(self.qualified_instructions()),
            GateDecision::AgreementInstructions => Some(self.agreement_instructions()),
            GateDecision::PassThrough => None,
        }
    }

    pub fn question(&self) -> String {
        format!(
            "אשמח לספק לך מידע מפורט על התשואות והמוצרים שלנו.\n\n\
             כחברה המפוקחת על ידי רשות ניירות ערך, עלינו לוודא תחילה האם אתה עומד בקריטריונים של משקיע כשיר.\n\n\
             {}?\n\n\
             {}",
            QUALIFICATION_MARKER, QUALIFIED_INVESTOR_CRITERIA
        )
    }

    pub fn qualified_instructions(&self) -> String {
        format!(
            "מצוין! על מנת שנוכל להמשיך, אנא מלא את {} בקישור הבא:\n\
             {}\n\n\
             לאחר מילוי הטופס, נשמח לשלוח לך במייל מידע מפורט על המוצרים והתשואות שלנו.\n\n\
             האם תרצה להשאיר את כתובת המייל שלך? 📧",
            QUALIFIED_INSTRUCTIONS_MARKER, self.forms.qualified_investor
        )
    }

    pub fn agreement_instructions(&self) -> String {
        format!(
            "תודה על הכנות. אני ממליץ להתחיל בחתימה על {} כדי שנוכל להכיר אותך טוב יותר:\n\
             {}\n\n\
             ההסכם כולל:\n\
             - פרטי לקוח בסיסיים\n\
             - שאלון להבנת צרכי ההשקעה שלך\n\
             - מדיניות השקעות\n\
             - פרופיל סיכון\n\n\
             לאחר חתימה על ההסכם, נשמח לקבוע פגישה אישית להכרות מעמיקה יותר ולהתאים עבורך את הפתרון המושלם.\n\n\
             האם יש משהו נוסף שתרצה לדעת על תהליך ההתקשרות? 🤝",
            AGREEMENT_INSTRUCTIONS_MARKER, self.forms.marketing_agreement
        )
    }
}
