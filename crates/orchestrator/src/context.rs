//! System instruction assembly.

use database::Role;

use crate::knowledge::{CoreKnowledge, KnowledgeSource, SalesKnowledge};
use crate::store::HistoryEntry;

/// Base instruction built from the configured company and product text.
pub fn base_system_prompt(knowledge: &SalesKnowledge) -> String {
    format!(
        "אתה נציג שיווק השקעות מקצועי של מובנה גלובל.\n\n\
         מידע בסיסי על החברה:\n{}\n\n\
         מידע על המוצרים:\n{}\n\n\
         חוקים חשובים:\n\
         1. אסור לציין אחוזי תשואה או ריבית ספציפיים\n\
         2. התמקד במידע כללי על החברה והמוצרים\n\
         3. הצע פגישה רק אם הלקוח מביע עניין\n\
         4. היה ידידותי אך מקצועי\n\
         5. תן תשובות מעמיקות המעידות על הבנה פיננסית",
        knowledge.company_description.trim(),
        knowledge.products_description.trim()
    )
}

/// Instruction built from an injected knowledge source.
pub fn enhanced_system_prompt(source: &dyn KnowledgeSource) -> String {
    format!(
        "אתה נציג שיווק השקעות מקצועי ומנוסה של מובנה גלובל, עם הבנה עמוקה במוצרים פיננסיים.\n\n\
         מידע על החברה:\n{}\n\n\
         מידע על המוצרים:\n{}\n\n\
         יתרונות מרכזיים:\n{}\n\n\
         הנחיות חשובות:\n\
         1. תן הסברים מקצועיים ומעמיקים, אבל בשפה ברורה\n\
         2. אסור לציין אחוזי תשואה או ריבית ספציפיים ללא חתימת הסכם\n\
         3. הדגש את היתרונות הייחודיים:\n\
         \u{20}  - נזילות יומית עם מחיר מהמנפיק\n\
         \u{20}  - העסקה ישירה מול הבנק\n\
         \u{20}  - המוצר בחשבון הבנק של הלקוח\n\
         4. התאם את רמת ההסבר לשאלה\n\
         5. השתמש בדוגמאות להמחשה\n\
         6. הוסף אימוג'י אחד מתאים בסוף\n\n\
         ענה בצורה טבעית ומקצועית, כמו יועץ השקעות מנוסה שמסביר ללקוח.",
        source.core(CoreKnowledge::Company),
        source.core(CoreKnowledge::Product),
        source.core(CoreKnowledge::Advantages)
    )
}

/// Context gathered for one model call.
///
/// Knowledge snippets and recent history are appended to a base instruction.
#[derive(Debug, Clone, Default)]
pub struct Context {
    knowledge: Vec<String>,
    history: Vec<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_knowledge(&mut self, snippet: &str) {
        let snippet = snippet.trim();
        if !snippet.is_empty() {
            self.knowledge.push(snippet.to_string());
        }
    }

    /// Keep the last `turns` messages as client/representative lines.
    pub fn add_history(&mut self, history: &[HistoryEntry], turns: usize) {
        let start = history.len().saturating_sub(turns);
        self.history = history[start..]
            .iter()
            .map(|entry| {
                let speaker = match entry.role {
                    Role::User => "לקוח",
                    Role::Assistant => "נציג",
                };
                format!("{}: {}", speaker, entry.content)
            })
            .collect();
    }

    pub fn has_knowledge(&self) -> bool {
        !self.knowledge.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn system_prompt(&self, base: &str) -> String {
        let mut prompt = base.to_string();

        if self.has_knowledge() {
            prompt.push_str("\n\nמידע נוסף מהמסמכים:\n");
            prompt.push_str(&self.knowledge.join("\n"));
        }

        if !self.history.is_empty() {
            prompt.push_str("\n\nהיסטוריית השיחה האחרונה:\n");
            prompt.push_str(&self.history.join("\n"));
        }

        prompt
    }

    /// Short description for logging.
    pub fn format_summary(&self) -> String {
        format!(
            "{} knowledge snippet(s), {} history line(s)",
            self.knowledge.len(),
            self.history.len()
        )
    }
}
