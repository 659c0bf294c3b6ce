//! Knowledge files and keyword knowledge lookup.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::error::KnowledgeError;

/// One canned reply entry from `sales_responses.yaml`.
///
/// Entries missing either field are kept here and skipped by the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SalesResponseEntry {
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl SalesResponseEntry {
    pub fn new(pattern: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            response: Some(response.into()),
        }
    }
}

/// Category name to entries, in file order.
pub type SalesResponses = IndexMap<String, Vec<SalesResponseEntry>>;

#[derive(Debug, Default, Deserialize)]
struct DescriptionFile {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LegalFile {
    #[serde(default)]
    disclaimer: Option<String>,
}

/// Static content loaded from the config directory.
#[derive(Debug, Clone, Default)]
pub struct SalesKnowledge {
    pub company_description: String,
    pub products_description: String,
    /// Overrides the built-in disclaimer when present.
    pub legal_disclaimer: Option<String>,
    /// Kept as raw YAML for callers; no prompt or gate reads it.
    pub client_questionnaire: serde_yaml::Value,
    pub sales_responses: SalesResponses,
}

impl SalesKnowledge {
    pub const COMPANY_FILE: &'static str = "company_info.yaml";
    pub const PRODUCTS_FILE: &'static str = "products.yaml";
    pub const LEGAL_FILE: &'static str = "legal.yaml";
    pub const QUESTIONNAIRE_FILE: &'static str = "client_questionnaire.yaml";
    pub const SALES_RESPONSES_FILE: &'static str = "sales_responses.yaml";

    /// Load every knowledge file from `dir`.
    ///
    /// Never fails: a missing or unreadable file is logged and its section is
    /// left empty.
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();

        let company: DescriptionFile = load_section(dir, Self::COMPANY_FILE);
        let products: DescriptionFile = load_section(dir, Self::PRODUCTS_FILE);
        let legal: LegalFile = load_section(dir, Self::LEGAL_FILE);
        let questionnaire: serde_yaml::Value = load_section(dir, Self::QUESTIONNAIRE_FILE);
        let raw_responses: IndexMap<String, serde_yaml::Value> =
            load_section(dir, Self::SALES_RESPONSES_FILE);

        Self {
            company_description: company.description.unwrap_or_default(),
            products_description: products.description.unwrap_or_default(),
            legal_disclaimer: legal.disclaimer.filter(|d| !d.trim().is_empty()),
            client_questionnaire: questionnaire,
            sales_responses: normalize_responses(raw_responses),
        }
    }
}

fn load_section<T>(dir: &Path, file: &str) -> T
where
    T: for<'de> Deserialize<'de> + Default,
{
    let path = dir.join(file);
    if !path.exists() {
        error!("Knowledge file not found: {}", path.display());
        return T::default();
    }

    match read_yaml(&path) {
        Ok(Some(value)) => {
            info!("Loaded {}", file);
            value
        }
        Ok(None) => {
            warn!("Knowledge file is empty: {}", path.display());
            T::default()
        }
        Err(e) => {
            error!("{}", e);
            T::default()
        }
    }
}

fn read_yaml<T>(path: &Path) -> Result<Option<T>, KnowledgeError>
where
    T: for<'de> Deserialize<'de>,
{
    let raw = fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
        path: path.display().to_string(),
        source,
    })?;

    if raw.trim().is_empty() {
        return Ok(None);
    }

    serde_yaml::from_str::<Option<T>>(&raw).map_err(|source| KnowledgeError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Keep list-valued categories and the mapping entries inside them.
fn normalize_responses(raw: IndexMap<String, serde_yaml::Value>) -> SalesResponses {
    let mut responses = SalesResponses::new();
    for (category, value) in raw {
        let serde_yaml::Value::Sequence(items) = value else {
            warn!("Skipping sales response category {}: not a list", category);
            continue;
        };

        let entries = items
            .into_iter()
            .filter_map(|item| serde_yaml::from_value::<SalesResponseEntry>(item).ok())
            .collect();
        responses.insert(category, entries);
    }
    responses
}

/// Background sections used in the enhanced system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreKnowledge {
    Company,
    Product,
    Advantages,
}

/// A knowledge lookup capability injected into the orchestrator.
pub trait KnowledgeSource: Send + Sync {
    /// Static background text for a section.
    fn core(&self, kind: CoreKnowledge) -> String;

    /// Snippets relevant to the user's message, in a stable order.
    fn lookup(&self, query: &str) -> Vec<String>;
}

struct KeywordTopic {
    keywords: &'static [&'static str],
    response: &'static str,
}

const TOPICS: &[KeywordTopic] = &[
    // risk / protection
    KeywordTopic {
        keywords: &["סיכון", "הגנה", "בטוח", "בטחון", "אבטחה"],
        response: "המוצרים שלנו מגיעים עם מנגנוני הגנה מובנים.\n\
                   כל השקעה כרוכה בסיכונים, אך אנו מתמחים בהתאמת רמת הסיכון לצרכי הלקוח.\n\
                   המוצרים שלנו מציעים רמות הגנה שונות בהתאם להעדפות הלקוח.",
    },
    // returns
    KeywordTopic {
        keywords: &["תשואה", "רווח", "החזר", "ריבית", "רווחים"],
        response: "המוצרים שלנו מציעים פוטנציאל תשואה בהתאם לתנאי השוק ורמת הסיכון.\n\
                   אנו מתמחים בבניית מוצרים עם יחס סיכון-תשואה אטרקטיבי.\n\
                   התשואה מותאמת לפרופיל הסיכון של הלקוח ולתנאי השוק.",
    },
    // liquidity
    KeywordTopic {
        keywords: &["נזילות", "משיכה", "פדיון", "זמינות", "גישה"],
        response: "המוצרים שלנו מציעים נזילות יומית עם מחיר מהמנפיק.\n\
                   ניתן לפדות את ההשקעה בכל יום מסחר.\n\
                   אין תקופת נעילה והכסף נשאר נזיל.",
    },
    // investment process
    KeywordTopic {
        keywords: &["תהליך", "השקעה", "להשקיע", "להתחיל", "התחלה"],
        response: "תהליך ההשקעה מתחיל בפגישת היכרות והתאמה.\n\
                   אנו מתאימים את המוצר לצרכים הספציפיים של כל לקוח.\n\
                   ההשקעה מתבצעת ישירות מול הבנק בחשבון הלקוח.",
    },
];

const COMPANY: &str = "מובנה גלובל הינה חברה לשיווק השקעות בעלת רישיון מרשות ניירות ערך.\n\
                       החברה מתמחה במוצרים פיננסיים מובנים ופועלת בשקיפות מלאה מול לקוחותיה.\n\
                       אנו מספקים פתרונות השקעה מותאמים אישית למשקיעים כשירים.";

const PRODUCT: &str = "המוצרים שלנו הם מכשירים פיננסיים מובנים המונפקים על ידי בנקים בינלאומיים מובילים.\n\
                       המוצרים מאפשרים חשיפה לשווקים הפיננסיים עם הגנות מובנות.\n\
                       כל מוצר מותאם לצרכי הלקוח ומאפשר נזילות יומית.";

const ADVANTAGES: &str = "1. נזילות יומית עם מחיר מהמנפיק\n\
                          2. העסקה ישירה מול הבנק ללא צד שלישי\n\
                          3. המוצר נמצא בחשבון הבנק של הלקוח\n\
                          4. שקיפות מלאה בתמחור ובתנאים\n\
                          5. התאמה אישית לצרכי הלקוח";

/// Built-in company knowledge with keyword-matched topic snippets.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordKnowledge;

impl KeywordKnowledge {
    pub fn new() -> Self {
        Self
    }
}

impl KnowledgeSource for KeywordKnowledge {
    fn core(&self, kind: CoreKnowledge) -> String {
        match kind {
            CoreKnowledge::Company => COMPANY,
            CoreKnowledge::Product => PRODUCT,
            CoreKnowledge::Advantages => ADVANTAGES,
        }
        .to_string()
    }

    fn lookup(&self, query: &str) -> Vec<String> {
        let query = query.to_lowercase();
        TOPICS
            .iter()
            .filter(|topic| topic.keywords.iter().any(|k| query.contains(k)))
            .map(|topic| topic.response.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_load_full_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), SalesKnowledge::COMPANY_FILE, "description: חברת השקעות\n");
        write(dir.path(), SalesKnowledge::PRODUCTS_FILE, "description: מוצרים מובנים\n");
        write(dir.path(), SalesKnowledge::LEGAL_FILE, "disclaimer: \"\\n\\nאזהרה\"\n");
        write(
            dir.path(),
            SalesKnowledge::QUESTIONNAIRE_FILE,
            "questions:\n  - גיל\n  - ניסיון\n",
        );
        write(
            dir.path(),
            SalesKnowledge::SALES_RESPONSES_FILE,
            "greetings:\n  - pattern: \"שלום|hello\"\n    response: \"DYNAMIC_GREETING!\"\n\
             meetings:\n  - pattern: \"פגישה\"\n    response: \"נשמח להיפגש\"\n  - pattern: \"orphan\"\n",
        );

        let knowledge = SalesKnowledge::load(dir.path());
        assert_eq!(knowledge.company_description, "חברת השקעות");
        assert_eq!(knowledge.products_description, "מוצרים מובנים");
        assert_eq!(knowledge.legal_disclaimer.as_deref(), Some("\n\nאזהרה"));
        assert!(knowledge.client_questionnaire.get("questions").is_some());

        let categories: Vec<&String> = knowledge.sales_responses.keys().collect();
        assert_eq!(categories, vec!["greetings", "meetings"]);
        assert_eq!(knowledge.sales_responses["meetings"].len(), 2);
        assert!(knowledge.sales_responses["meetings"][1].response.is_none());
    }

    #[test]
    fn test_load_shipped_config() {
        let knowledge = SalesKnowledge::load(concat!(env!("CARGO_MANIFEST_DIR"), "/../../config"));
        assert!(!knowledge.company_description.is_empty());
        assert!(!knowledge.products_description.is_empty());
        assert!(knowledge.legal_disclaimer.is_some());
        assert!(knowledge.client_questionnaire.get("qualified_investor").is_some());
        assert_eq!(
            knowledge.sales_responses.keys().collect::<Vec<_>>(),
            vec!["greetings", "meetings", "thanks"]
        );
    }

    #[test]
    fn test_missing_directory_degrades_to_empty() {
        let knowledge = SalesKnowledge::load("/definitely/not/here");
        assert!(knowledge.company_description.is_empty());
        assert!(knowledge.legal_disclaimer.is_none());
        assert!(knowledge.sales_responses.is_empty());
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), SalesKnowledge::SALES_RESPONSES_FILE, "greetings: [unclosed\n");
        write(dir.path(), SalesKnowledge::COMPANY_FILE, "");

        let knowledge = SalesKnowledge::load(dir.path());
        assert!(knowledge.sales_responses.is_empty());
        assert!(knowledge.company_description.is_empty());
    }

    #[test]
    fn test_non_list_category_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            SalesKnowledge::SALES_RESPONSES_FILE,
            "notes: just text\nfaq:\n  - pattern: a\n    response: b\n",
        );

        let knowledge = SalesKnowledge::load(dir.path());
        assert_eq!(knowledge.sales_responses.len(), 1);
        assert!(knowledge.sales_responses.contains_key("faq"));
    }

    #[test]
    fn test_keyword_lookup() {
        let knowledge = KeywordKnowledge::new();
        let hits = knowledge.lookup("מה לגבי נזילות וסיכון?");
        assert_eq!(hits.len(), 2);
        assert!(hits[0].contains("מנגנוני הגנה"));
        assert!(hits[1].contains("נזילות יומית"));

        assert!(knowledge.lookup("hello").is_empty());
    }

    #[test]
    fn test_core_sections() {
        let knowledge = KeywordKnowledge::new();
        assert!(knowledge.core(CoreKnowledge::Company).contains("מובנה גלובל"));
        assert!(knowledge.core(CoreKnowledge::Advantages).starts_with("1."));
    }
}
