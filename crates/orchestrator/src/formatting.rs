//! Post-processing of model replies.

use crate::qualification::FormUrls;

/// Disclaimer used when `legal.yaml` provides none.
pub const DEFAULT_DISCLAIMER: &str = "אין לראות במידע המוצג המלצה או ייעוץ להשקעה.";

const REGULATED_TERMS: &[&str] = &[
    "תשואה",
    "ריבית",
    "רווח",
    "החזר",
    "השקעה",
    "סיכון",
    "הגנה",
    "קרן",
    "return",
    "interest",
    "profit",
    "refund",
    "investment",
    "risk",
    "protection",
    "fund",
];

const AGREEMENT_TERMS: &[&str] = &[
    "הסכם",
    "חוזה",
    "חתימה",
    "לחתום",
    "agreement",
    "agreements",
    "contract",
    "contracts",
    "sign",
    "signing",
];

const QUALIFIED_TERMS: &[&str] = &["משקיע כשיר", "qualified investor", "qualified investors"];

/// Does the text touch a regulated topic?
pub fn needs_disclaimer(text: &str) -> bool {
    let text = text.to_lowercase();
    REGULATED_TERMS.iter().any(|t| text.contains(t))
}

/// Append `disclaimer` as its own paragraph unless the text already contains it.
pub fn add_disclaimer(text: &str, disclaimer: &str) -> String {
    let disclaimer = disclaimer.trim();
    if disclaimer.is_empty() || text.contains(disclaimer) {
        return text.to_string();
    }
    format!("{}\n\n{}", text.trim_end(), disclaimer)
}

/// Hebrew terms match anywhere since prefixes attach to the word.
/// Latin terms must stand alone, so "design" is not "sign".
fn contains_term(lowered: &str, term: &str) -> bool {
    if !term.is_ascii() {
        return lowered.contains(term);
    }
    lowered.match_indices(term).any(|(start, _)| {
        let before = lowered[..start].chars().next_back();
        let after = lowered[start + term.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Append form links the reply refers to but does not include.
pub fn add_form_links(text: &str, forms: &FormUrls) -> String {
    let lowered = text.to_lowercase();
    let mut result = text.to_string();

    let mentions = |terms: &[&str]| terms.iter().any(|t| contains_term(&lowered, t));

    if mentions(QUALIFIED_TERMS) && !text.contains(&forms.qualified_investor) {
        result.push_str("\n\nלהצהרת משקיע כשיר: ");
        result.push_str(&forms.qualified_investor);
    }

    if mentions(AGREEMENT_TERMS) && !text.contains(&forms.marketing_agreement) {
        result.push_str("\n\nלחתימה על הסכם השיווק: ");
        result.push_str(&forms.marketing_agreement);
    }

    result
}

/// Form links first, then the disclaimer when a regulated term appears.
pub fn post_process(text: &str, forms: &FormUrls, disclaimer: &str) -> String {
    let linked = add_form_links(text, forms);
    if needs_disclaimer(&linked) {
        add_disclaimer(&linked, disclaimer)
    } else {
        linked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forms() -> FormUrls {
        FormUrls::from_base("https://movne.test")
    }

    #[test]
    fn test_needs_disclaimer() {
        assert!(needs_disclaimer("הסיכון נמוך"));
        assert!(needs_disclaimer("Our PROFIT share"));
        assert!(!needs_disclaimer("נשמח לקבוע פגישה"));
    }

    #[test]
    fn test_disclaimer_appended_once() {
        let once = add_disclaimer("profit and profit", DEFAULT_DISCLAIMER);
        assert_eq!(once.matches(DEFAULT_DISCLAIMER.trim()).count(), 1);

        let twice = add_disclaimer(&once, DEFAULT_DISCLAIMER);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_agreement_link_added() {
        let reply = add_form_links("אפשר לחתום על ההסכם אונליין", &forms());
        assert!(reply.ends_with("https://movne.test/forms/marketing-agreement"));
        assert!(!reply.contains("qualified-investor"));
    }

    #[test]
    fn test_agreement_link_needs_whole_english_word() {
        let text = "Our design team has significant experience with signal processing.";
        assert_eq!(add_form_links(text, &forms()), text);

        let reply = add_form_links("You can sign online.", &forms());
        assert!(reply.contains("forms/marketing-agreement"));
    }

    #[test]
    fn test_disclaimer_is_separate_paragraph() {
        let reply = add_disclaimer("יש סיכון.  ", "המידע כללי בלבד");
        assert_eq!(reply, "יש סיכון.\n\nהמידע כללי בלבד");

        let padded = add_disclaimer("risk", "\n\nNOT ADVICE\n");
        assert_eq!(padded, "risk\n\nNOT ADVICE");
    }

    #[test]
    fn test_existing_link_not_duplicated() {
        let text = "Sign here: https://movne.test/forms/marketing-agreement";
        assert_eq!(add_form_links(text, &forms()), text);
    }

    #[test]
    fn test_qualified_link_added() {
        let reply = add_form_links("As a qualified investor you get more details", &forms());
        assert!(reply.contains("https://movne.test/forms/qualified-investor"));
    }

    #[test]
    fn test_post_process_plain_reply_untouched() {
        assert_eq!(post_process("שלום!", &forms(), DEFAULT_DISCLAIMER), "שלום!");
    }

    #[test]
    fn test_post_process_adds_disclaimer() {
        let reply = post_process("הקרן שלנו", &forms(), DEFAULT_DISCLAIMER);
        assert!(reply.ends_with(&format!("\n\n{}", DEFAULT_DISCLAIMER)));
    }
}
