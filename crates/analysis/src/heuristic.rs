//! Keyword heuristic analyzer
//!
//! Classifies by substring matching over `lowercase(title + " " + description)`.
//! Output is a pure function of the input, which makes it the reference
//! analyzer for demos and tests.

use async_trait::async_trait;

use ticket_triage_core::{
    AnalysisError, Category, Classification, CustomerType, TicketAnalyzer, TicketInput,
    Urgency,
};

/// Category detection lists, checked in order; first match wins
const CATEGORY_RULES: [(Category, &[&str]); 4] = [
    (
        Category::Billing,
        &[
            "payment",
            "invoice",
            "billing",
            "charge",
            "refund",
            "subscription",
            "price",
            "cost",
        ],
    ),
    (
        Category::Outage,
        &[
            "down",
            "outage",
            "not working",
            "cant access",
            "cannot login",
            "crash",
            "error 500",
        ],
    ),
    (
        Category::Bug,
        &[
            "bug",
            "error",
            "broken",
            "issue",
            "problem",
            "not working",
            "glitch",
            "incorrect",
        ],
    ),
    (
        Category::FeatureRequest,
        &[
            "feature",
            "request",
            "enhancement",
            "suggestion",
            "would like",
            "add support",
            "integrate",
        ],
    ),
];

const CRITICAL_TERMS: &[&str] = &[
    "urgent",
    "critical",
    "emergency",
    "production down",
    "outage",
    "data loss",
];
const HIGH_TERMS: &[&str] = &[
    "asap",
    "important",
    "broken",
    "not working",
    "blocked",
    "cant access",
];
const PROBLEM_TERMS: &[&str] = &["issue", "problem", "error", "bug"];
const VAGUE_TERMS: &[&str] = &["help", "issue", "problem"];
const CATEGORY_NAMES: &[&str] = &["billing", "bug", "outage", "feature"];

/// Keywords that raise confidence once the category is known
fn scoring_keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Billing => &["payment", "invoice", "billing", "charge", "refund"],
        Category::Bug => &["bug", "error", "broken", "issue"],
        Category::Outage => &["down", "outage", "not working"],
        Category::FeatureRequest => &["feature", "request", "enhancement"],
        Category::Other => &[],
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

/// Unicode `White_Space` minus NEL, plus the byte order mark
fn is_separator(ch: char) -> bool {
    match ch {
        '\u{0085}' => false,
        '\u{FEFF}' => true,
        _ => ch.is_whitespace(),
    }
}

/// Segments produced by splitting on separator runs
///
/// Leading or trailing separators contribute an empty segment that still
/// counts, so this is one more than the number of separator runs.
fn word_count(text: &str) -> usize {
    let mut runs = 0;
    let mut in_space = false;
    for ch in text.chars() {
        if is_separator(ch) {
            if !in_space {
                runs += 1;
                in_space = true;
            }
        } else {
            in_space = false;
        }
    }
    runs + 1
}

/// Deterministic keyword-based analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous classification
    pub fn classify(&self, input: &TicketInput) -> Classification {
        let text = format!("{} {}", input.title, input.description).to_lowercase();
        let words = word_count(&text);

        let category = classify_category(&text);
        let urgency = determine_urgency(&text, input.customer_type);
        let confidence = calculate_confidence(&text, words, category);
        let explanation = explain(category, urgency, confidence, input.customer_type);
        let reasoning_factors = reasoning_factors(&text, words, input, category, urgency);

        Classification::new(
            category,
            urgency,
            category.default_team(),
            explanation,
            confidence,
            reasoning_factors,
        )
    }
}

fn classify_category(text: &str) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| contains_any(text, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

fn determine_urgency(text: &str, customer_type: CustomerType) -> Urgency {
    if contains_any(text, CRITICAL_TERMS) {
        return Urgency::Critical;
    }
    if contains_any(text, HIGH_TERMS) {
        return match customer_type {
            CustomerType::Enterprise => Urgency::Critical,
            _ => Urgency::High,
        };
    }
    if contains_any(text, PROBLEM_TERMS) {
        return match customer_type {
            CustomerType::Free => Urgency::Low,
            _ => Urgency::Medium,
        };
    }
    match customer_type {
        CustomerType::Enterprise => Urgency::High,
        CustomerType::Paid => Urgency::Medium,
        CustomerType::Free => Urgency::Low,
    }
}

fn calculate_confidence(text: &str, words: usize, category: Category) -> f64 {
    let mut confidence = 0.5;

    let matches = scoring_keywords(category)
        .iter()
        .filter(|kw| text.contains(*kw))
        .count();
    confidence += (matches as f64 * 0.1).min(0.3);

    if words > 50 {
        confidence += 0.1;
    }
    if words > 100 {
        confidence += 0.1;
    }

    if contains_any(text, VAGUE_TERMS) && words < 20 {
        confidence -= 0.2;
    }

    let mentioned = CATEGORY_NAMES.iter().filter(|c| text.contains(*c)).count();
    if mentioned > 1 {
        confidence -= 0.15;
    }

    confidence.min(0.95).max(0.3)
}

fn explain(
    category: Category,
    urgency: Urgency,
    confidence: f64,
    customer_type: CustomerType,
) -> String {
    let qualifier = if confidence > 0.8 {
        "High confidence based on clear indicators in the ticket description."
    } else if confidence > 0.6 {
        "Moderate confidence - ticket contains relevant keywords but may need review."
    } else {
        "Lower confidence - ticket description is ambiguous or lacks clear indicators."
    };

    format!(
        "Classified as {} with {} urgency for {}. {}",
        category.display_name(),
        urgency,
        customer_type.description(),
        qualifier
    )
}

fn reasoning_factors(
    text: &str,
    words: usize,
    input: &TicketInput,
    category: Category,
    urgency: Urgency,
) -> Vec<String> {
    let mut factors = vec![
        format!("Customer type: {}", input.customer_type),
        format!("Category classification: {}", category),
        format!("Urgency level: {}", urgency),
        format!("Description length: {} words", words),
    ];

    let found: Vec<&str> = scoring_keywords(category)
        .iter()
        .copied()
        .filter(|kw| text.contains(kw))
        .take(3)
        .collect();
    if !found.is_empty() {
        factors.push(format!("Key indicators: {}", found.join(", ")));
    }

    if let Some(previous) = input.previous_tickets().filter(|n| *n > 0) {
        factors.push(format!("Previous tickets: {}", previous));
    }

    factors
}

#[async_trait]
impl TicketAnalyzer for KeywordAnalyzer {
    async fn analyze(&self, input: &TicketInput) -> Result<Classification, AnalysisError> {
        let classification = self.classify(input);
        tracing::debug!(
            category = %classification.category,
            urgency = %classification.urgency,
            confidence = classification.confidence,
            "Keyword classification complete"
        );
        Ok(classification)
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_triage_core::TeamQueue;
    use ticket_triage_core::TicketMetadata;

    fn classify(title: &str, description: &str, customer_type: CustomerType) -> Classification {
        KeywordAnalyzer::new().classify(&TicketInput::new(title, description, customer_type))
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_word_count_matches_whitespace_split() {
        assert_eq!(word_count("help having some issues"), 4);
        assert_eq!(word_count("a  \t b"), 2);
        assert_eq!(word_count(" leading"), 2);
        assert_eq!(word_count("trailing "), 2);
        assert_eq!(word_count(""), 1);
    }

    #[test]
    fn test_word_count_separators() {
        assert_eq!(word_count("a\u{FEFF}b"), 2);
        assert_eq!(word_count("a\u{00A0}b\u{3000}c"), 3);
        assert_eq!(word_count("a\u{0085}b"), 1);
    }

    #[test]
    fn test_enterprise_outage() {
        let c = classify(
            "Production down",
            "Our entire production environment is down since 9am, all users affected",
            CustomerType::Enterprise,
        );
        assert_eq!(c.category, Category::Outage);
        assert_eq!(c.urgency, Urgency::Critical);
        assert_eq!(c.suggested_team, TeamQueue::Engineering);
    }

    #[test]
    fn test_vague_ticket() {
        let c = classify("Help", "Having some issues", CustomerType::Free);
        assert_eq!(c.category, Category::Bug);
        assert_eq!(c.urgency, Urgency::Low);
        // 0.5 + 0.1 (issue) - 0.2 (vague, short)
        assert!(approx(c.confidence, 0.4));
        assert_eq!(
            c.explanation,
            "Classified as bug with low urgency for free tier customer. \
             Lower confidence - ticket description is ambiguous or lacks clear indicators."
        );
        assert_eq!(
            c.reasoning_factors,
            vec![
                "Customer type: free",
                "Category classification: bug",
                "Urgency level: low",
                "Description length: 4 words",
                "Key indicators: issue",
            ]
        );
    }

    #[test]
    fn test_billing_keywords_cap() {
        let c = classify(
            "Refund for duplicate charge",
            "Our invoice shows a duplicate payment for billing period March",
            CustomerType::Paid,
        );
        assert_eq!(c.category, Category::Billing);
        assert_eq!(c.suggested_team, TeamQueue::Billing);
        assert_eq!(c.urgency, Urgency::Medium);
        // five scoring keywords capped at +0.3
        assert!(approx(c.confidence, 0.8));
        assert!(c
            .reasoning_factors
            .contains(&"Key indicators: payment, invoice, billing".to_string()));
    }

    #[test]
    fn test_mixed_category_penalty() {
        let c = classify(
            "Billing bug",
            "The billing page shows a bug when I open it",
            CustomerType::Paid,
        );
        assert_eq!(c.category, Category::Billing);
        // 0.5 + 0.1 (billing) - 0.15 (billing + bug mentioned)
        assert!(approx(c.confidence, 0.45));
    }

    #[test]
    fn test_feature_request_and_other() {
        let c = classify(
            "Dark mode",
            "We would like a dark theme for the dashboard",
            CustomerType::Enterprise,
        );
        assert_eq!(c.category, Category::FeatureRequest);
        assert_eq!(c.suggested_team, TeamQueue::Product);
        assert_eq!(c.urgency, Urgency::High);

        let c = classify("Hello", "Just saying thanks", CustomerType::Paid);
        assert_eq!(c.category, Category::Other);
        assert_eq!(c.suggested_team, TeamQueue::Support);
        assert_eq!(c.urgency, Urgency::Medium);
        assert!(!c.reasoning_factors.iter().any(|f| f.starts_with("Key indicators")));
    }

    #[test]
    fn test_high_terms_escalate_enterprise() {
        let c = classify("Blocked", "Export is broken for us", CustomerType::Enterprise);
        assert_eq!(c.urgency, Urgency::Critical);
        let c = classify("Blocked", "Export is broken for us", CustomerType::Paid);
        assert_eq!(c.urgency, Urgency::High);
    }

    #[test]
    fn test_long_description_bonus_and_clamp() {
        let filler = "word ".repeat(120);
        let c = classify(
            "Payment invoice billing charge refund",
            &filler,
            CustomerType::Paid,
        );
        // 0.5 + 0.3 + 0.1 + 0.1 = 1.0, clamped
        assert!(approx(c.confidence, 0.95));
        assert!(c.explanation.contains("High confidence"));
    }

    #[test]
    fn test_previous_tickets_factor() {
        let input = TicketInput::new("Question", "How do I export data", CustomerType::Free)
            .with_metadata(TicketMetadata {
                previous_tickets: Some(4),
                ..Default::default()
            });
        let c = KeywordAnalyzer::new().classify(&input);
        assert_eq!(c.reasoning_factors.last().unwrap(), "Previous tickets: 4");

        let input = TicketInput::new("Question", "How do I export data", CustomerType::Free)
            .with_metadata(TicketMetadata {
                previous_tickets: Some(0),
                ..Default::default()
            });
        let c = KeywordAnalyzer::new().classify(&input);
        assert!(!c.reasoning_factors.iter().any(|f| f.starts_with("Previous")));
    }

    #[test]
    fn test_confidence_bounds_over_varied_inputs() {
        let long = "lorem ipsum ".repeat(80);
        let titles = ["", "urgent", "billing bug outage feature", "help"];
        let bodies = [
            "",
            "issue",
            "not working cant access error 500 crash down",
            long.as_str(),
        ];
        for title in titles {
            for body in bodies {
                for customer in [CustomerType::Free, CustomerType::Paid, CustomerType::Enterprise] {
                    let c = classify(title, body, customer);
                    assert!((0.3..=0.95).contains(&c.confidence), "{} / {}", title, body);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_trait_impl() {
        let analyzer = KeywordAnalyzer::new();
        assert!(analyzer.health_check().await);
        assert_eq!(analyzer.name(), "heuristic");
        let input = TicketInput::new("Help", "Having some issues", CustomerType::Free);
        let first = analyzer.analyze(&input).await.unwrap();
        let second = analyzer.analyze(&input).await.unwrap();
        assert_eq!(first.category, second.category);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.reasoning_factors, second.reasoning_factors);
    }
}
