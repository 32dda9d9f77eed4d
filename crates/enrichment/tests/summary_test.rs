//! Group and weekly summaries: AI path and deterministic fallback reports.

mod common;

use common::{client_with, ScriptedLlm};
use enrichment::{
    fallback_group_report, fallback_weekly_report, AiEnrichmentClient, Sentiment,
    SummaryMessage, WeeklyAggregate, NO_DATA_REPORT,
};

fn message(author: &str, text: &str, sentiment: Option<Sentiment>) -> SummaryMessage {
    SummaryMessage {
        author: author.to_string(),
        text: Some(text.to_string()),
        sentiment,
    }
}

fn sample_messages() -> Vec<SummaryMessage> {
    vec![
        message("Ali", "rahmat!", Some(Sentiment::Positive)),
        message("Vali", "maosh qachon?", Some(Sentiment::Question)),
        message("Ali", "yaxshi", Some(Sentiment::Positive)),
        message("Guli", "muammo bor", Some(Sentiment::Negative)),
    ]
}

/// **Test: Fallback group report is exact and reproducible.**
#[tokio::test]
async fn test_group_fallback_report() {
    let client = AiEnrichmentClient::unavailable();
    let messages = sample_messages();

    let report = client.generate_group_summary(&messages, "HR Team").await;

    let expected = "📊 **HR Team - Analysis**\n\n\
                    ✅ **Overview:**\n\
                    - Total messages: 4\n\
                    - Active users: 3\n\
                    - Positive messages: 2 (50.0%)\n\n\
                    📈 **Activity:**\n\
                    📉 Low activity\n\n\
                    💬 **Sentiment:**\n\
                    😊 Positive atmosphere\n";
    assert_eq!(report, expected);
    assert_eq!(report, fallback_group_report(&messages, "HR Team"));
}

/// **Test: Fallback weekly report computes the daily average.**
#[test]
fn test_weekly_fallback_report() {
    let aggregate = WeeklyAggregate {
        total_messages: 120,
        group_count: 2,
        user_count: 9,
        messages: sample_messages(),
    };

    let report = fallback_weekly_report(&aggregate);

    assert!(report.contains("- Total messages: 120"));
    assert!(report.contains("- Active users: 9"));
    assert!(report.contains("- Daily average: 17.1 messages"));
    assert!(report.contains("📈 **Activity:** 🔥 High"));
}

/// **Test: Empty input gives the no-data report on both paths.**
#[tokio::test]
async fn test_empty_inputs_report_no_data() {
    let llm = ScriptedLlm::ok(&[]);
    let client = client_with(llm.clone());

    assert_eq!(client.generate_group_summary(&[], "X").await, NO_DATA_REPORT);
    assert_eq!(
        client
            .generate_weekly_summary(&WeeklyAggregate::default())
            .await,
        NO_DATA_REPORT
    );
    assert_eq!(llm.calls(), 0);
}

/// **Test: AI group summary embeds counts and transcript, returns trimmed reply.**
#[tokio::test]
async fn test_group_summary_ai_path() {
    let llm = ScriptedLlm::ok(&["  📊 **HR Team - Analysis** ...  \n"]);
    let client = client_with(llm.clone());

    let report = client
        .generate_group_summary(&sample_messages(), "HR Team")
        .await;

    assert_eq!(report, "📊 **HR Team - Analysis** ...");
    let prompt = &llm.prompts()[0];
    assert!(prompt.contains("**Total messages:** 4"));
    assert!(prompt.contains("Positive: 2, Negative: 1, Neutral: 1"));
    assert!(prompt.contains("- Vali: maosh qachon?"));
}

/// **Test: AI failure falls back to the deterministic report.**
#[tokio::test]
async fn test_summary_ai_failure_falls_back() {
    let llm = ScriptedLlm::new([Err::<&str, &str>("quota"), Ok("   ")]);
    let client = client_with(llm);
    let aggregate = WeeklyAggregate {
        total_messages: 4,
        group_count: 1,
        user_count: 3,
        messages: sample_messages(),
    };

    assert_eq!(
        client.generate_group_summary(&sample_messages(), "HR").await,
        fallback_group_report(&sample_messages(), "HR")
    );
    assert_eq!(
        client.generate_weekly_summary(&aggregate).await,
        fallback_weekly_report(&aggregate)
    );
}
