//! Aggregate metrics over a business's feedback and QR codes.
//!
//! All of this is computed on the fly from the full result sets; nothing
//! is cached or pre-aggregated. Rating averages treat a missing rating as
//! zero, while the sentiment figures only consider labeled rows.

use serde::Serialize;

use crate::feedback::sentiment::Sentiment;
use crate::models::{Feedback, QrCode};

/// Share of labeled feedback per sentiment, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentDistribution {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub total_feedback: usize,
    pub avg_rating: f64,
    /// Feedback received per hundred scans.
    pub response_rate: f64,
    /// 0-100, where every submission positive scores 100 and every
    /// submission negative scores 0.
    pub sentiment_score: i64,
    pub sentiment_distribution: SentimentDistribution,
}

pub fn compute_overview(feedback: &[Feedback], qr_codes: &[QrCode]) -> AnalyticsOverview {
    let total_feedback = feedback.len();

    let rating_sum: i64 = feedback
        .iter()
        .map(|f| i64::from(f.rating.unwrap_or(0)))
        .sum();
    let avg_rating = if total_feedback > 0 {
        rating_sum as f64 / total_feedback as f64
    } else {
        0.0
    };

    let total_scans: i64 = feedback_scans(qr_codes);
    let response_rate = if total_scans > 0 {
        total_feedback as f64 / total_scans as f64 * 100.0
    } else {
        0.0
    };

    let positive = count_label(feedback, Sentiment::Positive);
    let neutral = count_label(feedback, Sentiment::Neutral);
    let negative = count_label(feedback, Sentiment::Negative);
    let labeled = positive + neutral + negative;

    let sentiment_score = if labeled > 0 {
        ((positive * 100 + neutral * 50) as f64 / labeled as f64).round() as i64
    } else {
        0
    };

    let sentiment_distribution = if labeled > 0 {
        SentimentDistribution {
            positive: positive as f64 / labeled as f64 * 100.0,
            neutral: neutral as f64 / labeled as f64 * 100.0,
            negative: negative as f64 / labeled as f64 * 100.0,
        }
    } else {
        SentimentDistribution {
            positive: 0.0,
            neutral: 0.0,
            negative: 0.0,
        }
    };

    AnalyticsOverview {
        total_feedback,
        avg_rating,
        response_rate,
        sentiment_score,
        sentiment_distribution,
    }
}

fn feedback_scans(qr_codes: &[QrCode]) -> i64 {
    qr_codes.iter().map(|q| i64::from(q.scan_count)).sum()
}

fn count_label(feedback: &[Feedback], label: Sentiment) -> usize {
    feedback
        .iter()
        .filter(|f| f.sentiment.as_deref() == Some(label.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn make_feedback(rating: Option<i32>, sentiment: Option<&str>) -> Feedback {
        Feedback {
            id: Uuid::new_v4(),
            qr_code_id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            location_id: None,
            response: json!({}),
            rating,
            sentiment: sentiment.map(str::to_string),
            customer_name: None,
            customer_email: None,
            customer_phone: None,
            media_urls: vec![],
            is_anonymous: true,
            created_at: Utc::now(),
        }
    }

    fn make_qr_code(scan_count: i32) -> QrCode {
        QrCode {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            location_id: None,
            name: "QR".to_string(),
            scan_count,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_overview_with_no_data_is_all_zero() {
        let overview = compute_overview(&[], &[]);
        assert_eq!(overview.total_feedback, 0);
        assert_eq!(overview.avg_rating, 0.0);
        assert_eq!(overview.response_rate, 0.0);
        assert_eq!(overview.sentiment_score, 0);
        assert_eq!(overview.sentiment_distribution.positive, 0.0);
    }

    #[test]
    fn test_overview_over_a_mixed_week() {
        // Four submissions rated 5, 3, 2 and 4 against a code scanned ten
        // times: two positive, one neutral, one negative.
        let feedback = vec![
            make_feedback(Some(5), Some("Positive")),
            make_feedback(Some(3), Some("Neutral")),
            make_feedback(Some(2), Some("Negative")),
            make_feedback(Some(4), Some("Positive")),
        ];
        let qr_codes = vec![make_qr_code(10)];

        let overview = compute_overview(&feedback, &qr_codes);
        assert_eq!(overview.total_feedback, 4);
        assert_eq!(overview.avg_rating, 3.5);
        assert_eq!(overview.response_rate, 40.0);
        // (2 * 100 + 1 * 50) / 4 = 62.5, rounded half up.
        assert_eq!(overview.sentiment_score, 63);
        assert_eq!(
            overview.sentiment_distribution,
            SentimentDistribution {
                positive: 50.0,
                neutral: 25.0,
                negative: 25.0,
            }
        );
    }

    #[test]
    fn test_missing_ratings_drag_the_average_down() {
        let feedback = vec![
            make_feedback(Some(4), Some("Positive")),
            make_feedback(None, Some("Neutral")),
        ];
        let overview = compute_overview(&feedback, &[]);
        // The unrated row counts as zero in the average.
        assert_eq!(overview.avg_rating, 2.0);
        assert_eq!(overview.sentiment_score, 75);
    }

    #[test]
    fn test_unlabeled_rows_are_excluded_from_sentiment_math() {
        let feedback = vec![
            make_feedback(Some(5), Some("Positive")),
            make_feedback(None, None),
        ];
        let overview = compute_overview(&feedback, &[]);
        assert_eq!(overview.total_feedback, 2);
        assert_eq!(overview.sentiment_score, 100);
        assert_eq!(overview.sentiment_distribution.positive, 100.0);
    }

    #[test]
    fn test_response_rate_spans_all_codes() {
        let feedback = vec![make_feedback(Some(5), Some("Positive"))];
        let qr_codes = vec![make_qr_code(3), make_qr_code(1)];
        let overview = compute_overview(&feedback, &qr_codes);
        assert_eq!(overview.response_rate, 25.0);
    }

    #[test]
    fn test_response_rate_can_exceed_one_hundred() {
        // Feedback rows survive even if codes were scanned less often than
        // submissions landed (counter reset, deleted code, direct links).
        let feedback = vec![
            make_feedback(Some(5), Some("Positive")),
            make_feedback(Some(4), Some("Positive")),
        ];
        let qr_codes = vec![make_qr_code(1)];
        let overview = compute_overview(&feedback, &qr_codes);
        assert_eq!(overview.response_rate, 200.0);
    }
}
