//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use drishti_api::PoseTrend;
    use drishti_core::{
        Metric, Paginated, Pose, PracticeSession, ScoreCard, SessionDetail, TrendResponse,
        TrendSide, TrendSummary, TrendWindow, daily_series,
    };
    use serde_json::json;

    fn session(id: &str, label: Option<&str>, status: &str) -> PracticeSession {
        serde_json::from_value(json!({
            "id": id,
            "date": "2024-03-05T07:30:00.000Z",
            "label": label,
            "status": status,
            "overallScore": 7.5
        }))
        .unwrap()
    }

    fn pose(two_sided: bool) -> Pose {
        Pose {
            id: "p1".to_string(),
            slug: "marichyasana-a".to_string(),
            sanskrit_name: "Marichyasana A".to_string(),
            english_name: None,
            sequence_group: "PRIMARY".to_string(),
            is_two_sided: two_sided,
        }
    }

    fn trend(points: serde_json::Value, pose: &Pose, side: TrendSide) -> PoseTrend {
        let response: TrendResponse = serde_json::from_value(json!({ "points": points })).unwrap();
        let series = daily_series(&response.points, Metric::Ease, pose.is_two_sided, side);
        let summary = TrendSummary::from_series(&series);
        PoseTrend {
            response,
            series,
            summary,
        }
    }

    #[test]
    fn test_sessions_table() {
        let formatter = TextFormatter::new(false);
        let page = Paginated {
            items: vec![session("s1", Some("Mysore"), "DRAFT"), session("s2", None, "PUBLISHED")],
            next_cursor: Some("c2".to_string()),
        };

        let output = formatter.format_sessions(&page);
        assert!(output.contains("2024-03-05"));
        assert!(output.contains("Mysore"));
        assert!(output.contains("Practice Session"));
        assert!(output.contains("DRAFT"));
        assert!(output.contains("PUBLISHED"));
        assert!(output.contains("7.5"));
        assert!(output.contains("--cursor c2"));
    }

    #[test]
    fn test_sessions_empty() {
        let formatter = TextFormatter::new(false);
        let page: Paginated<PracticeSession> = Paginated {
            items: vec![],
            next_cursor: None,
        };
        assert_eq!(formatter.format_sessions(&page), "No sessions yet");
    }

    #[test]
    fn test_session_detail_counts_complete_cards() {
        let formatter = TextFormatter::new(false);
        let detail: SessionDetail = serde_json::from_value(json!({
            "id": "s1",
            "label": "Led class",
            "status": "DRAFT",
            "scoreCards": [
                { "id": "c1", "side": "LEFT", "isComplete": true,
                  "pose": { "sanskritName": "Utthita Trikonasana" } },
                { "id": "c2", "side": "RIGHT", "isComplete": false,
                  "pose": { "sanskritName": "Utthita Trikonasana" } },
                { "id": "c3", "side": "NA", "isComplete": false,
                  "pose": { "slug": "navasana" } }
            ]
        }))
        .unwrap();

        let output = formatter.format_session_detail(&detail);
        assert!(output.contains("Led class"));
        assert!(output.contains("1 of 3 complete"));
        assert!(output.contains("Utthita Trikonasana • LEFT"));
        assert!(output.contains("navasana"));
        assert!(!output.contains("navasana •"));
    }

    #[test]
    fn test_score_card_metrics() {
        let formatter = TextFormatter::new(false);
        let card: ScoreCard = serde_json::from_value(json!({
            "id": "c1",
            "ease": 7,
            "pain": 2,
            "overallScore": 6.4,
            "notes": "tight hamstrings",
            "pose": { "sanskritName": "Paschimottanasana" }
        }))
        .unwrap();

        let output = formatter.format_score_card(&card);
        assert!(output.contains("Paschimottanasana"));
        assert!(output.contains("Ease:"));
        assert!(output.contains("███████░░░ 7"));
        assert!(output.contains("Pain:"));
        assert!(output.contains("6.4"));
        assert!(output.contains("tight hamstrings"));
        assert!(!output.contains("Skipped"));
    }

    #[test]
    fn test_poses_table() {
        let formatter = TextFormatter::new(false);
        let one = pose(true);
        let output = formatter.format_poses(&[&one]);
        assert!(output.contains("Marichyasana A"));
        assert!(output.contains("marichyasana-a"));
        assert!(output.contains("Primary"));
        assert!(output.contains("L/R"));

        assert_eq!(formatter.format_poses(&[]), "No matching poses");
    }

    #[test]
    fn test_trend_rows_and_summary() {
        let formatter = TextFormatter::new(false);
        let pose = pose(false);
        let trend = trend(
            json!([
                { "sessionDate": "2024-01-01T08:00:00Z", "values": { "ease": 4 } },
                { "sessionDate": "2024-01-01T18:00:00Z", "values": { "ease": 6 } },
                { "sessionDate": "2024-01-02T08:00:00Z", "values": { "ease": 10 } }
            ]),
            &pose,
            TrendSide::Both,
        );

        let output =
            formatter.format_trend(&pose, Metric::Ease, TrendWindow::Days(30), TrendSide::Both, &trend);
        assert!(output.contains("Marichyasana A"));
        assert!(output.contains("ease, 30d"));
        assert!(!output.contains("side"));
        assert!(output.contains("2024-01-01  █████░░░░░ 5.0"));
        assert!(output.contains("2024-01-02  ██████████ 10.0"));
        assert!(output.contains("Average 7.5"));
        assert!(output.contains("2 days"));
    }

    #[test]
    fn test_trend_two_sided_header() {
        let formatter = TextFormatter::new(false);
        let pose = pose(true);
        let trend = trend(
            json!([
                { "sessionDate": "2024-01-01T08:00:00Z", "side": "LEFT", "values": { "ease": 4 } },
                { "sessionDate": "2024-01-01T08:00:00Z", "side": "RIGHT", "values": { "ease": 8 } }
            ]),
            &pose,
            TrendSide::Right,
        );

        let output =
            formatter.format_trend(&pose, Metric::Ease, TrendWindow::All, TrendSide::Right, &trend);
        assert!(output.contains("side R"));
        assert!(output.contains("8.0"));
        assert!(!output.contains("4.0"));
    }

    #[test]
    fn test_trend_empty() {
        let formatter = TextFormatter::new(false);
        let pose = pose(false);
        let trend = trend(json!([]), &pose, TrendSide::Both);
        let output =
            formatter.format_trend(&pose, Metric::Focus, TrendWindow::Days(7), TrendSide::Both, &trend);
        assert!(output.contains("No data in this window"));
    }

    #[test]
    fn test_summary_delta_colors() {
        let formatter = TextFormatter::new(true);
        let up = TrendSummary {
            overall: Some(6.0),
            last7: Some(7.0),
            prev7: Some(5.0),
            delta7: Some(2.0),
            days: 14,
        };
        let output = formatter.format_summary(&up);
        assert!(output.contains("+2.0 vs prior 7"));
        assert!(output.contains("\x1b[32m"));

        let down = TrendSummary {
            delta7: Some(-1.5),
            ..up
        };
        assert!(formatter.format_summary(&down).contains("\x1b[31m"));
    }

    #[test]
    fn test_status() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_status("https://api.example.com", "keychain", true);
        assert!(output.contains("https://api.example.com"));
        assert!(output.contains("keychain"));
        assert!(output.contains("signed in"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{JsonFormatter, StatusOutput, TrendOutput};
    use drishti_api::PoseTrend;
    use drishti_core::{
        Metric, Pose, TrendResponse, TrendSide, TrendSummary, TrendWindow, daily_series,
    };
    use serde_json::{Value, json};

    #[test]
    fn test_status_output() {
        let formatter = JsonFormatter::new(false);
        let output = formatter
            .format(&StatusOutput {
                base_url: "https://api.example.com".to_string(),
                token_store: "memory".to_string(),
                signed_in: false,
            })
            .unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["baseUrl"], "https://api.example.com");
        assert_eq!(parsed["tokenStore"], "memory");
        assert_eq!(parsed["signedIn"], false);
    }

    #[test]
    fn test_trend_output() {
        let pose = Pose {
            id: "p9".to_string(),
            slug: "bakasana".to_string(),
            sanskrit_name: "Bakasana".to_string(),
            english_name: Some("Crow".to_string()),
            sequence_group: "INTERMEDIATE".to_string(),
            is_two_sided: false,
        };
        let response: TrendResponse = serde_json::from_value(json!({
            "points": [
                { "sessionDate": "2024-01-01T08:00:00Z", "values": { "overallScore": 6 } },
                { "sessionDate": "2024-01-03T08:00:00Z", "values": { "overallScore": "n/a" } }
            ]
        }))
        .unwrap();
        let series = daily_series(&response.points, Metric::OverallScore, false, TrendSide::Both);
        let summary = TrendSummary::from_series(&series);
        let trend = PoseTrend {
            response,
            series,
            summary,
        };

        let output = TrendOutput::new(
            &pose,
            Metric::OverallScore,
            TrendWindow::All,
            TrendSide::Left,
            &trend,
        );
        let parsed: Value =
            serde_json::from_str(&JsonFormatter::new(true).format(&output).unwrap()).unwrap();

        assert_eq!(parsed["poseId"], "p9");
        assert_eq!(parsed["metric"], "overallScore");
        assert_eq!(parsed["window"], "all");
        assert!(parsed.get("side").is_none());
        assert_eq!(parsed["points"], 2);
        assert_eq!(parsed["series"], json!([{ "date": "2024-01-01", "value": 6.0 }]));
        assert_eq!(parsed["summary"]["days"], 1);
    }
}
