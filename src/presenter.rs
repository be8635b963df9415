//! Read-only text projection of a completed analysis report.

use scraper::Html;

use crate::models::report::{AnalysisReport, RefereeReport, TeamReport};

/// Render the report for the terminal. Pure function; absent sections are
/// simply skipped.
pub fn render(report: &AnalysisReport) -> String {
    let mut out = String::new();

    render_team(&mut out, &report.teams.team_a);
    render_team(&mut out, &report.teams.team_b);

    if let Some(referee) = &report.referees.main {
        render_referee(&mut out, "Main referee", referee);
    }
    if let Some(referee) = &report.referees.side {
        render_referee(&mut out, "Side referee", referee);
    }

    if !report.head_to_head.is_empty() {
        out.push_str("Head to head\n");
        for m in &report.head_to_head {
            out.push_str(&format!(
                "  {}  {} {} {}\n",
                m.date, m.guest_team, m.result, m.home_team
            ));
        }
    }

    out
}

fn render_team(out: &mut String, team: &TeamReport) {
    if team.name.is_empty() {
        return;
    }
    out.push_str(&format!("== {} ==\n", team.name));

    for (key, value) in &team.info {
        if let Some(text) = value.as_str() {
            out.push_str(&format!("  {key}: {text}\n"));
        }
    }

    if !team.last_matches.is_empty() {
        out.push_str("  Last matches:\n");
        for m in &team.last_matches {
            out.push_str(&format!(
                "    {}  vs {}  {}  [{}] {}\n",
                m.date, m.opponent, m.score, m.formation, m.outcome
            ));
        }
        out.push_str(&format!(
            "  Wins {} | Draws {} | Losses {}\n",
            team.stats.wins, team.stats.draws, team.stats.losses
        ));
    }

    if let Some(analysis) = &team.performance_analysis {
        out.push_str(&format!("  {analysis}\n"));
    }
    out.push('\n');
}

fn render_referee(out: &mut String, label: &str, referee: &RefereeReport) {
    out.push_str(&format!("{label}: {}\n", referee.name));
    let info = strip_html(&referee.info);
    if !info.is_empty() {
        out.push_str(&format!("  {info}\n"));
    }
    if let Some(analysis) = &referee.referee_analysis {
        out.push_str(&format!("  {analysis}\n"));
    }
    out.push('\n');
}

/// The backend ships referee stats as an HTML fragment; reduce it to
/// whitespace-normalized text.
fn strip_html(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    let text: Vec<&str> = parsed.root_element().text().collect();
    text.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report() -> AnalysisReport {
        AnalysisReport::from_value(&json!({
            "teams": {
                "team_a": {
                    "name": "Galatasaray",
                    "info": {"Lig": "Super Lig"},
                    "last_matches": [
                        {"tarih": "01.03.2026", "rakip": "Besiktas", "sonuc": "2:1",
                         "dizilis": "4-2-3-1", "emoji": "W"}
                    ],
                    "stats": {"wins": 3, "draws": 1, "losses": 1}
                },
                "team_b": {"name": "Fenerbahce"}
            },
            "referees": {
                "main": {"name": "Ali Palabiyik", "info": "<p>Avg cards: <b>4.2</b></p>"}
            },
            "head_to_head": [
                {"date": "12.11.2025", "home_team": "Galatasaray",
                 "guest_team": "Fenerbahce", "result": "1:1"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn renders_teams_referee_and_head_to_head() {
        let text = render(&sample_report());
        assert!(text.contains("== Galatasaray =="));
        assert!(text.contains("Lig: Super Lig"));
        assert!(text.contains("vs Besiktas"));
        assert!(text.contains("Wins 3 | Draws 1 | Losses 1"));
        assert!(text.contains("Main referee: Ali Palabiyik"));
        assert!(text.contains("Avg cards: 4.2"));
        assert!(!text.contains("<b>"));
        assert!(text.contains("Head to head"));
        assert!(text.contains("Fenerbahce 1:1 Galatasaray"));
    }

    #[test]
    fn empty_report_renders_to_nothing() {
        let report = AnalysisReport::default();
        assert!(render(&report).is_empty());
    }

    #[test]
    fn strip_html_normalizes_whitespace() {
        assert_eq!(strip_html("<div>a  <b>b</b>\n c</div>"), "a b c");
        assert_eq!(strip_html(""), "");
    }
}
