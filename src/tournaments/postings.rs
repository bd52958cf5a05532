//! The pairings of a round as posted for competitors and judges.

use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;

use crate::tournaments::{
    Division,
    participants::{
        BYE_ID, BYE_SCHOOL, Competitor, CompetitorId, Judge, JudgeId,
    },
    rooms::Room,
    rounds::{Round, RoundName},
};

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Posting {
    pub room: Option<Room>,
    pub aff: String,
    pub neg: String,
    pub judges: Vec<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Postings {
    pub division: Division,
    pub round: RoundName,
    pub rows: Vec<Posting>,
    /// Preliminary rounds post one judge column, elimination rounds one per
    /// panel seat.
    pub judge_columns: usize,
}

/// Builds the postings of `round`, naming everyone by school and surname.
pub fn render(
    division: Division,
    name: RoundName,
    round: &Round,
    competitors: &[Competitor],
    judges: &[Judge],
    panel_size: usize,
) -> Postings {
    let competitors = competitors
        .iter()
        .map(|competitor| (competitor.id, competitor))
        .collect::<HashMap<CompetitorId, _>>();
    let judges = judges
        .iter()
        .map(|judge| (judge.id, judge))
        .collect::<HashMap<JudgeId, _>>();

    let competitor_label = |id: CompetitorId| match competitors.get(&id) {
        Some(competitor) => competitor.posting(),
        None if id == BYE_ID => BYE_SCHOOL.to_string(),
        None => format!("#{id}"),
    };

    let rows = round
        .pairings()
        .map(|pairing| Posting {
            room: pairing.room.clone(),
            aff: competitor_label(pairing.aff_id),
            neg: competitor_label(pairing.neg_id),
            judges: pairing
                .judge_ids
                .iter()
                .map(|id| match judges.get(id) {
                    Some(judge) => judge.posting(),
                    None => format!("#{id}"),
                })
                .collect(),
        })
        .collect::<Vec<_>>();

    let seats = if name.is_elimination() { panel_size } else { 1 };
    let judge_columns = rows
        .iter()
        .map(|row| row.judges.len())
        .max()
        .unwrap_or(0)
        .max(seats);

    Postings {
        division,
        round: name,
        rows,
        judge_columns,
    }
}

impl Postings {
    fn header(&self) -> Vec<String> {
        let mut header = vec!["Room".to_string(), "Aff".into(), "Neg".into()];
        if self.judge_columns == 1 {
            header.push("Judge".into());
        } else {
            header.extend(
                (1..=self.judge_columns).map(|seat| format!("Judge {seat}")),
            );
        }
        header
    }

    fn cells(&self, row: &Posting) -> Vec<String> {
        let mut cells = vec![
            row.room
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string()),
            row.aff.clone(),
            row.neg.clone(),
        ];
        // an empty seat is shown rather than left blank
        cells.extend((0..self.judge_columns).map(|seat| {
            row.judges.get(seat).cloned().unwrap_or_else(|| "-".to_string())
        }));
        cells
    }
}

impl std::fmt::Display for Postings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header = self.header();
        let body = self.rows.iter().map(|row| self.cells(row)).collect_vec();

        let widths = (0..header.len())
            .map(|col| {
                std::iter::once(&header)
                    .chain(body.iter())
                    .map(|cells| cells[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect_vec();

        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .join(" | ")
                .trim_end()
                .to_string()
        };

        writeln!(f, "{} {}", self.division, self.round)?;
        writeln!(f, "{}", line(&header))?;
        writeln!(
            f,
            "{}",
            widths.iter().map(|width| "-".repeat(*width)).join("-+-")
        )?;
        for cells in &body {
            writeln!(f, "{}", line(cells))?;
        }
        Ok(())
    }
}
