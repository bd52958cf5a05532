use serde::{Deserialize, Serialize};

use crate::tournaments::rounds::ballots::BallotError;

pub const CRITERION_MIN: u8 = 1;
pub const CRITERION_MAX: u8 = 5;

/// The judge's marks for one speaker. Each criterion is marked from 1 to 5
/// and the speaker points are the sum of the marks.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SpeakerPointsRubric {
    pub delivery: u8,
    pub courtesy: u8,
    pub tone: u8,
    pub organization: u8,
    pub logic: u8,
    pub support: u8,
    #[serde(rename = "cx")]
    pub cross_examination: u8,
    pub refutation: u8,
}

impl SpeakerPointsRubric {
    fn criteria(&self) -> [(&'static str, u8); 8] {
        [
            ("delivery", self.delivery),
            ("courtesy", self.courtesy),
            ("tone", self.tone),
            ("organization", self.organization),
            ("logic", self.logic),
            ("support", self.support),
            ("cross-examination", self.cross_examination),
            ("refutation", self.refutation),
        ]
    }

    pub fn total(&self) -> Result<u32, BallotError> {
        let mut total = 0;
        for (criterion, mark) in self.criteria() {
            if !(CRITERION_MIN..=CRITERION_MAX).contains(&mark) {
                return Err(BallotError::CriterionOutOfRange { criterion, mark });
            }
            total += u32::from(mark);
        }
        Ok(total)
    }
}
