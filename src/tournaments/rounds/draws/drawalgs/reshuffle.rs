//! Draws a round after the first by reshuffling the previous round.

use std::collections::VecDeque;

use rand::{Rng, seq::SliceRandom};

use crate::tournaments::{
    participants::CompetitorId,
    rounds::{
        Round,
        draws::{
            DrawError,
            clashes::ClashMap,
            drawalgs::{DrawInput, DrawnPair},
        },
    },
};

/// Redraws the competitors of `prior`.
///
/// The previous round's affirmatives and negatives are shuffled into two
/// queues and paired off from the front. When the two at the front may not
/// meet, the first waiting pair whose opponents can be exchanged with them is
/// taken out and both exchanged debates are drawn instead. Otherwise the two
/// go to the back of their queues. After `max_iterations` steps the attempt
/// is abandoned with [`DrawError::PairingExhausted`].
///
/// Even-numbered rounds hand the affirmative to the competitors who came from
/// the previous round's negative queue.
pub fn gen_reshuffled<R: Rng + ?Sized>(
    input: &DrawInput,
    prior: &Round,
    clashes: &ClashMap,
    max_iterations: usize,
    rng: &mut R,
) -> Result<Vec<DrawnPair>, DrawError> {
    if prior.len() * 2 != input.roster.len() {
        return Err(DrawError::InvalidCompetitorCount(prior.len() * 2));
    }

    let mut affs = prior.aff_ids.clone();
    let mut negs = prior.neg_ids.clone();
    affs.shuffle(rng);
    negs.shuffle(rng);
    let mut affs = VecDeque::from(affs);
    let mut negs = VecDeque::from(negs);

    let mut output = Vec::with_capacity(prior.len());
    let mut iterations = 0;

    while let (Some(aff), Some(neg)) = (affs.pop_front(), negs.pop_front()) {
        if iterations >= max_iterations {
            tracing::debug!(
                "{} debates left undrawn after {iterations} iterations",
                affs.len() + 1
            );
            return Err(DrawError::PairingExhausted {
                division: input.division,
                round: input.round_number,
                iterations,
            });
        }
        iterations += 1;

        if clashes.can_pair(aff, neg) {
            output.push((aff, neg));
            continue;
        }

        let exchange = find_exchange(clashes, aff, neg, &affs, &negs)
            .and_then(|idx| Some((affs.remove(idx)?, negs.remove(idx)?)));

        match exchange {
            Some((other_aff, other_neg)) => {
                tracing::trace!(
                    "exchanged opponents of {aff} v {neg} and \
                     {other_aff} v {other_neg}"
                );
                output.push((aff, other_neg));
                output.push((other_aff, neg));
            }
            None => {
                affs.push_back(aff);
                negs.push_back(neg);
            }
        }
    }

    let flip = input.round_number % 2 == 0;
    Ok(output
        .into_iter()
        .map(|(aff, neg)| if flip { (neg, aff) } else { (aff, neg) })
        .collect())
}

/// The position of the first waiting pair `(a, n)` such that `aff` may face
/// `n` and `a` may face `neg`.
fn find_exchange(
    clashes: &ClashMap,
    aff: CompetitorId,
    neg: CompetitorId,
    affs: &VecDeque<CompetitorId>,
    negs: &VecDeque<CompetitorId>,
) -> Option<usize> {
    affs.iter().zip(negs.iter()).position(|(other_aff, other_neg)| {
        clashes.can_pair(aff, *other_neg) && clashes.can_pair(*other_aff, neg)
    })
}
