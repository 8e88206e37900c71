//! Score cutoff with relaxation

use crate::model::Candidate;

/// Competitors scoring below this are dropped by the primary filter
pub const MIN_SCORE: u8 = 30;
/// Fewer survivors than this triggers relaxation
pub const MIN_SURVIVORS: usize = 3;
/// Size of the relaxed result
pub const RELAXED_TAKE: usize = 5;
/// Upper bound on competitors returned after the primary filter
pub const MAX_COMPETITORS: usize = 8;

/// Order and trim validated candidates.
///
/// The self candidate, if any, always comes first and is exempt from the
/// cutoff and the cap. Competitors are stably sorted by score descending,
/// then filtered to `score >= MIN_SCORE`. If fewer than `MIN_SURVIVORS`
/// pass while at least that many competitors exist, the top
/// `RELAXED_TAKE` are taken regardless of score; otherwise the survivors
/// are capped at `MAX_COMPETITORS`.
pub fn rank_candidates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let (selves, mut competitors): (Vec<Candidate>, Vec<Candidate>) =
        candidates.into_iter().partition(|c| c.is_self);

    if selves.len() > 1 {
        tracing::warn!(count = selves.len(), "Multiple self candidates, keeping the first");
    }

    competitors.sort_by(|a, b| b.score.cmp(&a.score));

    let passing = competitors.iter().filter(|c| c.score >= MIN_SCORE).count();

    let filtered: Vec<Candidate> = if passing < MIN_SURVIVORS && competitors.len() >= MIN_SURVIVORS
    {
        tracing::info!(
            passing = passing,
            competitors = competitors.len(),
            "Too few candidates passed the score cutoff, relaxing"
        );
        competitors.into_iter().take(RELAXED_TAKE).collect()
    } else {
        competitors
            .into_iter()
            .filter(|c| c.score >= MIN_SCORE)
            .take(MAX_COMPETITORS)
            .collect()
    };

    selves.into_iter().take(1).chain(filtered).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Provenance, SelfBrand};

    fn scored(name: &str, score: u8) -> Candidate {
        let mut c = Candidate::new(name, "", Provenance::OracleDiscovered);
        c.score = score;
        c
    }

    fn scores(candidates: &[Candidate]) -> Vec<u8> {
        candidates.iter().map(|c| c.score).collect()
    }

    fn self_candidate(score: u8) -> Candidate {
        let mut c = Candidate::self_brand(&SelfBrand {
            name: "NoteAI".to_string(),
            domain: Some("https://noteai.app".to_string()),
        });
        c.score = score;
        c
    }

    #[test]
    fn test_relaxation_takes_top_five() {
        let ranked = rank_candidates(
            [10, 20, 25, 28, 29]
                .iter()
                .enumerate()
                .map(|(i, s)| scored(&format!("c{}", i), *s))
                .collect(),
        );
        assert_eq!(scores(&ranked), vec![29, 28, 25, 20, 10]);
    }

    #[test]
    fn test_relaxation_needs_three_competitors() {
        let ranked = rank_candidates(vec![scored("a", 10), scored("b", 50)]);
        assert_eq!(scores(&ranked), vec![50]);

        let ranked = rank_candidates(vec![scored("a", 10), scored("b", 20)]);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_cap_at_eight() {
        let ranked = rank_candidates((0..12).map(|i| scored(&format!("c{}", i), 40 + i)).collect());
        assert_eq!(ranked.len(), 8);
        assert_eq!(ranked[0].score, 51);
        assert_eq!(ranked[7].score, 44);
    }

    #[test]
    fn test_self_first_and_uncounted() {
        let mut input: Vec<Candidate> = (0..10).map(|i| scored(&format!("c{}", i), 90)).collect();
        input.push(self_candidate(0));

        let ranked = rank_candidates(input);
        assert_eq!(ranked.len(), 9);
        assert!(ranked[0].is_self);
        assert!(ranked[1..].iter().all(|c| !c.is_self));
    }

    #[test]
    fn test_self_alone() {
        let ranked = rank_candidates(vec![self_candidate(5)]);
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].is_self);
    }

    #[test]
    fn test_stable_sort_keeps_input_order_for_ties() {
        let ranked = rank_candidates(vec![
            scored("first", 40),
            scored("second", 40),
            scored("third", 40),
        ]);
        let names: Vec<&str> = ranked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            self_candidate(12),
            scored("a", 35),
            scored("b", 80),
            scored("c", 5),
            scored("d", 31),
            scored("e", 64),
        ];
        let once = rank_candidates(input);
        let twice = rank_candidates(once.clone());
        let names = |v: &[Candidate]| v.iter().map(|c| c.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&once), names(&twice));
        assert_eq!(scores(&once), vec![12, 80, 64, 35, 31]);
    }

    #[test]
    fn test_idempotent_after_relaxation() {
        let once = rank_candidates(vec![
            scored("a", 1),
            scored("b", 2),
            scored("c", 3),
            scored("d", 4),
        ]);
        let twice = rank_candidates(once.clone());
        assert_eq!(scores(&once), scores(&twice));
    }
}
