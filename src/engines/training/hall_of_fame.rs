use super::fitness::FitnessKey;
use super::history::TrainingHistoryEntry;
use crate::genome::TeamGenome;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An evaluated candidate in the top-K report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedGenome {
    pub episode: usize,
    pub fitness: FitnessKey,
    pub genome: TeamGenome,
    #[serde(skip)]
    pub canonical_string: String, // For deduplication
}

impl RankedGenome {
    pub fn from_entry(entry: &TrainingHistoryEntry) -> Self {
        Self {
            episode: entry.episode,
            fitness: entry.stats.fitness(),
            canonical_string: entry.genome.canonical_string(),
            genome: entry.genome.clone(),
        }
    }

    /// Higher fitness first, then earlier episode
    fn outranks(&self, other: &RankedGenome) -> bool {
        self.fitness > other.fitness || (self.fitness == other.fitness && self.episode < other.episode)
    }
}

/// Best `max_size` distinct genomes seen so far
pub struct HallOfFame {
    entries: Vec<RankedGenome>,
    max_size: usize,
    seen_signatures: HashSet<String>,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
            seen_signatures: HashSet::new(),
        }
    }

    /// Rank a whole training history
    pub fn from_history(max_size: usize, history: &[TrainingHistoryEntry]) -> Self {
        let mut hof = Self::new(max_size);
        for entry in history {
            hof.try_add(RankedGenome::from_entry(entry));
        }
        hof
    }

    /// Attempt to add a genome; a duplicate only replaces its twin if it outranks it
    pub fn try_add(&mut self, genome: RankedGenome) -> bool {
        if self.max_size == 0 {
            return false;
        }

        if self.seen_signatures.contains(&genome.canonical_string) {
            let Some(pos) = self
                .entries
                .iter()
                .position(|e| e.canonical_string == genome.canonical_string)
            else {
                return false;
            };
            if !genome.outranks(&self.entries[pos]) {
                return false; // Duplicate, reject
            }
            self.entries.remove(pos);
        } else {
            self.seen_signatures.insert(genome.canonical_string.clone());
        }

        self.entries.push(genome);
        self.sort_and_trim();
        true
    }

    fn sort_and_trim(&mut self) {
        self.entries.sort_by(|a, b| {
            b.fitness.cmp(&a.fitness).then(a.episode.cmp(&b.episode))
        });

        while self.entries.len() > self.max_size {
            if let Some(removed) = self.entries.pop() {
                self.seen_signatures.remove(&removed.canonical_string);
            }
        }
    }

    pub fn get_all(&self) -> &[RankedGenome] {
        &self.entries
    }

    pub fn get_top_n(&self, n: usize) -> &[RankedGenome] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::GenomeNode;
    use crate::types::Role;

    fn ranked(episode: usize, points: i64, goal_diff: i64, action: &str) -> RankedGenome {
        let genome = TeamGenome::new("T", "TST").with_role(Role::C, GenomeNode::action(action));
        RankedGenome {
            episode,
            fitness: FitnessKey::new(points, goal_diff),
            canonical_string: genome.canonical_string(),
            genome,
        }
    }

    #[test]
    fn test_ranks_by_fitness_then_episode() {
        let mut hof = HallOfFame::new(10);
        hof.try_add(ranked(1, 4, 0, "actShoot"));
        hof.try_add(ranked(2, 6, 1, "actPass"));
        hof.try_add(ranked(3, 6, 1, "actDriveNet"));
        hof.try_add(ranked(4, 5, 10, "actChill"));

        let order: Vec<usize> = hof.get_all().iter().map(|r| r.episode).collect();
        assert_eq!(order, vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_identical_genomes_deduplicated() {
        let mut hof = HallOfFame::new(10);
        assert!(hof.try_add(ranked(1, 4, 0, "actShoot")));
        assert!(!hof.try_add(ranked(3, 2, 0, "actShoot")));
        assert!(hof.try_add(ranked(5, 8, 0, "actShoot")));

        assert_eq!(hof.len(), 1);
        assert_eq!(hof.get_all()[0].episode, 5);
    }

    #[test]
    fn test_trims_to_max_size() {
        let mut hof = HallOfFame::new(2);
        hof.try_add(ranked(1, 1, 0, "actShoot"));
        hof.try_add(ranked(2, 3, 0, "actPass"));
        hof.try_add(ranked(3, 2, 0, "actDriveNet"));

        let order: Vec<usize> = hof.get_all().iter().map(|r| r.episode).collect();
        assert_eq!(order, vec![2, 3]);
        assert_eq!(hof.get_top_n(1).len(), 1);
        assert_eq!(hof.get_top_n(5).len(), 2);
    }
}
