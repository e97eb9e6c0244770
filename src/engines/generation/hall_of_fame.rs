use crate::engines::generation::genome::Genome;

use std::collections::HashSet;

/// Best distinct genomes ever seen during a run, sorted by fitness ascending.
pub struct HallOfFame {
    genomes: Vec<Genome>,
    max_size: usize,
    seen_signatures: HashSet<Vec<u64>>,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            genomes: Vec::new(),
            max_size: max_size.max(1),
            seen_signatures: HashSet::new(),
        }
    }

    /// Attempt to add an evaluated genome
    pub fn try_add(&mut self, genome: &Genome) -> bool {
        if !genome.is_evaluated() || genome.fitness.is_nan() {
            return false;
        }

        // Full and not better than the worst entry
        if self.genomes.len() >= self.max_size {
            if let Some(worst) = self.genomes.last() {
                if genome.fitness >= worst.fitness {
                    return false;
                }
            }
        }

        let signature = genome.signature();
        if self.seen_signatures.contains(&signature) {
            return false;
        }

        self.seen_signatures.insert(signature);
        self.genomes.push(genome.clone());
        self.sort_and_trim();

        true
    }

    fn sort_and_trim(&mut self) {
        self.genomes.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));

        while self.genomes.len() > self.max_size {
            if let Some(removed) = self.genomes.pop() {
                self.seen_signatures.remove(&removed.signature());
            }
        }
    }

    pub fn best(&self) -> Option<&Genome> {
        self.genomes.first()
    }

    pub fn get_all(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn clear(&mut self) {
        self.genomes.clear();
        self.seen_signatures.clear();
    }
}
