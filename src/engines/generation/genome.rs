use serde::{Deserialize, Serialize};

/// Candidate solution for the optimizer.
///
/// A genome is a fixed-length vector of real-valued genes, one per free
/// parameter of the problem being optimized. The optimizer only ever looks at
/// `genes` and `fitness`; what a gene *means* is decided by the caller's
/// fitness function (see `engines::trajectory::encoding` for the rocket
/// layout).
///
/// Fitness is minimized. A freshly created genome carries `f64::INFINITY`
/// until it has been evaluated, so unevaluated genomes always sort last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    pub genes: Vec<f64>,
    pub fitness: f64,
    #[serde(skip)]
    evaluated: bool,
}

impl Genome {
    pub fn new(genes: Vec<f64>) -> Self {
        Self {
            genes,
            fitness: f64::INFINITY,
            evaluated: false,
        }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    pub(crate) fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
        self.evaluated = true;
    }

    /// Bit-exact signature of the genes, used for deduplication.
    pub fn signature(&self) -> Vec<u64> {
        self.genes.iter().map(|g| g.to_bits()).collect()
    }
}

impl From<Vec<f64>> for Genome {
    fn from(genes: Vec<f64>) -> Self {
        Genome::new(genes)
    }
}
