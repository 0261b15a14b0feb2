//! Force-vector genomes driving rockets.
//!
//! A genome holds one 2D force per tick of a rocket's life, stored as the rows
//! of a `lifetime × 2` matrix. The first gene is unit length and sets the
//! launch heading; every other gene has magnitude in `[0, MAX_GENE_FORCE)`.

use ndarray::{Array1, Array2, s};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::LoadError;
use super::geometric_utils::{from_angle, normalized, zero};

/// Upper bound on the magnitude of a random gene.
pub const MAX_GENE_FORCE: f32 = 0.2;

/// Ordered per-tick forces of one rocket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<f32>", into = "Array2<f32>")]
pub struct Dna {
    genes: Array2<f32>,
}

impl Dna {
    /// Creates a random genome with one gene per tick of `lifetime`.
    ///
    /// # Arguments
    ///
    /// * `lifetime` - Genome length in ticks
    /// * `rng` - Random source
    pub fn new_random<R: Rng + ?Sized>(lifetime: usize, rng: &mut R) -> Self {
        let mut genes = Array2::zeros((lifetime, 2));
        for (i, mut row) in genes.rows_mut().into_iter().enumerate() {
            row.assign(&random_gene(i == 0, rng));
        }
        Self::from_genes(genes)
    }

    /// Wraps an existing `n × 2` gene matrix, normalizing the first gene.
    pub fn from_genes(mut genes: Array2<f32>) -> Self {
        if genes.nrows() > 0 {
            let first = normalized(&genes.row(0).to_owned());
            genes.row_mut(0).assign(&first);
        }
        Self { genes }
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.nrows()
    }

    /// Whether the genome has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.nrows() == 0
    }

    /// Raw gene matrix.
    pub fn genes(&self) -> &Array2<f32> {
        &self.genes
    }

    /// Force for tick `index`, wrapping modulo the genome length.
    ///
    /// An empty genome yields the zero force.
    pub fn gene(&self, index: usize) -> Array1<f32> {
        if self.is_empty() {
            return zero();
        }
        self.genes.row(index % self.len()).to_owned()
    }

    /// Single-point crossover at a random split index.
    pub fn crossover<R: Rng + ?Sized>(&self, partner: &Dna, rng: &mut R) -> Dna {
        if self.is_empty() {
            return self.clone();
        }
        let midpoint = rng.random_range(0..self.len());
        self.crossover_at(partner, midpoint)
    }

    /// Single-point crossover at `midpoint`.
    ///
    /// Genes before `midpoint` come from `self`; the gene at `midpoint` and
    /// every later one come from `partner`. The child owns fresh storage.
    pub fn crossover_at(&self, partner: &Dna, midpoint: usize) -> Dna {
        let midpoint = midpoint.min(self.len());
        let mut child = self.genes.clone();
        if partner.len() == self.len() {
            child
                .slice_mut(s![midpoint.., ..])
                .assign(&partner.genes.slice(s![midpoint.., ..]));
        } else {
            for i in midpoint..self.len() {
                child.row_mut(i).assign(&partner.gene(i));
            }
        }
        Dna::from_genes(child)
    }

    /// Replaces each gene with a fresh random one with probability `rate`.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f32, rng: &mut R) {
        for i in 0..self.len() {
            if rng.random::<f32>() < rate {
                let gene = random_gene(i == 0, rng);
                self.genes.row_mut(i).assign(&gene);
            }
        }
    }
}

/// Random direction with magnitude in `[0, MAX_GENE_FORCE)`, or unit length
/// for the launch gene.
fn random_gene<R: Rng + ?Sized>(launch: bool, rng: &mut R) -> Array1<f32> {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let magnitude = if launch {
        1.0
    } else {
        rng.random_range(0.0..MAX_GENE_FORCE)
    };
    from_angle(angle, magnitude)
}

impl TryFrom<Array2<f32>> for Dna {
    type Error = LoadError;

    fn try_from(genes: Array2<f32>) -> Result<Self, Self::Error> {
        if genes.ncols() != 2 {
            return Err(LoadError::Dimension {
                name: "genes",
                expected_rows: genes.nrows(),
                expected_cols: 2,
                actual_rows: genes.nrows(),
                actual_cols: genes.ncols(),
            });
        }
        if genes.iter().any(|v| !v.is_finite()) {
            return Err(LoadError::NonFinite { name: "genes" });
        }
        Ok(Self { genes })
    }
}

impl From<Dna> for Array2<f32> {
    fn from(dna: Dna) -> Self {
        dna.genes
    }
}
