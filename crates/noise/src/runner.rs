use phenoimp_core::Phenopacket;
use tracing::{debug, warn};

use crate::Noise;

/// Applies strategies in order, feeding each the output of the previous one
#[derive(Clone, Default)]
pub struct SequentialNoiseRunner {
  strategies: Vec<Noise>,
}

impl SequentialNoiseRunner {
  pub fn new(strategies: Vec<Noise>) -> Self {
    if strategies.is_empty() {
      warn!("No noise will be added!");
    }
    Self { strategies }
  }

  pub fn strategy_names(&self) -> Vec<&'static str> {
    self.strategies.iter().map(Noise::name).collect()
  }

  pub fn is_empty(&self) -> bool {
    self.strategies.is_empty()
  }

  pub fn run(&mut self, pp: Phenopacket) -> Phenopacket {
    self.strategies.iter_mut().fold(pp, |pp, strategy| {
      debug!("Applying {} to {}", strategy.name(), pp.id);
      strategy.distort(pp)
    })
  }
}
